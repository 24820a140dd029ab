//! Page outcome definitions
//!
//! Every page a crawl or replay touches ends in exactly one of these outcomes.

use std::fmt;

/// What happened to a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Kept =====
    /// Text was in the target language and was persisted
    Persisted,

    // ===== Skipped =====
    /// Text was in another language, or its language could not be determined
    Rejected,

    /// Page text was not examined (replay without extraction)
    Harvested,

    // ===== Errors =====
    /// Server answered with a non-success status
    HttpError,

    /// Request failed before a response arrived
    Unreachable,

    /// Payload could not be decoded into text
    DecodeFailed,

    /// Text was in the target language but writing it failed
    PersistFailed,
}

impl PageOutcome {
    /// All outcomes, in reporting order
    pub const ALL: [PageOutcome; 7] = [
        Self::Persisted,
        Self::Rejected,
        Self::Harvested,
        Self::HttpError,
        Self::Unreachable,
        Self::DecodeFailed,
        Self::PersistFailed,
    ];

    /// Returns true if the page's outlinks are worth following
    ///
    /// Language rejection does not stop link discovery; only failures to get
    /// the page at all do.
    pub fn yields_outlinks(&self) -> bool {
        matches!(self, Self::Persisted | Self::Rejected | Self::PersistFailed | Self::Harvested)
    }

    /// Returns true if this represents an error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HttpError | Self::Unreachable | Self::DecodeFailed | Self::PersistFailed
        )
    }

    /// Short label used in summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Rejected => "rejected",
            Self::Harvested => "harvested",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::DecodeFailed => "decode_failed",
            Self::PersistFailed => "persist_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
