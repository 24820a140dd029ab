//! Language identification for crawled text
//!
//! Pages are only persisted when their text is classified as the target
//! language. Classification failures are expected (empty pages, pages made of
//! markup and digits) and are treated the same as "some other language".

mod detector;

pub use detector::WhatlangClassifier;

use std::fmt;
use thiserror::Error;

/// Errors a classifier may report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("no text to classify")]
    EmptyText,

    #[error("language could not be determined")]
    Undetermined,
}

/// An ISO 639-3 language code such as `ara` or `eng`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for language classifiers
///
/// Implementations must be thread-safe; one classifier is shared by every
/// crawl worker.
pub trait LanguageClassifier: Send + Sync {
    /// Classifies a piece of text
    ///
    /// # Returns
    ///
    /// * `Ok(LanguageTag)` - The detected language
    /// * `Err(ClassificationError)` - The text was empty or undetectable
    fn classify(&self, text: &str) -> Result<LanguageTag, ClassificationError>;
}

/// Result of running a page through the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Text is in the target language
    Target,

    /// Text is in another language
    Other(LanguageTag),

    /// Classification failed
    Unclassified(ClassificationError),
}

/// Gate deciding whether a page's text is worth keeping
pub struct LanguageFilter {
    classifier: Box<dyn LanguageClassifier>,
    target: LanguageTag,
}

impl LanguageFilter {
    /// Creates a filter keeping only text classified as `target`
    pub fn new(classifier: Box<dyn LanguageClassifier>, target: LanguageTag) -> Self {
        Self { classifier, target }
    }

    /// Creates a `whatlang`-backed filter for the given ISO 639-3 code
    pub fn whatlang(target: &str) -> Self {
        Self::new(Box::new(WhatlangClassifier::new()), LanguageTag::new(target))
    }

    /// Classifies the text once and compares it with the target
    pub fn check(&self, text: &str) -> Verdict {
        match self.classifier.classify(text) {
            Ok(tag) if tag == self.target => Verdict::Target,
            Ok(tag) => Verdict::Other(tag),
            Err(e) => Verdict::Unclassified(e),
        }
    }
}
