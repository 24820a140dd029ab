//! Output module for everything a run writes
//!
//! This module handles:
//! - Persisting target-language pages (text tree or WARC archive)
//! - The crawl log and rejected-language log
//! - The seed output of archive replay
//! - The run summary printed at the end

mod logs;
mod sink;
pub mod stats;
mod text_tree;
mod warc_sink;

pub use logs::{
    AppendFile, CrawlLog, LogLine, RejectedLog, SeedOutput, NO_PARENT, OUTLINK_MARKER,
    TRANSPORT_FAILURE_STATUS, UNKNOWN_LENGTH,
};
pub use sink::PersistenceSink;
pub use stats::{print_summary, RunSummary};
pub use text_tree::TextTree;
pub use warc_sink::WarcSink;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot derive an output path: {0}")]
    Url(#[from] crate::UrlError),

    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
