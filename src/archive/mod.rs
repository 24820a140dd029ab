//! WARC archive access
//!
//! Records are read and written with the `warc` crate. This module adds what
//! the crawler needs on top of it: building `response` records from fetched
//! pages, appending them to a `.warc.gz` file one gzip member at a time,
//! opening plain or gzipped archives alike, and parsing the HTTP message held
//! in a record block with `httparse`.
//!
//! # Components
//!
//! - `WarcRecord` / `CaptureRecord`: a record and the accessors replay uses
//! - `HttpResponse`: the HTTP message stored in a `response` record block
//! - `open_records`: iterator over the records of an archive file
//! - `ArchiveWriter`: appends records to a `.warc.gz` file

mod http;
mod reader;
mod record;
mod writer;

pub use http::HttpResponse;
pub use reader::{open_records, Records};
pub use record::{response_record, CaptureRecord, WarcRecord};
pub use warc::{RecordType, WarcHeader};
pub use writer::{to_warc_bytes, ArchiveWriter};

use thiserror::Error;

/// Errors that can occur while reading or writing archives
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WARC error: {0}")]
    Warc(#[from] warc::Error),

    #[error("Malformed HTTP message: {0}")]
    MalformedHttp(String),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;
