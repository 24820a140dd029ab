//! Append-only text outputs: the crawl log, the rejected-language log and
//! the seed output file

use crate::output::OutputResult;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Placeholder written when the content length is unknown
pub const UNKNOWN_LENGTH: &str = "NA";

/// Parent field written for seeds, which have no parent page
pub const NO_PARENT: &str = "-";

/// Status written when a request failed before any response
pub const TRANSPORT_FAILURE_STATUS: i32 = -1;

/// Marker appended to seeds that came from archived outlinks
pub const OUTLINK_MARKER: &str = "\t\t\t outlink";

/// One line of the crawl log
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub status: i32,
    pub content_length: Option<u64>,
    pub url: String,
    pub parent: Option<String>,
}

impl LogLine {
    /// Creates a line stamped with the current local time
    pub fn now(status: i32, content_length: Option<u64>, url: &str, parent: Option<&str>) -> Self {
        Self {
            timestamp: Local::now(),
            status,
            content_length,
            url: url.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

impl fmt::Display for LogLine {
    /// `<timestamp> <status> <length> <url> - <parent> text/html - - - - -`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let length = match self.content_length {
            Some(length) => length.to_string(),
            None => UNKNOWN_LENGTH.to_string(),
        };
        write!(
            f,
            "{} {} {} {} - {} text/html - - - - -",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.status,
            length,
            self.url,
            self.parent.as_deref().unwrap_or(NO_PARENT)
        )
    }
}

/// A text file that whole lines are appended to
///
/// Appends from concurrent workers are serialized so lines never interleave.
#[derive(Debug)]
pub struct AppendFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AppendFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` followed by a newline
    pub fn append_line(&self, line: &str) -> OutputResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// The crawl log, one line per attempted fetch
#[derive(Debug)]
pub struct CrawlLog(AppendFile);

impl CrawlLog {
    pub fn new(path: &Path) -> Self {
        Self(AppendFile::new(path))
    }

    pub fn record(&self, line: &LogLine) -> OutputResult<()> {
        self.0.append_line(&line.to_string())
    }
}

/// URLs whose text was not in the target language, one per line
#[derive(Debug)]
pub struct RejectedLog(AppendFile);

impl RejectedLog {
    pub fn new(path: &Path) -> Self {
        Self(AppendFile::new(path))
    }

    pub fn record(&self, url: &str) -> OutputResult<()> {
        self.0.append_line(url)
    }
}

/// Seed output of archive replay
#[derive(Debug)]
pub struct SeedOutput(AppendFile);

impl SeedOutput {
    pub fn new(path: &Path) -> Self {
        Self(AppendFile::new(path))
    }

    /// Writes a URL taken from a record's target URI
    pub fn write_seed(&self, url: &str) -> OutputResult<()> {
        self.0.append_line(url)
    }

    /// Writes a URL found in a record's payload, tagged as an outlink
    pub fn write_outlink(&self, url: &str) -> OutputResult<()> {
        self.0.append_line(&format!("{}{}", url, OUTLINK_MARKER))
    }
}
