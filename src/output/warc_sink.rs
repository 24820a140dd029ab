//! Archive-mode persistence: pages are re-fetched and appended to a WARC file

use crate::archive::{response_record, ArchiveWriter};
use crate::crawler::fetch_http_response;
use crate::output::OutputResult;
use reqwest::Client;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Appends `response` records to a single `.warc.gz` file
pub struct WarcSink {
    writer: ArchiveWriter,
    client: Client,
    lock: Mutex<()>,
}

impl WarcSink {
    pub fn new(path: &Path, client: Client) -> Self {
        Self {
            writer: ArchiveWriter::new(path),
            client,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Fetches `url` again and archives the response
    ///
    /// A transport failure during the re-fetch is logged and swallowed.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A record was appended
    /// * `Ok(false)` - The re-fetch failed, nothing was written
    /// * `Err(OutputError)` - Writing the archive failed
    pub async fn archive(&self, url: &str) -> OutputResult<bool> {
        let response = match fetch_http_response(&self.client, url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to re-fetch {} for archiving: {}", url, e);
                return Ok(false);
            }
        };

        let record = response_record(url, &response)?;

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.writer.append(&record)?;
        tracing::debug!("Archived {} to {}", url, self.writer.path().display());
        Ok(true)
    }
}
