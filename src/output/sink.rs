//! Choosing where kept pages go and sending them there

use crate::config::{Config, PersistMode};
use crate::output::{OutputResult, TextTree, WarcSink};
use reqwest::Client;

/// Where the text of target-language pages goes
pub enum PersistenceSink {
    /// Append text into the directory tree
    TextTree(TextTree),

    /// Re-fetch and append a WARC record
    Warc(WarcSink),

    /// Keep nothing (neither `txt_dir` nor `wet_dir` set)
    Discard,
}

impl PersistenceSink {
    /// Builds the sink selected by `txt_dir` / `wet_dir`
    pub fn from_config(config: &Config, client: &Client) -> Self {
        match config.persist_mode() {
            PersistMode::TextTree(dir) => Self::TextTree(TextTree::new(&dir)),
            PersistMode::Warc(_) => match config.warc_output_path() {
                Some(path) => Self::Warc(WarcSink::new(&path, client.clone())),
                None => Self::Discard,
            },
            PersistMode::None => Self::Discard,
        }
    }

    /// Persists a page
    ///
    /// In archive mode `text` is unused: the page is fetched again and the
    /// raw response archived.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The page was handled by the configured mode
    /// * `Ok(false)` - The archive re-fetch failed, nothing was written
    /// * `Err(OutputError)` - Writing the output failed
    pub async fn persist(&self, url: &str, text: &str) -> OutputResult<bool> {
        match self {
            Self::TextTree(tree) => {
                tree.append(url, text)?;
                Ok(true)
            }
            Self::Warc(sink) => sink.archive(url).await,
            Self::Discard => {
                tracing::debug!("No output directory configured, not keeping {}", url);
                Ok(true)
            }
        }
    }
}
