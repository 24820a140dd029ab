//! Directory-tree persistence of page text

use crate::output::OutputResult;
use crate::url::text_file_path;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes page text under `<base>/<host>/<path>.txt`
#[derive(Debug, Clone)]
pub struct TextTree {
    base: PathBuf,
}

impl TextTree {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Appends `text` to the file derived from `url`
    ///
    /// Missing directories are created; existing ones are fine. The text is
    /// appended, never overwritten, so writing the same page twice stores it
    /// twice.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The file that was appended to
    /// * `Err(OutputError)` - The URL has no usable path, or writing failed
    pub fn append(&self, url: &str, text: &str) -> OutputResult<PathBuf> {
        let path = text_file_path(&self.base, url)?;

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(text.as_bytes())?;

        tracing::debug!("Appended {} bytes to {}", text.len(), path.display());
        Ok(path)
    }
}
