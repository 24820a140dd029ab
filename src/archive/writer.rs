//! Appending records to a `.warc.gz` file

use crate::archive::{ArchiveResult, WarcRecord};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use warc::WarcWriter;

/// Serializes one record in WARC/1.0 layout, uncompressed
pub fn to_warc_bytes(record: &WarcRecord) -> ArchiveResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(record.body().len() + 512);
    WarcWriter::new(&mut raw).write(record)?;
    Ok(raw)
}

/// Appends records to a gzip-compressed WARC file
///
/// Each record is written as its own gzip member, so the file stays readable
/// record by record and can be appended to across runs.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    path: PathBuf,
}

impl ArchiveWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the file and its directory if needed
    pub fn append(&self, record: &WarcRecord) -> ArchiveResult<()> {
        let raw = to_warc_bytes(record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?.flush()?;
        Ok(())
    }
}
