//! Opening archives for reading

use crate::archive::{ArchiveResult, WarcRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use warc::WarcReader;

/// First two bytes of every gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The records of one archive, in file order
pub type Records = Box<dyn Iterator<Item = Result<WarcRecord, warc::Error>>>;

/// Opens a `.warc` or `.warc.gz` file
///
/// Compression is detected from the file's first bytes, not its name. A
/// multi-member gzip file (one member per record) reads as one stream.
pub fn open_records(path: &Path) -> ArchiveResult<Records> {
    if is_gzip(path)? {
        Ok(Box::new(WarcReader::from_path_gzip(path)?.iter_records()))
    } else {
        Ok(Box::new(WarcReader::from_path(path)?.iter_records()))
    }
}

fn is_gzip(path: &Path) -> std::io::Result<bool> {
    let mut magic = Vec::with_capacity(GZIP_MAGIC.len());
    File::open(path)?
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    Ok(magic == GZIP_MAGIC)
}
