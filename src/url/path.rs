//! Mapping page URLs onto files of the text tree

use crate::UrlError;
use std::path::{Path, PathBuf};

/// Extension of the text files in the text tree
pub const TEXT_EXTENSION: &str = "txt";

/// File stem used when a URL ends in `/`
const EMPTY_SEGMENT_STEM: &str = "index";

/// Maps a URL onto its file in the text tree
///
/// # Mapping Rules
///
/// 1. Drop everything up to and including the first `//`
/// 2. Drop the query string (from the first `?` on)
/// 3. Split the rest on `/`; every segment but the last is a directory
///    (empty, `.` and `..` segments are skipped)
/// 4. The last segment plus `.txt` is the file name; an empty last segment
///    becomes `index.txt`
///
/// # Arguments
///
/// * `base` - Root of the text tree
/// * `url` - The page URL
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the text file (its directories may not exist yet)
/// * `Err(UrlError)` - The URL has no `//` or no host
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use txtcrawl::url::text_file_path;
///
/// let path = text_file_path(Path::new("/out"), "http://example.com/a/b?c").unwrap();
/// assert_eq!(path, Path::new("/out/example.com/a/b.txt"));
/// ```
pub fn text_file_path(base: &Path, url: &str) -> Result<PathBuf, UrlError> {
    let (_, rest) = url
        .split_once("//")
        .ok_or_else(|| UrlError::MissingScheme(url.to_string()))?;

    let rest = match rest.find('?') {
        Some(index) => &rest[..index],
        None => rest,
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let (last, dirs) = match segments.split_last() {
        Some(split) => split,
        None => return Err(UrlError::MissingHost(url.to_string())),
    };

    let host = segments[0];
    if host.is_empty() {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    let mut path = base.to_path_buf();
    for segment in dirs {
        if is_traversable(segment) {
            path.push(segment);
        }
    }

    let stem = if is_traversable(last) {
        *last
    } else {
        EMPTY_SEGMENT_STEM
    };
    path.push(format!("{}.{}", stem, TEXT_EXTENSION));

    Ok(path)
}

/// Returns true for segments that are safe to use as a path component
fn is_traversable(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}
