//! URL handling module for txtcrawl
//!
//! URLs are kept as plain strings: no normalization happens anywhere, so two
//! spellings of the same resource are two different URLs. This module only
//! decides which strings are crawlable and where a page's text lands on disk.

mod path;

pub use path::{text_file_path, TEXT_EXTENSION};

/// Prefix every crawlable URL starts with (covers both http and https)
pub const CRAWLABLE_PREFIX: &str = "http";

/// Returns true if the string looks like an HTTP(S) URL
///
/// The check is purely textual: the first four characters must be `http`.
/// Relative links, fragments and other schemes are not crawlable.
///
/// # Examples
///
/// ```
/// use txtcrawl::url::is_crawlable;
///
/// assert!(is_crawlable("https://example.com/"));
/// assert!(!is_crawlable("/relative/path"));
/// assert!(!is_crawlable("mailto:someone@example.com"));
/// ```
pub fn is_crawlable(candidate: &str) -> bool {
    candidate.starts_with(CRAWLABLE_PREFIX)
}
