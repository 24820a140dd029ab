//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and outlink extraction
//! - The visited registry and hop budgets
//! - Seed workers and overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod registry;

pub use coordinator::{crawl_seed_file, crawl_seeds, Crawler};
pub use fetcher::{build_http_client, fetch_http_response, fetch_url, FetchResult};
pub use parser::{extract_body_text, outlinks, parse_html, ParsedPage};
pub use registry::{HopBudget, VisitedRegistry};

use crate::TxtcrawlError;
use std::path::Path;

/// Reads a list file with one entry per line
///
/// Lines are trimmed and blank lines skipped. Used for the seed list and for
/// the archive lists of the replay actions.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Entries in file order
/// * `Err(TxtcrawlError::InputFile)` - The file could not be read
pub fn read_url_list(path: &Path) -> Result<Vec<String>, TxtcrawlError> {
    let content = std::fs::read_to_string(path).map_err(|source| TxtcrawlError::InputFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
