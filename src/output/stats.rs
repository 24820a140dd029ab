//! Run summary
//!
//! Counters collected while crawling or replaying, merged across workers and
//! printed when the run ends.

use crate::state::PageOutcome;
use std::collections::HashMap;
use std::time::Duration;

/// What a run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Count of pages by outcome
    pub pages_by_outcome: HashMap<PageOutcome, u64>,

    /// Number of fetch attempts (crawl mode)
    pub fetches: u64,

    /// Number of crawlable outlinks seen
    pub outlinks_found: u64,

    /// Number of archive records read
    pub records_read: u64,

    /// Number of lines written to the seed output
    pub seeds_written: u64,

    /// Number of archive files that could not be read to the end
    pub archives_failed: u64,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one page outcome
    pub fn record(&mut self, outcome: PageOutcome) {
        *self.pages_by_outcome.entry(outcome).or_insert(0) += 1;
    }

    /// Number of pages that ended in `outcome`
    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of pages with any outcome
    pub fn total_pages(&self) -> u64 {
        self.pages_by_outcome.values().sum()
    }

    /// Total number of pages that ended in an error
    pub fn total_errors(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Adds another worker's counters into this one
    ///
    /// `elapsed` is not summed; the caller sets it once for the whole run.
    pub fn merge(&mut self, other: &RunSummary) {
        for (outcome, count) in &other.pages_by_outcome {
            *self.pages_by_outcome.entry(*outcome).or_insert(0) += count;
        }
        self.fetches += other.fetches;
        self.outlinks_found += other.outlinks_found;
        self.records_read += other.records_read;
        self.seeds_written += other.seeds_written;
        self.archives_failed += other.archives_failed;
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");

    println!("Overview:");
    println!("  Pages: {}", summary.total_pages());
    println!("  Errors: {}", summary.total_errors());
    println!("  Fetches: {}", summary.fetches);
    println!("  Outlinks found: {}", summary.outlinks_found);
    if summary.records_read > 0 {
        println!("  Archive records read: {}", summary.records_read);
    }
    if summary.seeds_written > 0 {
        println!("  Seeds written: {}", summary.seeds_written);
    }
    if summary.archives_failed > 0 {
        println!("  Archives with errors: {}", summary.archives_failed);
    }
    println!();

    if summary.total_pages() > 0 {
        println!("Pages by Outcome:");
        for outcome in PageOutcome::ALL {
            let count = summary.count(outcome);
            if count > 0 {
                let percentage = (count as f64 / summary.total_pages() as f64) * 100.0;
                println!("  {}: {} ({:.1}%)", outcome, count, percentage);
            }
        }
        println!();
    }

    println!("Elapsed: {:.2}s", summary.elapsed.as_secs_f64());
}
