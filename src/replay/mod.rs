//! Archive replay: harvesting seeds and extracting text from WARC files
//!
//! Archives are read in list order and records in file order. Only
//! `response` records are used. A record that cannot be decoded or persisted
//! is logged and skipped; an archive that cannot be read is logged, counted,
//! and the next archive is tried.

mod decode;

pub use decode::{decode_payload, decode_record, decode_response, DecodeError, DecodedPayload};

use crate::config::Config;
use crate::crawler::{parse_html, read_url_list};
use crate::output::{RunSummary, SeedOutput, TextTree};
use crate::state::PageOutcome;
use crate::archive::{open_records, ArchiveResult, CaptureRecord, WarcRecord};
use crate::{ConfigError, TxtcrawlError};
use std::path::Path;
use std::time::Instant;

/// What to do with each response record
pub struct Replayer {
    /// Written to when harvesting or re-seeding outlinks
    seeds: Option<SeedOutput>,
    harvest: bool,
    reseed_outlinks: bool,
    tree: Option<TextTree>,
}

impl Replayer {
    /// Replayer writing each record's URL to the seed output, plus its
    /// outlinks when `use_warc_outlinks` is set
    pub fn harvester(config: &Config) -> Self {
        Self {
            seeds: Some(SeedOutput::new(&config.seeds_out)),
            harvest: true,
            reseed_outlinks: config.use_warc_outlinks,
            tree: None,
        }
    }

    /// Replayer writing each record's body text into the text tree
    ///
    /// Outlinks are also re-seeded when `use_warc_outlinks` is set.
    pub fn extractor(config: &Config) -> Result<Self, TxtcrawlError> {
        let txt_dir = config.txt_dir.as_ref().ok_or_else(|| {
            ConfigError::Validation("'extract' requires 'txt_dir' to be set".to_string())
        })?;

        Ok(Self {
            seeds: config
                .use_warc_outlinks
                .then(|| SeedOutput::new(&config.seeds_out)),
            harvest: false,
            reseed_outlinks: config.use_warc_outlinks,
            tree: Some(TextTree::new(txt_dir)),
        })
    }

    /// Replays every archive named in `list_path`
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Counters over all archives
    /// * `Err(TxtcrawlError::InputFile)` - The archive list was unreadable
    pub fn replay_list(&self, list_path: &Path) -> Result<RunSummary, TxtcrawlError> {
        let start = Instant::now();
        let archives = read_url_list(list_path)?;
        tracing::info!(
            "Replaying {} archives from {}",
            archives.len(),
            list_path.display()
        );

        let mut summary = RunSummary::new();
        for archive in &archives {
            let path = Path::new(archive);
            if let Err(e) = self.replay_archive(path, &mut summary) {
                tracing::error!("Failed to read archive {}: {}", path.display(), e);
                summary.archives_failed += 1;
            }
        }

        summary.elapsed = start.elapsed();
        tracing::info!(
            "Replay finished: {} records, {} seeds written",
            summary.records_read,
            summary.seeds_written
        );
        Ok(summary)
    }

    /// Replays one archive file
    ///
    /// Records before a read error have already been processed when the
    /// error is returned.
    pub fn replay_archive(&self, path: &Path, summary: &mut RunSummary) -> ArchiveResult<()> {
        tracing::debug!("Reading archive {}", path.display());
        for record in open_records(path)? {
            let record = record?;
            summary.records_read += 1;
            if record.is_response() {
                self.replay_record(&record, summary);
            }
        }
        Ok(())
    }

    /// Handles one `response` record
    pub fn replay_record(&self, record: &WarcRecord, summary: &mut RunSummary) {
        let Some(url) = record.target_uri() else {
            tracing::debug!("Skipping response record without a target URI");
            return;
        };

        if self.harvest {
            self.write_seed(&url, false, summary);
        }

        if !self.reseed_outlinks && self.tree.is_none() {
            summary.record(PageOutcome::Harvested);
            return;
        }

        let decoded = match decode_record(record) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("Failed to decode {}: {}", url, e);
                summary.record(PageOutcome::DecodeFailed);
                return;
            }
        };
        if decoded.redecoded {
            tracing::debug!("Re-decoded {} as UTF-8", url);
        }

        let page = parse_html(&decoded.text);

        if self.reseed_outlinks {
            summary.outlinks_found += page.outlinks.len() as u64;
            for outlink in &page.outlinks {
                self.write_seed(outlink, true, summary);
            }
        }

        let outcome = match &self.tree {
            Some(tree) => match tree.append(&url, &page.text) {
                Ok(path) => {
                    tracing::debug!("Extracted {} to {}", url, path.display());
                    PageOutcome::Persisted
                }
                Err(e) => {
                    tracing::error!("Failed to persist {}: {}", url, e);
                    PageOutcome::PersistFailed
                }
            },
            None => PageOutcome::Harvested,
        };
        summary.record(outcome);
    }

    fn write_seed(&self, url: &str, outlink: bool, summary: &mut RunSummary) {
        let Some(seeds) = &self.seeds else {
            return;
        };

        let written = if outlink {
            seeds.write_outlink(url)
        } else {
            seeds.write_seed(url)
        };
        match written {
            Ok(()) => summary.seeds_written += 1,
            Err(e) => tracing::error!("Failed to write seed {}: {}", url, e),
        }
    }
}

/// Writes the URL of every archived response (and optionally its outlinks)
/// to the seed output
pub fn harvest_seeds(config: &Config, archive_list: &Path) -> Result<RunSummary, TxtcrawlError> {
    Replayer::harvester(config).replay_list(archive_list)
}

/// Writes the body text of every archived response into the text tree
///
/// No language filtering is applied.
pub fn extract_text(config: &Config, archive_list: &Path) -> Result<RunSummary, TxtcrawlError> {
    Replayer::extractor(config)?.replay_list(archive_list)
}
