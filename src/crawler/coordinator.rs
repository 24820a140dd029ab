//! Crawler coordinator - main crawl orchestration logic
//!
//! Each seed is traversed depth-first by one worker. Workers share the
//! visited registry, the output sinks and the HTTP client; everything else
//! (the frame stack, the per-page hop budgets, the counters) is local to the
//! worker and merged when it finishes.

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::crawler::registry::{HopBudget, VisitedRegistry};
use crate::crawler::{build_http_client, fetch_url, read_url_list, FetchResult};
use crate::language::{LanguageFilter, Verdict};
use crate::output::{CrawlLog, LogLine, PersistenceSink, RejectedLog, RunSummary};
use crate::state::PageOutcome;
use crate::TxtcrawlError;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A page whose outlinks are being walked
struct Frame {
    url: String,
    outlinks: std::vec::IntoIter<String>,
    budget: HopBudget,
}

/// Everything a crawl worker needs, shared between workers
pub struct Crawler {
    client: Client,
    registry: VisitedRegistry,
    filter: LanguageFilter,
    sink: PersistenceSink,
    crawl_log: CrawlLog,
    rejected_log: RejectedLog,
    level: u32,
}

impl Crawler {
    /// Creates a crawler from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(TxtcrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, TxtcrawlError> {
        let client = build_http_client(config)?;
        let sink = PersistenceSink::from_config(config, &client);

        Ok(Self {
            filter: LanguageFilter::whatlang(&config.language),
            sink,
            crawl_log: CrawlLog::new(&config.crawl_log),
            rejected_log: RejectedLog::new(&config.rejected_log),
            registry: VisitedRegistry::new(),
            level: config.level,
            client,
        })
    }

    /// Replaces the language filter
    pub fn with_filter(mut self, filter: LanguageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The registry shared by every seed this crawler runs
    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    /// Crawls one seed with the configured hop budget
    pub async fn crawl(&self, seed: &str) -> RunSummary {
        self.crawl_with_budget(seed, HopBudget::from_level(self.level))
            .await
    }

    /// Crawls one seed depth-first
    ///
    /// Outlinks are taken in document order. Each one that no worker has
    /// claimed yet is claimed, fetched, and its own outlinks walked before the
    /// next sibling. Every claimed child costs its parent one hop; the child
    /// starts with one hop fewer than the parent had when it was reached.
    /// The seed itself is not recorded in the registry.
    pub async fn crawl_with_budget(&self, seed: &str, budget: HopBudget) -> RunSummary {
        let mut summary = RunSummary::new();
        tracing::info!("Crawling seed {} (hops: {})", seed, budget);

        let mut stack = Vec::new();
        if let Some(outlinks) = self.process_page(seed, None, &mut summary).await {
            stack.push(Frame {
                url: seed.to_string(),
                outlinks: outlinks.into_iter(),
                budget,
            });
        }

        while let Some(frame) = stack.last_mut() {
            if frame.budget.is_exhausted() {
                stack.pop();
                continue;
            }
            let Some(child) = frame.outlinks.next() else {
                stack.pop();
                continue;
            };

            if !self.registry.try_claim(&child, frame.budget) {
                tracing::trace!("Already visited: {}", child);
                continue;
            }

            let child_budget = frame.budget.child();
            frame.budget.spend();
            let parent = frame.url.clone();

            if let Some(outlinks) = self.process_page(&child, Some(&parent), &mut summary).await {
                stack.push(Frame {
                    url: child,
                    outlinks: outlinks.into_iter(),
                    budget: child_budget,
                });
            }
        }

        tracing::debug!(
            "Finished seed {} ({} pages)",
            seed,
            summary.total_pages()
        );
        summary
    }

    /// Fetches, logs, filters and persists one page
    ///
    /// Returns the page's outlinks when its outcome is one whose links are
    /// followed, whether or not its text was kept.
    async fn process_page(
        &self,
        url: &str,
        parent: Option<&str>,
        summary: &mut RunSummary,
    ) -> Option<Vec<String>> {
        summary.fetches += 1;
        let result = fetch_url(&self.client, url).await;

        let line = LogLine::now(result.log_status(), result.content_length(), url, parent);
        if let Err(e) = self.crawl_log.record(&line) {
            tracing::error!("Failed to write crawl log for {}: {}", url, e);
        }

        let (outcome, outlinks) = match result {
            FetchResult::Success { body, .. } => {
                let page = parse_html(&body);
                let outcome = self.keep_or_reject(url, &page.text).await;
                (outcome, page.outlinks)
            }
            FetchResult::HttpError { status_code, .. } => {
                tracing::debug!("HTTP {} for {}", status_code, url);
                (PageOutcome::HttpError, Vec::new())
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                (PageOutcome::Unreachable, Vec::new())
            }
        };

        summary.record(outcome);
        if !outcome.yields_outlinks() {
            return None;
        }
        summary.outlinks_found += outlinks.len() as u64;
        Some(outlinks)
    }

    /// Persists the page if its text is in the target language
    async fn keep_or_reject(&self, url: &str, text: &str) -> PageOutcome {
        match self.filter.check(text) {
            Verdict::Target => match self.sink.persist(url, text).await {
                Ok(true) => {
                    tracing::debug!("Kept {}", url);
                    PageOutcome::Persisted
                }
                Ok(false) => PageOutcome::PersistFailed,
                Err(e) => {
                    tracing::error!("Failed to persist {}: {}", url, e);
                    PageOutcome::PersistFailed
                }
            },
            verdict => {
                match &verdict {
                    Verdict::Other(tag) => {
                        tracing::debug!("Rejected {} (detected {})", url, tag)
                    }
                    Verdict::Unclassified(e) => {
                        tracing::debug!("Rejected {} ({})", url, e)
                    }
                    Verdict::Target => {}
                }
                if let Err(e) = self.rejected_log.record(url) {
                    tracing::error!("Failed to write rejected log for {}: {}", url, e);
                }
                PageOutcome::Rejected
            }
        }
    }
}

/// Crawls every seed of a seed list
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `seeds_path` - File with one seed URL per line
///
/// # Returns
///
/// * `Ok(RunSummary)` - Counters merged over all seeds
/// * `Err(TxtcrawlError)` - The seed list was unreadable or the client could not be built
pub async fn crawl_seed_file(config: Config, seeds_path: &Path) -> Result<RunSummary, TxtcrawlError> {
    let start = Instant::now();
    let seeds = read_url_list(seeds_path)?;

    tracing::info!(
        "Crawling {} seeds from {} with {} workers (level {})",
        seeds.len(),
        seeds_path.display(),
        config.nprocs,
        config.level
    );

    let crawler = Arc::new(Crawler::new(&config)?);
    let mut summary = crawl_seeds(Arc::clone(&crawler), seeds, config.nprocs).await;
    summary.elapsed = start.elapsed();

    tracing::info!(
        "Crawl finished: {} pages, {} kept, {} rejected, {} URLs claimed",
        summary.total_pages(),
        summary.count(PageOutcome::Persisted),
        summary.count(PageOutcome::Rejected),
        crawler.registry().len()
    );
    Ok(summary)
}

/// Runs seeds on at most `workers` concurrent workers
///
/// A worker that panics is logged and its seed's counters are lost; the
/// other seeds are unaffected.
pub async fn crawl_seeds(crawler: Arc<Crawler>, seeds: Vec<String>, workers: usize) -> RunSummary {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for seed in seeds {
        let crawler = Arc::clone(&crawler);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = semaphore.acquire_owned().await.ok();
            crawler.crawl(&seed).await
        });
    }

    let mut summary = RunSummary::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(seed_summary) => summary.merge(&seed_summary),
            Err(e) => tracing::error!("Crawl worker failed: {}", e),
        }
    }
    summary
}
