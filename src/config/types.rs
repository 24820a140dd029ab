//! The configuration structure and the values derived from it

use serde::Deserialize;
use std::path::PathBuf;

/// File name of the single WARC archive written in archive mode
pub const WARC_OUTPUT_NAME: &str = "txtcrawl.warc.gz";

/// Main configuration structure for txtcrawl
///
/// Keys mirror the command-line flags, so a config file line such as
/// `level = 2` means the same thing as `--level 2`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File containing the seed URLs to crawl, one per line
    pub seeds: Option<PathBuf>,

    /// File listing WARC archives whose record URLs are harvested as seeds
    pub seeds_from_warc: Option<PathBuf>,

    /// Also harvest outlinks found in archived payloads
    pub use_warc_outlinks: bool,

    /// File listing WARC archives to extract text from
    pub extract: Option<PathBuf>,

    /// Crawl depth in hops, 0 for unlimited
    pub level: u32,

    /// Base directory for the text tree
    pub txt_dir: Option<PathBuf>,

    /// Base directory for the WARC output
    pub wet_dir: Option<PathBuf>,

    /// Crawl log, one line per attempted fetch
    pub crawl_log: PathBuf,

    /// Log of URLs whose text was not in the target language
    pub rejected_log: PathBuf,

    /// Where harvested seeds are appended
    pub seeds_out: PathBuf,

    /// Number of seeds crawled concurrently
    pub nprocs: usize,

    /// ISO 639-3 code of the language worth keeping
    pub language: String,

    /// Per-request timeout in seconds; unset means requests never time out
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seeds: None,
            seeds_from_warc: None,
            use_warc_outlinks: false,
            extract: None,
            level: 0,
            txt_dir: None,
            wet_dir: None,
            crawl_log: PathBuf::from("crawl.log"),
            rejected_log: PathBuf::from("langdetect.txt"),
            seeds_out: PathBuf::from("seeds.txt"),
            nprocs: 4,
            language: "ara".to_string(),
            timeout_secs: None,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// The one thing a run does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Crawl every URL of a seed list
    CrawlSeeds(PathBuf),

    /// Replay archives and write their URLs (and optionally outlinks) as seeds
    HarvestSeeds(PathBuf),

    /// Replay archives and write their page text into the text tree
    Extract(PathBuf),
}

impl Action {
    /// Short name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::CrawlSeeds(_) => "seeds",
            Self::HarvestSeeds(_) => "seeds_from_warc",
            Self::Extract(_) => "extract",
        }
    }
}

/// Where persisted pages end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistMode {
    /// Append body text to `<txt_dir>/<host>/<path>.txt`
    TextTree(PathBuf),

    /// Re-fetch and append a WARC response record under `<wet_dir>`
    Warc(PathBuf),

    /// Log only
    None,
}

impl Config {
    /// Resolves the action for this run
    ///
    /// When several actions are set the first of `seeds`, `seeds_from_warc`,
    /// `extract` wins and the others are ignored with a warning.
    pub fn action(&self) -> Result<Action, crate::ConfigError> {
        let mut actions = Vec::new();
        if let Some(path) = &self.seeds {
            actions.push(Action::CrawlSeeds(path.clone()));
        }
        if let Some(path) = &self.seeds_from_warc {
            actions.push(Action::HarvestSeeds(path.clone()));
        }
        if let Some(path) = &self.extract {
            actions.push(Action::Extract(path.clone()));
        }

        let mut actions = actions.into_iter();
        let chosen = actions.next().ok_or(crate::ConfigError::MissingAction)?;
        for ignored in actions {
            tracing::warn!(
                "Ignoring action '{}', '{}' takes precedence",
                ignored.name(),
                chosen.name()
            );
        }
        Ok(chosen)
    }

    /// Resolves the persistence mode from `txt_dir` / `wet_dir`
    pub fn persist_mode(&self) -> PersistMode {
        match (&self.txt_dir, &self.wet_dir) {
            (Some(dir), _) => PersistMode::TextTree(dir.clone()),
            (None, Some(dir)) => PersistMode::Warc(dir.clone()),
            (None, None) => PersistMode::None,
        }
    }

    /// Path of the WARC archive written in archive mode
    pub fn warc_output_path(&self) -> Option<PathBuf> {
        self.wet_dir.as_ref().map(|dir| dir.join(WARC_OUTPUT_NAME))
    }
}
