//! txtcrawl: a language-filtered text crawler
//!
//! This crate crawls pages from a seed list or replays WARC archives, keeps the
//! pages written in a target language, and stores their text in a directory
//! tree derived from each page URL (or in a WARC archive).

pub mod archive;
pub mod config;
pub mod crawler;
pub mod language;
pub mod output;
pub mod replay;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for txtcrawl operations
#[derive(Debug, Error)]
pub enum TxtcrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Failed to read {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No action given: set one of seeds, seeds_from_warc or extract")]
    MissingAction,

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL has no scheme separator: {0}")]
    MissingScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for txtcrawl operations
pub type Result<T> = std::result::Result<T, TxtcrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Action, Config};
pub use crawler::{HopBudget, VisitedRegistry};
pub use output::RunSummary;
pub use state::PageOutcome;

/// Runs the single action selected by the configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Counters describing what the run did
/// * `Err(TxtcrawlError)` - No action was set, or an input list was unreadable
pub async fn run(config: Config) -> Result<RunSummary> {
    let action = config.action()?;
    run_action(config, action).await
}

/// Runs an already resolved action
pub async fn run_action(config: Config, action: Action) -> Result<RunSummary> {
    tracing::info!("Running action '{}'", action.name());
    match action {
        Action::CrawlSeeds(seeds) => crawler::crawl_seed_file(config, &seeds).await,
        Action::HarvestSeeds(archives) => replay::harvest_seeds(&config, &archives),
        Action::Extract(archives) => replay::extract_text(&config, &archives),
    }
}
