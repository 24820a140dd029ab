//! Reading the TOML configuration file and merging command-line overrides

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "txtcrawl.toml";

/// Values given on the command line, applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seeds: Option<PathBuf>,
    pub seeds_from_warc: Option<PathBuf>,
    pub use_warc_outlinks: bool,
    pub extract: Option<PathBuf>,
    pub level: Option<u32>,
    pub txt_dir: Option<PathBuf>,
    pub wet_dir: Option<PathBuf>,
    pub crawl_log: Option<PathBuf>,
    pub rejected_log: Option<PathBuf>,
    pub seeds_out: Option<PathBuf>,
    pub nprocs: Option<usize>,
    pub language: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Applies command-line values over the file values
    ///
    /// A flag only replaces a file value when it was actually given;
    /// `use_warc_outlinks` can be switched on but not off from the CLI.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if overrides.seeds.is_some() {
            self.seeds = overrides.seeds;
        }
        if overrides.seeds_from_warc.is_some() {
            self.seeds_from_warc = overrides.seeds_from_warc;
        }
        if overrides.extract.is_some() {
            self.extract = overrides.extract;
        }
        if overrides.txt_dir.is_some() {
            self.txt_dir = overrides.txt_dir;
        }
        if overrides.wet_dir.is_some() {
            self.wet_dir = overrides.wet_dir;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        if let Some(level) = overrides.level {
            self.level = level;
        }
        if let Some(crawl_log) = overrides.crawl_log {
            self.crawl_log = crawl_log;
        }
        if let Some(rejected_log) = overrides.rejected_log {
            self.rejected_log = rejected_log;
        }
        if let Some(seeds_out) = overrides.seeds_out {
            self.seeds_out = seeds_out;
        }
        if let Some(nprocs) = overrides.nprocs {
            self.nprocs = nprocs;
        }
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(user_agent) = overrides.user_agent {
            self.user_agent = user_agent;
        }
        self.use_warc_outlinks |= overrides.use_warc_outlinks;
    }
}

/// Parses a configuration file without validating it
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Builds the effective configuration for a run
///
/// The file is `explicit` when given, otherwise [`DEFAULT_CONFIG_FILE`] if it
/// exists, otherwise built-in defaults. Command-line overrides are applied
/// last and the result is validated.
///
/// # Returns
///
/// The configuration plus the hash of the file it came from, if any
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use txtcrawl::config::{resolve_config, ConfigOverrides};
///
/// let (config, _hash) =
///     resolve_config(Some(Path::new("txtcrawl.toml")), ConfigOverrides::default()).unwrap();
/// println!("Level: {}", config.level);
/// ```
pub fn resolve_config(
    explicit: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let file = match explicit {
        Some(path) => Some(path),
        None if default_path.is_file() => Some(default_path),
        None => None,
    };

    let (mut config, hash) = match file {
        Some(path) => {
            tracing::debug!("Reading configuration from {}", path.display());
            (parse_config_file(path)?, Some(compute_config_hash(path)?))
        }
        None => (Config::default(), None),
    };

    config.apply(overrides);
    validate(&config)?;

    Ok((config, hash))
}
