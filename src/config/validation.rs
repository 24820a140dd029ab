//! Checks run on the merged configuration before anything starts

use crate::config::types::Config;
use crate::ConfigError;

/// Largest worker pool accepted for `nprocs`
const MAX_NPROCS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_workers(config)?;
    validate_persistence(config)?;
    validate_language(&config.language)?;
    validate_http(config)?;
    validate_paths(config)?;
    Ok(())
}

/// Validates the worker pool size
fn validate_workers(config: &Config) -> Result<(), ConfigError> {
    if config.nprocs < 1 || config.nprocs > MAX_NPROCS {
        return Err(ConfigError::Validation(format!(
            "nprocs must be between 1 and {}, got {}",
            MAX_NPROCS, config.nprocs
        )));
    }
    Ok(())
}

/// Validates that the persistence modes don't clash
fn validate_persistence(config: &Config) -> Result<(), ConfigError> {
    if config.txt_dir.is_some() && config.wet_dir.is_some() {
        return Err(ConfigError::Validation(
            "txt_dir and wet_dir are mutually exclusive".to_string(),
        ));
    }

    // extract only runs when no other action outranks it
    let extract_selected =
        config.extract.is_some() && config.seeds.is_none() && config.seeds_from_warc.is_none();
    if extract_selected && config.txt_dir.is_none() {
        return Err(ConfigError::Validation(
            "extract requires txt_dir to be set".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the target language is one the classifier can produce
fn validate_language(code: &str) -> Result<(), ConfigError> {
    if whatlang::Lang::from_code(code).is_none() {
        return Err(ConfigError::UnknownLanguage(code.to_string()));
    }
    Ok(())
}

/// Validates request settings
fn validate_http(config: &Config) -> Result<(), ConfigError> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be > 0 when set (leave it unset for no timeout)".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output file paths
fn validate_paths(config: &Config) -> Result<(), ConfigError> {
    let files = [
        ("crawl_log", &config.crawl_log),
        ("rejected_log", &config.rejected_log),
        ("seeds_out", &config.seeds_out),
    ];

    for (name, path) in files {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}
