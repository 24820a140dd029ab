//! Configuration module for txtcrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files
//! and merging them with command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use txtcrawl::config::{resolve_config, ConfigOverrides};
//!
//! let (config, _hash) = resolve_config(None, ConfigOverrides::default()).unwrap();
//! println!("Crawler will use {} workers", config.nprocs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Action, Config, PersistMode, WARC_OUTPUT_NAME};

// Re-export parser functions
pub use parser::{
    compute_config_hash, parse_config_file, resolve_config,
    ConfigOverrides, DEFAULT_CONFIG_FILE,
};
