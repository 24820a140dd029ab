//! txtcrawl main entry point
//!
//! This is the command-line interface for the txtcrawl language-filtered crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use txtcrawl::config::{resolve_config, Config, ConfigOverrides, PersistMode};
use txtcrawl::output::print_summary;
use txtcrawl::{Action, ConfigError};

/// txtcrawl: a language-filtered text crawler
///
/// Crawls the pages reachable from a seed list, or replays WARC archives,
/// and keeps the text of pages written in the target language. Exactly one
/// of --seeds, --seeds-from-warc and --extract must be given (here or in the
/// config file).
#[derive(Parser, Debug)]
#[command(name = "txtcrawl")]
#[command(version = "1.0.0")]
#[command(about = "A language-filtered text crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (default: ./txtcrawl.toml if present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Crawl the seed URLs listed in this file
    #[arg(long, value_name = "FILE")]
    seeds: Option<PathBuf>,

    /// Harvest seeds from the WARC archives listed in this file
    #[arg(long, value_name = "FILE")]
    seeds_from_warc: Option<PathBuf>,

    /// Also write each archived page's outlinks as seeds
    #[arg(long)]
    use_warc_outlinks: bool,

    /// Extract page text from the WARC archives listed in this file
    #[arg(long, value_name = "FILE")]
    extract: Option<PathBuf>,

    /// Maximum hops from each seed (0 = unbounded)
    #[arg(short, long)]
    level: Option<u32>,

    /// Write kept page text under this directory
    #[arg(long, value_name = "DIR", conflicts_with = "wet_dir")]
    txt_dir: Option<PathBuf>,

    /// Archive kept pages into a WARC file under this directory
    #[arg(long, value_name = "DIR")]
    wet_dir: Option<PathBuf>,

    /// Crawl log file
    #[arg(long, value_name = "FILE")]
    crawl_log: Option<PathBuf>,

    /// File listing pages rejected by the language filter
    #[arg(long, value_name = "FILE")]
    rejected_log: Option<PathBuf>,

    /// Seed output file of --seeds-from-warc
    #[arg(long, value_name = "FILE")]
    seeds_out: Option<PathBuf>,

    /// Number of concurrent seed workers
    #[arg(short = 'n', long)]
    nprocs: Option<usize>,

    /// ISO 639-3 code of the language to keep
    #[arg(long)]
    language: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would run without running it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            seeds: self.seeds.clone(),
            seeds_from_warc: self.seeds_from_warc.clone(),
            use_warc_outlinks: self.use_warc_outlinks,
            extract: self.extract.clone(),
            level: self.level,
            txt_dir: self.txt_dir.clone(),
            wet_dir: self.wet_dir.clone(),
            crawl_log: self.crawl_log.clone(),
            rejected_log: self.rejected_log.clone(),
            seeds_out: self.seeds_out.clone(),
            nprocs: self.nprocs,
            language: self.language.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ConfigError::MissingAction) = e.downcast_ref::<ConfigError>() {
                eprintln!("error: {}", e);
                eprintln!();
                eprintln!("Usage: txtcrawl (--seeds FILE | --seeds-from-warc FILE | --extract FILE) [OPTIONS]");
                eprintln!("Run 'txtcrawl --help' for all options.");
                return ExitCode::from(2);
            }
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_hash) = resolve_config(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;
    match config_hash {
        Some(hash) => tracing::info!("Configuration loaded successfully (hash: {})", hash),
        None => tracing::info!("No configuration file, using defaults and flags"),
    }

    let action = config.action()?;

    if cli.dry_run {
        handle_dry_run(&config, &action);
        return Ok(());
    }

    let summary = txtcrawl::run_action(config, action).await?;
    if !cli.quiet {
        print_summary(&summary);
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("txtcrawl=info,warn"),
            1 => EnvFilter::new("txtcrawl=debug,info"),
            2 => EnvFilter::new("txtcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, action: &Action) {
    println!("=== txtcrawl Dry Run ===\n");

    match action {
        Action::CrawlSeeds(path) => println!("Action: crawl seeds from {}", path.display()),
        Action::HarvestSeeds(path) => {
            println!("Action: harvest seeds from archives in {}", path.display())
        }
        Action::Extract(path) => {
            println!("Action: extract text from archives in {}", path.display())
        }
    }

    println!("\nCrawl:");
    if config.level == 0 {
        println!("  Level: unbounded");
    } else {
        println!("  Level: {}", config.level);
    }
    println!("  Workers: {}", config.nprocs);
    println!("  Language: {}", config.language);
    println!("  User agent: {}", config.user_agent);
    match config.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }

    println!("\nOutput:");
    match config.persist_mode() {
        PersistMode::TextTree(dir) => println!("  Text tree: {}", dir.display()),
        PersistMode::Warc(_) => {
            if let Some(path) = config.warc_output_path() {
                println!("  Archive: {}", path.display());
            }
        }
        PersistMode::None => println!("  Pages: not kept"),
    }
    println!("  Crawl log: {}", config.crawl_log.display());
    println!("  Rejected log: {}", config.rejected_log.display());
    println!("  Seed output: {}", config.seeds_out.display());
    if config.use_warc_outlinks {
        println!("  Archived outlinks: written as seeds");
    }

    println!("\n✓ Configuration is valid");
}
