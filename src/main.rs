//! calling-codes main entry point
//!
//! Command-line interface: load settings, fetch the configured document through the
//! cache, extract calling codes, and write them as JSON.

use anyhow::Context;
use calling_codes::config::{load_config_with_hash, output_path, Config, DEFAULT_CONFIG_FILE};
use calling_codes::fetch::Origin;
use calling_codes::pipeline::run;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// calling-codes: fetch, cache and extract country calling codes
#[derive(Parser, Debug)]
#[command(name = "calling-codes")]
#[command(version)]
#[command(about = "Fetch a document and extract country calling codes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> anyhow::Result<()> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let summary = run(&config).await.context("harvest failed")?;

    let source = match summary.origin {
        Origin::Cache => "cache".to_string(),
        Origin::Network { attempts, .. } => format!("network, {} attempt(s)", attempts),
    };
    tracing::info!(
        "Done: {} record(s) written to {} ({} duplicate(s) dropped, source: {})",
        summary.records_written,
        summary.output.display(),
        summary.duplicates,
        source
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("calling_codes=info,warn"),
            1 => EnvFilter::new("calling_codes=debug,info"),
            2 => EnvFilter::new("calling_codes=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== calling-codes Dry Run ===\n");

    println!("Source:");
    println!("  Root URL: {}", config.root_url);

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Pre-flight delay: {}-{}s",
        config.fetch.min_delay_secs, config.fetch.max_delay_secs
    );
    println!("  Attempt timeout: {}s", config.fetch.attempt_timeout_secs);

    println!("\nExtraction:");
    println!("  Pattern: {}", config.extract.pattern);

    println!("\nOutput:");
    println!("  Cache directory: {}", config.cache_path);
    println!("  Records file: {}", output_path(config)?.display());

    println!("\n✓ Configuration is valid");

    Ok(())
}
