//! Jihanki Scraper main entry point
//!
//! This is the command-line interface for the Jihanki Scraper.

use anyhow::Context;
use clap::Parser;
use jihanki_scraper::config::{load_config, Config};
use jihanki_scraper::crawler::scrape_file;
use jihanki_scraper::output::{print_summary, RunSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Jihanki Scraper: a polite vending machine scraper
///
/// Reads a text document, finds every jihanki.sagase.com machine page it
/// links to, and writes the extracted records plus downloaded photographs
/// to the output directory.
#[derive(Parser, Debug)]
#[command(name = "jihanki-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A polite vending machine scraper", long_about = None)]
struct Cli {
    /// Text or markdown file containing machine page URLs
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory for machines.json and downloaded images
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    tracing::info!("Reading URLs from: {}", cli.input.display());
    tracing::info!("Output directory: {}", cli.output_dir.display());

    let (result, json_path) = scrape_file(&cli.input, &config, &cli.output_dir)
        .await
        .inspect_err(|e| tracing::error!("Scrape failed: {}", e))
        .context("Scrape failed")?;

    if !cli.quiet {
        print_summary(&RunSummary::from_result(&result), &json_path);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jihanki_scraper=info,warn"),
            1 => EnvFilter::new("jihanki_scraper=debug,info"),
            _ => EnvFilter::new("jihanki_scraper=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
