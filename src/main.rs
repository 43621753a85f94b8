//! Sumi-Archive main entry point
//!
//! This is the command-line interface for the Sumi-Archive website mirror.

use clap::Parser;
use std::path::PathBuf;
use sumi_archive::config::{load_config, validate, Config};
use sumi_archive::crawler::run_crawl;
use sumi_archive::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Sumi-Archive: an offline website mirror
///
/// Sumi-Archive crawls a website from a seed URL, follows same-domain links
/// up to a maximum depth, and saves every page with its images, stylesheets
/// and scripts so the mirror can be browsed from a static file server.
#[derive(Parser, Debug)]
#[command(name = "sumi-archive")]
#[command(version)]
#[command(about = "An offline website mirror", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Output directory for the mirror (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Maximum link depth to follow (overrides the config file)
    #[arg(short, long, value_name = "DEPTH")]
    depth: Option<u32>,

    /// Delay before each request in milliseconds (overrides the config file)
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Archiving {} into {} (max depth {}, delay {}ms)",
        cli.url,
        config.output.directory,
        config.crawler.max_depth,
        config.crawler.delay_ms
    );

    match run_crawl(&cli.url, &config).await {
        Ok(stats) => {
            if !cli.quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Loads the config file (or defaults) and applies command-line overrides
fn resolve_config(cli: &Cli) -> sumi_archive::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.directory = output.to_string_lossy().into_owned();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_ms = delay;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_archive=info,warn"),
            1 => EnvFilter::new("sumi_archive=debug,info"),
            2 => EnvFilter::new("sumi_archive=trace,debug"),
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
