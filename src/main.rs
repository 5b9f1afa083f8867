//! Kerbside main entry point
//!
//! This is the command-line interface for the Kerbside incremental listings crawler.

use anyhow::Context;
use clap::Parser;
use kerbside::config::{load_config_with_hash, Config};
use kerbside::crawler::{boundary, run_crawl};
use kerbside::output::{load_statistics, print_report, print_statistics};
use kerbside::storage::open_storage;
use kerbside::url::page_url;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Kerbside: an incremental vehicle listings crawler
///
/// Kerbside walks a classifieds site newest-first, stores every listing it has not
/// seen before, and stops as soon as it reaches the most recently stored listing.
#[derive(Parser, Debug)]
#[command(name = "kerbside")]
#[command(version)]
#[command(about = "An incremental vehicle listings crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kerbside=info,warn"),
            1 => EnvFilter::new("kerbside=debug,info"),
            2 => EnvFilter::new("kerbside=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let crawler = &config.crawler;

    println!("=== Kerbside Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Allowed domain: {}", crawler.allowed_domain);
    println!("  Page ceiling (exclusive): {}", crawler.max_pages);
    println!("  Slot ceiling (exclusive): {}", crawler.max_slots);
    println!("  Request timeout: {}s", crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nPages ({}):", crawler.max_pages - 1);
    for number in 1..crawler.max_pages {
        println!("  - {}", page_url(&crawler.page_url_template, number)?);
    }
    println!("  Slots 1..={} on each page", crawler.max_slots - 1);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let database = Path::new(&config.output.database_path);
    if database.exists() {
        let storage = open_storage(database)?;
        match boundary(&storage)? {
            Some(url) => println!("  Checkpoint: {}", url),
            None => println!("  Checkpoint: <none> (store is empty)"),
        }
    } else {
        println!("  Checkpoint: <none> (database does not exist yet)");
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would inspect at most {} listing slots",
        (crawler.max_pages - 1) * (crawler.max_slots - 1)
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (pages < {}, slots < {})",
        config.crawler.allowed_domain,
        config.crawler.max_pages,
        config.crawler.max_slots
    );

    let report = run_crawl(config, config_hash)
        .await
        .context("crawl failed")?;
    print_report(&report);

    Ok(())
}
