//! Crawler module for incremental listing crawls
//!
//! This module contains the core crawling logic, including:
//! - Checkpoint tracking against the most recently stored listing
//! - Page and slot walking with exclusive ceilings
//! - HTTP fetching and HTML slot extraction
//! - Deduplicating ingestion and overall crawl coordination

mod checkpoint;
mod coordinator;
mod extractor;
mod fetcher;
mod ingest;
mod pages;
mod slots;

pub use checkpoint::{boundary, reached, CrawlContext, Flow};
pub use coordinator::{CrawlOutcome, CrawlReport, Crawler, SlotFault};
pub use extractor::{ExtractError, HtmlExtractor, SlotExtractor};
pub use fetcher::{
    build_http_client, user_agent_string, FetchError, HttpFetcher, PageContent, PageFetcher,
};
pub use ingest::{IngestOutcome, Ingestor};
pub use pages::{PageRequest, PageWalker};
pub use slots::{SlotEvent, SlotWalker};

use crate::config::Config;
use crate::storage::{open_storage, RunStatus, RunStore};
use crate::KerbsideError;
use std::path::Path;

/// Runs a complete crawl operation against the configured site and database
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the storage database
/// 2. Build the HTTP fetcher and HTML extractor
/// 3. Record a new run
/// 4. Crawl until the checkpoint or the ceilings
/// 5. Record how the run ended, including partial counts for failed runs
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(KerbsideError)` - Crawl failed with an error
///
/// # Example
///
/// ```no_run
/// use kerbside::config::load_config_with_hash;
/// use kerbside::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let report = run_crawl(&config, &hash).await?;
/// println!("{} new listings", report.counts.inserted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlReport, KerbsideError> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let fetcher = HttpFetcher::new(config)?;
    let extractor = HtmlExtractor::new(config.selectors.clone());

    let run_id = storage.create_run(config_hash)?;
    tracing::info!(run_id, "Created crawl run");

    let mut crawler = Crawler::new(&config.crawler, fetcher, extractor, storage);
    let result = crawler.run().await;

    let status = match &result {
        Ok(report) => report.outcome.run_status(),
        Err(e) => {
            tracing::error!(run_id, error = %e, "Crawl run failed");
            RunStatus::Failed
        }
    };

    let counts = crawler.counts();
    if let Err(e) = crawler.store_mut().finish_run(run_id, status, &counts) {
        if result.is_ok() {
            return Err(e.into());
        }
        tracing::error!(run_id, error = %e, "Failed to record run status");
    }

    result
}
