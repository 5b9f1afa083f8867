//! Statistics generation from the listings database
//!
//! This module provides functionality for extracting and displaying
//! listing statistics from the storage layer.

use crate::output::{summarize_run, RunSummary};
use crate::storage::{RunStore, SqliteStorage, StoredListing};
use crate::KerbsideError;

/// Number of makes shown in the statistics
const TOP_MAKES: usize = 10;

/// Number of recent listings shown in the statistics
const RECENT_LISTINGS: usize = 5;

/// Listing statistics summary
#[derive(Debug, Clone)]
pub struct ListingStatistics {
    /// Total number of stored listings
    pub total_listings: u64,

    /// Most recently stored listings, newest first; the first is the crawl checkpoint
    pub recent: Vec<StoredListing>,

    /// Most common makes with their listing counts
    pub top_makes: Vec<(String, u64)>,

    /// The latest crawl run, if any
    pub latest_run: Option<RunSummary>,
}

impl ListingStatistics {
    /// URL a new crawl would stop at
    pub fn checkpoint(&self) -> Option<&str> {
        self.recent.first().map(|stored| stored.listing.url.as_str())
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ListingStatistics)` - Successfully loaded statistics
/// * `Err(KerbsideError)` - Failed to query statistics
pub fn load_statistics(storage: &SqliteStorage) -> Result<ListingStatistics, KerbsideError> {
    let total_listings = storage.count_listings()?;
    let recent = storage.recent_listings(RECENT_LISTINGS)?;
    let top_makes = storage.count_by_make(TOP_MAKES)?;
    let latest_run = storage.get_latest_run()?.as_ref().map(summarize_run);

    Ok(ListingStatistics {
        total_listings,
        recent,
        top_makes,
        latest_run,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ListingStatistics) {
    println!("=== Listing Statistics ===\n");

    println!("Overview:");
    println!("  Total listings: {}", stats.total_listings);
    println!("  Checkpoint: {}", stats.checkpoint().unwrap_or("<none>"));
    println!();

    if !stats.top_makes.is_empty() {
        println!("Listings by Make:");
        for (make, count) in &stats.top_makes {
            let percentage = if stats.total_listings > 0 {
                (*count as f64 / stats.total_listings as f64) * 100.0
            } else {
                0.0
            };
            let make = if make.is_empty() { "<unknown>" } else { make };
            println!("  {}: {} ({:.1}%)", make, count, percentage);
        }
        println!();
    }

    if !stats.recent.is_empty() {
        println!("Most Recent Listings:");
        for stored in &stats.recent {
            let listing = &stored.listing;
            println!(
                "  [{}] {} {} {} - {} ({})",
                listing.listing_id,
                listing.year,
                listing.make,
                listing.model,
                listing.price,
                stored.scraped_at
            );
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  Run #{}: {}", run.run_id, run.status);
            println!("  Started: {}", run.started_at);
            if let Some(seconds) = run.duration_seconds {
                println!("  Duration: {}s", seconds);
            }
            println!(
                "  Inserted: {}, skipped: {}, extraction faults: {}, pages: {}",
                run.counts.inserted,
                run.counts.skipped,
                run.counts.extract_faults,
                run.counts.pages_fetched
            );
        }
        None => println!("No crawl runs recorded"),
    }
}
