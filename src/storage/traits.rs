//! Storage traits and error types
//!
//! This module defines the trait interfaces for storage backends and
//! associated error types.

use crate::listing::Listing;
use crate::storage::{RunCounts, RunRecord, RunStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Listing is missing its identifier or URL")]
    MissingIdentity,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable set of listings keyed by identifier
///
/// Implementations must remember insertion order: `latest_url` reports the URL of the
/// listing inserted last, whatever its identifier or URL look like.
pub trait ListingStore {
    /// URL of the most recently inserted listing, or None if the store is empty
    fn latest_url(&self) -> StorageResult<Option<String>>;

    /// Returns true if a listing with this identifier is stored
    fn contains(&self, listing_id: &str) -> StorageResult<bool>;

    /// Stores a listing stamped with `scraped_at`
    ///
    /// Inserting an identifier that is already stored is not an error: the stored row is
    /// left untouched and `Ok(false)` is returned. Any other failure is an error.
    fn insert(&mut self, listing: &Listing, scraped_at: DateTime<Utc>) -> StorageResult<bool>;
}

/// Bookkeeping for crawl runs
pub trait RunStore {
    /// Opens a new run in the `Running` state and returns its id
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Closes a run with its final status and counters
    fn finish_run(&mut self, run_id: i64, status: RunStatus, counts: &RunCounts)
        -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
