//! Storage module for persisting listings
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Idempotent listing inserts keyed by listing identifier
//! - The insertion-ordered "latest listing" query behind the crawl checkpoint
//! - Run tracking for reporting

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{init_database, SqliteStorage};
pub use traits::{ListingStore, RunStore, StorageError, StorageResult};

use crate::listing::Listing;
use crate::KerbsideError;

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, KerbsideError> {
    SqliteStorage::new(path)
}

/// A listing as stored, with its insertion position and timestamp
#[derive(Debug, Clone)]
pub struct StoredListing {
    pub row_id: i64,
    pub listing: Listing,
    pub scraped_at: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub counts: RunCounts,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// Listings written to the store
    pub inserted: u64,

    /// Listings whose identifier was already stored
    pub skipped: u64,

    /// Slots that could not be turned into a listing
    pub extract_faults: u64,

    /// Listing pages fetched successfully
    pub pages_fetched: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Page and slot ceilings were walked to the end (or the fetcher gave out)
    Exhausted,
    /// The previously stored latest listing was met
    CheckpointReached,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Exhausted => "exhausted",
            Self::CheckpointReached => "checkpoint_reached",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "exhausted" => Some(Self::Exhausted),
            "checkpoint_reached" => Some(Self::CheckpointReached),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
