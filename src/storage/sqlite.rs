//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the storage traits.

use crate::listing::Listing;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ListingStore, RunStore, StorageError, StorageResult};
use crate::storage::{RunCounts, RunRecord, RunStatus, StoredListing};
use crate::KerbsideError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const LISTING_COLUMNS: &str = "row_id, listing_id, url, make, model, year, fuel, odometer, \
     engine, gears, price, location, scraped_at";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, inserted, skipped, \
     extract_faults, pages_fetched";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`
    pub fn new(path: &Path) -> Result<Self, KerbsideError> {
        let conn = init_database(path)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    ///
    /// Nothing survives the value being dropped.
    pub fn new_in_memory() -> Result<Self, KerbsideError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Counts stored listings
    pub fn count_listings(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Gets a listing by its identifier
    pub fn get_listing(&self, listing_id: &str) -> StorageResult<Option<StoredListing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE listing_id = ?1");
        let listing = self
            .conn
            .query_row(&sql, params![listing_id], stored_listing_from_row)
            .optional()?;
        Ok(listing)
    }

    /// Gets the most recently inserted listings, newest first
    pub fn recent_listings(&self, limit: usize) -> StorageResult<Vec<StoredListing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings ORDER BY row_id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;

        let listings = stmt
            .query_map(params![limit as i64], stored_listing_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    /// Counts listings per make, most common first
    pub fn count_by_make(&self, limit: usize) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT make, COUNT(*) as count FROM listings GROUP BY make
             ORDER BY count DESC, make ASC LIMIT ?1",
        )?;

        let makes = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(makes)
    }
}

impl ListingStore for SqliteStorage {
    fn latest_url(&self) -> StorageResult<Option<String>> {
        let url = self
            .conn
            .query_row(
                "SELECT url FROM listings ORDER BY row_id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }

    fn contains(&self, listing_id: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM listings WHERE listing_id = ?1",
                params![listing_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&mut self, listing: &Listing, scraped_at: DateTime<Utc>) -> StorageResult<bool> {
        if !listing.has_identity() {
            return Err(StorageError::MissingIdentity);
        }

        // Only the identifier conflict is swallowed; other constraint failures surface
        let changed = self.conn.execute(
            "INSERT INTO listings (listing_id, url, make, model, year, fuel, odometer, engine,
             gears, price, location, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(listing_id) DO NOTHING",
            params![
                listing.listing_id,
                listing.url,
                listing.make,
                listing.model,
                listing.year,
                listing.fuel,
                listing.odometer,
                listing.engine,
                listing.gears,
                listing.price,
                listing.location,
                scraped_at.to_rfc3339(),
            ],
        )?;

        Ok(changed == 1)
    }
}

impl RunStore for SqliteStorage {
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        counts: &RunCounts,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, inserted = ?3, skipped = ?4,
             extract_faults = ?5, pages_fetched = ?6 WHERE id = ?7",
            params![
                status.to_db_string(),
                now,
                counts.inserted as i64,
                counts.skipped as i64,
                counts.extract_faults as i64,
                counts.pages_fetched as i64,
                run_id
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {RUN_COLUMNS} FROM runs WHERE id = ?1");
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {RUN_COLUMNS} FROM runs ORDER BY id DESC LIMIT 1");
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }
}

fn stored_listing_from_row(row: &Row<'_>) -> rusqlite::Result<StoredListing> {
    Ok(StoredListing {
        row_id: row.get(0)?,
        listing: Listing {
            listing_id: row.get(1)?,
            url: row.get(2)?,
            make: row.get(3)?,
            model: row.get(4)?,
            year: row.get(5)?,
            fuel: row.get(6)?,
            odometer: row.get(7)?,
            engine: row.get(8)?,
            gears: row.get(9)?,
            price: row.get(10)?,
            location: row.get(11)?,
        },
        scraped_at: row.get(12)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        counts: RunCounts {
            inserted: row.get::<_, i64>(5)? as u64,
            skipped: row.get::<_, i64>(6)? as u64,
            extract_faults: row.get::<_, i64>(7)? as u64,
            pages_fetched: row.get::<_, i64>(8)? as u64,
        },
    })
}

/// Initializes or opens a database at the given path
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(Connection)` - Successfully opened/created database
/// * `Err(rusqlite::Error)` - Failed to open database
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
