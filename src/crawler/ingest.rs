//! Listing ingestion
//!
//! Deduplicates extracted listings against the store by identifier and writes the new
//! ones, one committed insert per listing.

use crate::crawler::checkpoint::CrawlContext;
use crate::listing::Listing;
use crate::storage::{ListingStore, StorageResult};
use chrono::Utc;

/// Result of ingesting one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The listing was new and has been stored
    Inserted,
    /// A listing with the same identifier was already stored; nothing was written
    Skipped,
}

/// Writes listings to a store on behalf of a crawl run
#[derive(Debug)]
pub struct Ingestor<'s, S> {
    store: &'s mut S,
}

impl<'s, S: ListingStore> Ingestor<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Stores `listing` unless its identifier is already known
    ///
    /// Either way the context's last-seen URL moves to `listing.url`: the checkpoint is
    /// about which URL was seen, not whether it was written. Store failures are
    /// returned untouched and leave the context as it was.
    pub fn ingest(
        &mut self,
        listing: &Listing,
        ctx: &mut CrawlContext,
    ) -> StorageResult<IngestOutcome> {
        let outcome = if self.store.contains(&listing.listing_id)? {
            IngestOutcome::Skipped
        } else if self.store.insert(listing, Utc::now())? {
            IngestOutcome::Inserted
        } else {
            IngestOutcome::Skipped
        };

        tracing::debug!(
            listing_id = %listing.listing_id,
            url = %listing.url,
            ?outcome,
            "Ingested listing"
        );

        ctx.observe(&listing.url);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn listing(id: &str, url: &str, make: &str) -> Listing {
        Listing {
            make: make.to_string(),
            ..Listing::new(id, url)
        }
    }

    #[test]
    fn test_new_listing_is_inserted() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        let mut ctx = CrawlContext::new(None, 4, 15);

        let outcome = Ingestor::new(&mut store)
            .ingest(&listing("12345678", "https://a.tld/1", "Toyota"), &mut ctx)
            .unwrap();

        assert_eq!(outcome, IngestOutcome::Inserted);
        assert!(store.contains("12345678").unwrap());
        assert_eq!(ctx.last_seen(), Some("https://a.tld/1"));
    }

    #[test]
    fn test_known_listing_is_skipped_without_overwrite() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        let mut ctx = CrawlContext::new(None, 4, 15);

        {
            let mut ingestor = Ingestor::new(&mut store);
            ingestor
                .ingest(&listing("12345678", "https://a.tld/1", "Toyota"), &mut ctx)
                .unwrap();
            let outcome = ingestor
                .ingest(&listing("12345678", "https://a.tld/2", "Ford"), &mut ctx)
                .unwrap();
            assert_eq!(outcome, IngestOutcome::Skipped);
        }

        let stored = store.get_listing("12345678").unwrap().unwrap();
        assert_eq!(stored.listing.make, "Toyota");
        assert_eq!(stored.listing.url, "https://a.tld/1");
        assert_eq!(store.count_listings().unwrap(), 1);
    }

    #[test]
    fn test_skipped_listing_still_moves_last_seen() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        let mut ctx = CrawlContext::new(Some("https://a.tld/2".to_string()), 4, 15);

        let mut ingestor = Ingestor::new(&mut store);
        ingestor
            .ingest(&listing("12345678", "https://a.tld/1", "Toyota"), &mut ctx)
            .unwrap();
        ingestor
            .ingest(&listing("12345678", "https://a.tld/2", "Toyota"), &mut ctx)
            .unwrap();

        assert_eq!(ctx.last_seen(), Some("https://a.tld/2"));
        assert!(ctx.checkpoint_reached());
    }
}
