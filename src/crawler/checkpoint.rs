//! Crawl checkpoint tracking
//!
//! The checkpoint boundary is the URL of the listing the store saw last. Listings are
//! walked newest-first, so the first time the crawl sees that URL again it has caught
//! up with everything already stored and can stop.

use crate::config::CrawlerConfig;
use crate::storage::{ListingStore, StorageResult};

/// Whether a walk should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Returns true iff `candidate` is exactly the boundary URL
///
/// Plain string equality: no case folding, trimming, or URL normalization. With no
/// boundary (empty store) or no candidate yet, nothing is ever reached.
///
/// # Examples
///
/// ```
/// use kerbside::crawler::reached;
///
/// assert!(reached(Some("https://a.tld/1"), Some("https://a.tld/1")));
/// assert!(!reached(Some("https://a.tld/1 "), Some("https://a.tld/1")));
/// assert!(!reached(Some("https://a.tld/1"), None));
/// assert!(!reached(None, None));
/// ```
pub fn reached(candidate: Option<&str>, boundary: Option<&str>) -> bool {
    match (candidate, boundary) {
        (Some(candidate), Some(boundary)) => candidate == boundary,
        _ => false,
    }
}

/// Reads the checkpoint boundary from the store
pub fn boundary<S: ListingStore + ?Sized>(store: &S) -> StorageResult<Option<String>> {
    store.latest_url()
}

/// State scoped to a single crawl run
///
/// The boundary is fixed when the context is created and never re-read; the last-seen
/// URL moves forward with every ingested listing.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    boundary: Option<String>,
    last_seen: Option<String>,
    max_pages: u32,
    max_slots: u32,
}

impl CrawlContext {
    pub fn new(boundary: Option<String>, max_pages: u32, max_slots: u32) -> Self {
        Self {
            boundary,
            last_seen: None,
            max_pages,
            max_slots,
        }
    }

    /// Builds the context for a run, reading the boundary from the store once
    pub fn from_store<S: ListingStore + ?Sized>(
        store: &S,
        config: &CrawlerConfig,
    ) -> StorageResult<Self> {
        Ok(Self::new(
            boundary(store)?,
            config.max_pages,
            config.max_slots,
        ))
    }

    pub fn boundary(&self) -> Option<&str> {
        self.boundary.as_deref()
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    /// Exclusive page ceiling
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Exclusive slot ceiling
    pub fn max_slots(&self) -> u32 {
        self.max_slots
    }

    /// Records the URL of the listing just ingested
    pub fn observe(&mut self, url: &str) {
        self.last_seen = Some(url.to_string());
    }

    /// True once the last-seen URL equals the boundary
    pub fn checkpoint_reached(&self) -> bool {
        reached(self.last_seen(), self.boundary())
    }
}
