//! Crawler coordinator - main crawl orchestration logic
//!
//! One run walks listing pages newest-first and, inside each page, listing slots
//! newest-first. Every extracted listing is ingested, and the walk ends on the first of:
//! - the checkpoint boundary being seen (everything older is already stored)
//! - the page and slot ceilings being exhausted
//! - a page that cannot be fetched
//! - a store failure, which aborts the run with an error

use crate::config::CrawlerConfig;
use crate::crawler::checkpoint::{CrawlContext, Flow};
use crate::crawler::extractor::SlotExtractor;
use crate::crawler::fetcher::{PageContent, PageFetcher};
use crate::crawler::ingest::{IngestOutcome, Ingestor};
use crate::crawler::pages::PageWalker;
use crate::crawler::slots::{SlotEvent, SlotWalker};
use crate::storage::{ListingStore, RunCounts, RunStatus, StorageResult};
use crate::KerbsideError;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Ceilings were exhausted (or a page could not be fetched) before the checkpoint
    Exhausted,
    /// The most recently stored listing was seen again
    CheckpointReached,
}

impl CrawlOutcome {
    /// Status recorded for the run
    pub fn run_status(self) -> RunStatus {
        match self {
            CrawlOutcome::Exhausted => RunStatus::Exhausted,
            CrawlOutcome::CheckpointReached => RunStatus::CheckpointReached,
        }
    }
}

/// A slot that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFault {
    pub page: u32,
    pub slot: u32,
    pub message: String,
}

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    pub counts: RunCounts,
    /// Boundary URL the run was checked against
    pub boundary: Option<String>,
    /// Set when the page walk ended on a fetch failure
    pub fetch_failure: Option<String>,
    pub faults: Vec<SlotFault>,
}

/// Drives one crawl run over a fetcher, an extractor and a store
#[derive(Debug)]
pub struct Crawler<F, E, S> {
    config: CrawlerConfig,
    fetcher: F,
    extractor: E,
    store: S,
    counts: RunCounts,
}

impl<F, E, S> Crawler<F, E, S>
where
    F: PageFetcher,
    E: SlotExtractor,
    S: ListingStore,
{
    pub fn new(config: &CrawlerConfig, fetcher: F, extractor: E, store: S) -> Self {
        Self {
            config: config.clone(),
            fetcher,
            extractor,
            store,
            counts: RunCounts::default(),
        }
    }

    /// Runs a complete crawl
    ///
    /// The boundary is read from the store once, before the first page is requested.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The run ended on the checkpoint or on exhaustion
    /// * `Err(KerbsideError)` - A store failure aborted the run; [`Crawler::counts`]
    ///   still holds what was done up to that point
    pub async fn run(&mut self) -> Result<CrawlReport, KerbsideError> {
        self.counts = RunCounts::default();

        let mut ctx = CrawlContext::from_store(&self.store, &self.config)?;
        let mut pages = PageWalker::new(&self.config.page_url_template, ctx.max_pages());
        let mut faults = Vec::new();
        let mut fetch_failure = None;

        tracing::info!(
            boundary = ctx.boundary().unwrap_or("<none>"),
            max_pages = ctx.max_pages(),
            max_slots = ctx.max_slots(),
            "Starting crawl"
        );

        while let Some(request) = pages.next_page(&ctx)? {
            tracing::debug!(page = request.number, url = %request.url, "Requesting page");

            let page = match self.fetcher.fetch(&request.url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(page = request.number, error = %e, "Fetch failed, ending page walk");
                    fetch_failure = Some(e.to_string());
                    break;
                }
            };
            self.counts.pages_fetched += 1;

            if self.walk_slots(request.number, &page, &mut ctx, &mut faults)? == Flow::Stop {
                break;
            }
        }

        let outcome = if ctx.checkpoint_reached() {
            CrawlOutcome::CheckpointReached
        } else {
            CrawlOutcome::Exhausted
        };

        tracing::info!(
            ?outcome,
            inserted = self.counts.inserted,
            skipped = self.counts.skipped,
            extract_faults = self.counts.extract_faults,
            pages_fetched = self.counts.pages_fetched,
            "Crawl finished"
        );

        Ok(CrawlReport {
            outcome,
            counts: self.counts,
            boundary: ctx.boundary().map(str::to_string),
            fetch_failure,
            faults,
        })
    }

    /// Walks the slots of one page, ingesting each listing
    fn walk_slots(
        &mut self,
        page_number: u32,
        page: &PageContent,
        ctx: &mut CrawlContext,
        faults: &mut Vec<SlotFault>,
    ) -> StorageResult<Flow> {
        let mut slots = SlotWalker::new(&self.extractor, page, ctx.max_slots());
        let mut ingestor = Ingestor::new(&mut self.store);

        while let Some(event) = slots.next_event(ctx) {
            match event {
                SlotEvent::Listing { listing, .. } => match ingestor.ingest(&listing, ctx)? {
                    IngestOutcome::Inserted => self.counts.inserted += 1,
                    IngestOutcome::Skipped => self.counts.skipped += 1,
                },
                SlotEvent::Fault { slot, error } => {
                    tracing::warn!(page = page_number, slot, error = %error, "Skipping slot");
                    self.counts.extract_faults += 1;
                    faults.push(SlotFault {
                        page: page_number,
                        slot,
                        message: error.to_string(),
                    });
                }
                SlotEvent::CheckpointReached { slot } => {
                    tracing::info!(page = page_number, slot, "Checkpoint reached, ending crawl");
                    return Ok(Flow::Stop);
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Counters of the current or most recent run
    pub fn counts(&self) -> RunCounts {
        self.counts
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
