//! Listing slot walker
//!
//! Walks slots `1..max_slots` of one fetched page in order, newest listing first. The
//! checkpoint is checked before every slot; meeting it mid-page ends the whole crawl,
//! since every later slot and page is older than what the store already holds.

use crate::crawler::checkpoint::CrawlContext;
use crate::crawler::extractor::{ExtractError, SlotExtractor};
use crate::crawler::fetcher::PageContent;
use crate::listing::Listing;

/// What the walker found at a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    /// A listing ready for ingestion
    Listing { slot: u32, listing: Listing },

    /// The slot could not be extracted; the walk continues with the next slot
    Fault { slot: u32, error: ExtractError },

    /// The checkpoint was met before this slot; nothing more should be crawled
    CheckpointReached { slot: u32 },
}

/// Produces slot events for a single page
#[derive(Debug)]
pub struct SlotWalker<'p, E> {
    extractor: &'p E,
    page: &'p PageContent,
    next_slot: u32,
    max_slots: u32,
    finished: bool,
}

impl<'p, E: SlotExtractor> SlotWalker<'p, E> {
    pub fn new(extractor: &'p E, page: &'p PageContent, max_slots: u32) -> Self {
        Self {
            extractor,
            page,
            next_slot: 1,
            max_slots,
            finished: false,
        }
    }

    /// Returns the event for the next slot, or None once the page is done
    ///
    /// After a `CheckpointReached` event the walker is finished.
    pub fn next_event(&mut self, ctx: &CrawlContext) -> Option<SlotEvent> {
        if self.finished || self.next_slot >= self.max_slots {
            self.finished = true;
            return None;
        }

        let slot = self.next_slot;
        self.next_slot += 1;

        if ctx.checkpoint_reached() {
            self.finished = true;
            return Some(SlotEvent::CheckpointReached { slot });
        }

        let event = match self.extractor.extract(self.page, slot) {
            Ok(listing) if listing.has_identity() => SlotEvent::Listing { slot, listing },
            Ok(_) => SlotEvent::Fault {
                slot,
                error: ExtractError::IncompleteListing { slot },
            },
            Err(error) => SlotEvent::Fault { slot, error },
        };

        Some(event)
    }
}
