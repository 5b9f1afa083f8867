//! Listing page walker
//!
//! Hands out page requests for pages `1..max_pages` (the ceiling itself is never
//! requested), newest page first, and stops early once the checkpoint is reached.

use crate::crawler::checkpoint::CrawlContext;
use crate::url::page_url;
use crate::UrlResult;
use url::Url;

/// A listing page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number; page 1 holds the newest listings
    pub number: u32,
    pub url: Url,
}

/// Produces page requests for one crawl run
#[derive(Debug, Clone)]
pub struct PageWalker {
    template: String,
    next_page: u32,
    max_pages: u32,
    finished: bool,
}

impl PageWalker {
    pub fn new(template: impl Into<String>, max_pages: u32) -> Self {
        Self {
            template: template.into(),
            next_page: 1,
            max_pages,
            finished: false,
        }
    }

    /// Returns the next page to fetch, or None when the walk is over
    ///
    /// The checkpoint is checked before every page using the URL of the last listing
    /// ingested so far. Once this returns None it keeps returning None.
    pub fn next_page(&mut self, ctx: &CrawlContext) -> UrlResult<Option<PageRequest>> {
        if self.finished {
            return Ok(None);
        }

        if ctx.checkpoint_reached() {
            tracing::info!(
                page = self.next_page,
                "Checkpoint reached before page, ending page walk"
            );
            self.finished = true;
            return Ok(None);
        }

        if self.next_page >= self.max_pages {
            self.finished = true;
            return Ok(None);
        }

        let number = self.next_page;
        let url = page_url(&self.template, number)?;
        self.next_page += 1;

        Ok(Some(PageRequest { number, url }))
    }

    /// Number of the page that would be requested next
    pub fn position(&self) -> u32 {
        self.next_page
    }
}
