//! Listing slot extraction
//!
//! Turns one slot of a fetched listing page into a [`Listing`]. Selectors come from the
//! configuration as templates with a `{slot}` placeholder, so the site-specific grid
//! layout never leaks into the crawl logic.

use crate::config::SelectorConfig;
use crate::crawler::fetcher::PageContent;
use crate::listing::Listing;
use crate::url::resolve_href;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;

/// Listing identifiers are the first run of eight or more digits in the link
static LISTING_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{8,})").expect("listing id pattern is valid")
});

/// Why a slot could not be turned into a listing
///
/// Faults are per slot: the walk carries on with the next slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("slot {slot} has no listing link")]
    MissingLink { slot: u32 },

    #[error("slot {slot} link '{href}' has no listing identifier")]
    MissingIdentifier { slot: u32, href: String },

    #[error("slot {slot} produced a listing without identifier or URL")]
    IncompleteListing { slot: u32 },

    #[error("invalid {field} selector: {message}")]
    InvalidSelector { field: String, message: String },
}

/// Source of listings for the slots of a page
pub trait SlotExtractor {
    /// Extracts the listing in 1-based `slot` of `page`
    fn extract(&self, page: &PageContent, slot: u32) -> Result<Listing, ExtractError>;
}

/// Extracts listings from HTML with CSS selector templates
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    selectors: SelectorConfig,
}

impl HtmlExtractor {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    /// Extracts the listing in `slot` from an already parsed document
    pub fn extract_from(
        &self,
        document: &Html,
        page: &PageContent,
        slot: u32,
    ) -> Result<Listing, ExtractError> {
        let link = select_first(document, "link", &self.selectors.link, slot)?
            .ok_or(ExtractError::MissingLink { slot })?;
        let href = link
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingLink { slot })?;

        let listing_id = LISTING_ID_REGEX
            .captures(href)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ExtractError::MissingIdentifier {
                slot,
                href: href.to_string(),
            })?;

        let url = resolve_href(href, &page.url).ok_or(ExtractError::MissingLink { slot })?;

        let field = |name: &str, template: &str| -> Result<String, ExtractError> {
            let text = select_first(document, name, template, slot)?
                .map(own_text)
                .unwrap_or_default();
            if text.is_empty() {
                tracing::debug!(slot, field = name, "Listing field is empty");
            }
            Ok(text)
        };

        Ok(Listing {
            listing_id,
            url,
            make: field("make", &self.selectors.make)?,
            model: field("model", &self.selectors.model)?,
            year: field("year", &self.selectors.year)?,
            fuel: field("fuel", &self.selectors.fuel)?,
            odometer: clean_odometer(&field("odometer", &self.selectors.odometer)?),
            engine: clean_engine(&field("engine", &self.selectors.engine)?),
            gears: field("gears", &self.selectors.gears)?,
            price: clean_price(
                &field("price", &self.selectors.price)?,
                &self.selectors.currency_symbol,
            ),
            location: field("location", &self.selectors.location)?,
        })
    }
}

impl SlotExtractor for HtmlExtractor {
    fn extract(&self, page: &PageContent, slot: u32) -> Result<Listing, ExtractError> {
        let document = Html::parse_document(&page.body);
        self.extract_from(&document, page, slot)
    }
}

fn select_first<'a>(
    document: &'a Html,
    field: &str,
    template: &str,
    slot: u32,
) -> Result<Option<ElementRef<'a>>, ExtractError> {
    let css = template.replace("{slot}", &slot.to_string());
    let selector = Selector::parse(&css).map_err(|e| ExtractError::InvalidSelector {
        field: field.to_string(),
        message: format!("{:?}", e),
    })?;

    Ok(document.select(&selector).next())
}

/// Text directly inside the element, ignoring nested elements
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_string()
}

/// `"120 000 km"` becomes `"120000"`
fn clean_odometer(raw: &str) -> String {
    raw.replace("km", "").split_whitespace().collect()
}

/// `"2.4L"` becomes `"2.4"`
fn clean_engine(raw: &str) -> String {
    raw.replace('L', "").trim().to_string()
}

/// `"N$ 350,000"` becomes `"350000"`
fn clean_price(raw: &str, currency_symbol: &str) -> String {
    let without_symbol = if currency_symbol.is_empty() {
        raw.to_string()
    } else {
        raw.replace(currency_symbol, "")
    };
    without_symbol.replace(',', "").trim().to_string()
}
