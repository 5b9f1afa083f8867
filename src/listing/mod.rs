//! Vehicle listing records
//!
//! A [`Listing`] is what the extractor produces for one slot of a listing page and what
//! the store persists. Every field is kept as the text the site shows; no numeric
//! coercion happens at this layer.

/// A single vehicle listing as extracted from the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Numeric-looking identifier taken from the listing URL (unique per listing)
    pub listing_id: String,

    /// Absolute URL of the listing detail page
    pub url: String,

    pub make: String,
    pub model: String,
    pub year: String,
    pub fuel: String,

    /// Odometer reading with units and spacing removed
    pub odometer: String,

    /// Engine displacement with the litre suffix removed
    pub engine: String,

    pub gears: String,

    /// Asking price with currency symbol and thousands separators removed
    pub price: String,

    pub location: String,
}

impl Listing {
    /// Creates a listing with only its identity set
    ///
    /// Descriptive fields start empty and are filled in by the extractor.
    pub fn new(listing_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            url: url.into(),
            make: String::new(),
            model: String::new(),
            year: String::new(),
            fuel: String::new(),
            odometer: String::new(),
            engine: String::new(),
            gears: String::new(),
            price: String::new(),
            location: String::new(),
        }
    }

    /// Returns true if both identity fields are present
    ///
    /// Listings without an identifier or URL are never stored.
    pub fn has_identity(&self) -> bool {
        !self.listing_id.trim().is_empty() && !self.url.trim().is_empty()
    }
}
