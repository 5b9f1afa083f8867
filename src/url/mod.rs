//! URL handling module for Kerbside
//!
//! This module builds listing page URLs from the configured template, resolves
//! listing links against the page they were found on, and enforces the allowed
//! source domain.

mod domain;
mod matcher;
mod template;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::is_allowed_domain;
pub use template::{page_url, resolve_href, PAGE_PLACEHOLDER};

use ::url::Url;

/// Returns true if the URL's host is the allowed domain or one of its subdomains
///
/// URLs without a host are never allowed.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kerbside::url::is_allowed_url;
///
/// let url = Url::parse("https://www.targetdomain.tld/?page=1").unwrap();
/// assert!(is_allowed_url(&url, "targetdomain.tld"));
/// assert!(!is_allowed_url(&url, "otherdomain.tld"));
/// ```
pub fn is_allowed_url(url: &Url, allowed_domain: &str) -> bool {
    extract_domain(url)
        .map(|domain| is_allowed_domain(allowed_domain, &domain))
        .unwrap_or(false)
}
