use crate::{UrlError, UrlResult};
use url::Url;

/// Placeholder replaced with the page number in the page URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Builds the URL of a listing page from the configured template
///
/// # Arguments
///
/// * `template` - URL template containing a `{page}` placeholder
/// * `page` - 1-based page number (page 1 is the newest listings)
///
/// # Returns
///
/// * `Ok(Url)` - The absolute http(s) page URL
/// * `Err(UrlError)` - The template has no placeholder or does not form a valid URL
///
/// # Examples
///
/// ```
/// use kerbside::url::page_url;
///
/// let url = page_url("https://example.com/cars?page={page}", 3).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/cars?page=3");
/// ```
pub fn page_url(template: &str, page: u32) -> UrlResult<Url> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(UrlError::MissingPlaceholder(template.to_string()));
    }

    let raw = template.replace(PAGE_PLACEHOLDER, &page.to_string());
    let url = Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Resolves a listing href against the page it was found on
///
/// Returns None for empty, fragment-only, and non-http(s) links.
pub fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://www.targetdomain.tld/?module=cars&page=1").unwrap()
    }

    #[test]
    fn test_page_url_substitutes_number() {
        let url = page_url(
            "https://www.targetdomain.tld/?module=cars&order_to=desc&page={page}",
            2,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.targetdomain.tld/?module=cars&order_to=desc&page=2"
        );
    }

    #[test]
    fn test_page_url_requires_placeholder() {
        let result = page_url("https://example.com/cars", 1);
        assert!(matches!(result, Err(UrlError::MissingPlaceholder(_))));
    }

    #[test]
    fn test_page_url_rejects_non_http() {
        let result = page_url("ftp://example.com/{page}", 1);
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_page_url_rejects_garbage() {
        let result = page_url("not a url {page}", 1);
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_resolve_relative_href() {
        let resolved = resolve_href("/cars/toyota-hilux-12345678", &base_url());
        assert_eq!(
            resolved,
            Some("https://www.targetdomain.tld/cars/toyota-hilux-12345678".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_href_unchanged() {
        let href = "https://www.targetdomain.tld/cars/12345678";
        assert_eq!(resolve_href(href, &base_url()), Some(href.to_string()));
    }

    #[test]
    fn test_resolve_skips_fragments_and_scripts() {
        assert_eq!(resolve_href("#top", &base_url()), None);
        assert_eq!(resolve_href("   ", &base_url()), None);
        assert_eq!(resolve_href("javascript:void(0)", &base_url()), None);
    }
}
