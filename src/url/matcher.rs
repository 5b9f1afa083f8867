/// Checks if a domain falls under the allowed domain
///
/// The allowed domain matches itself and every subdomain below it, so
/// `targetdomain.tld` admits `www.targetdomain.tld`. A leading `*.` on the pattern is
/// accepted and means the same thing.
///
/// # Examples
///
/// ```
/// use kerbside::url::is_allowed_domain;
///
/// assert!(is_allowed_domain("example.com", "example.com"));
/// assert!(is_allowed_domain("example.com", "www.example.com"));
/// assert!(is_allowed_domain("*.example.com", "api.v2.example.com"));
/// assert!(!is_allowed_domain("example.com", "notexample.com"));
/// ```
pub fn is_allowed_domain(pattern: &str, candidate: &str) -> bool {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern).to_lowercase();
    let candidate = candidate.to_lowercase();

    candidate == base || candidate.ends_with(&format!(".{}", base))
}
