use serde::Deserialize;

/// Main configuration structure for Kerbside
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Exclusive page ceiling: pages 1..max_pages-1 are walked
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Exclusive slot ceiling: slots 1..max_slots-1 are walked on each page
    #[serde(rename = "max-slots")]
    pub max_slots: u32,

    /// Listing page URL with a `{page}` placeholder for the page number
    #[serde(rename = "page-url-template")]
    pub page_url_template: String,

    /// Only URLs on this domain (or its subdomains) are fetched
    #[serde(rename = "allowed-domain")]
    pub allowed_domain: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// CSS selector templates for the listing grid
///
/// Each template carries a `{slot}` placeholder that is replaced with the 1-based slot
/// index before the selector is parsed. Text is read from the matched element's own
/// text nodes; the link is read from its `href` attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SelectorConfig {
    pub link: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub fuel: String,
    pub odometer: String,
    pub engine: String,
    pub gears: String,
    pub price: String,
    pub location: String,

    /// Currency prefix stripped from prices
    pub currency_symbol: String,
}

const GRID: &str = "body > div:nth-of-type(9) > div:nth-of-type(5) > div:nth-of-type(2) > div:nth-of-type(5)";

impl Default for SelectorConfig {
    fn default() -> Self {
        let title = |rest: &str| format!("{GRID} > div:nth-of-type({{slot}}) > {rest}");
        let specs = |n: u32| {
            format!("{GRID} > a:nth-of-type({{slot}}) > div:nth-of-type(3) > div:nth-of-type({n})")
        };

        Self {
            link: title("div:nth-of-type(1) > a"),
            make: title("div:nth-of-type(1) > a > strong > span"),
            model: title("div:nth-of-type(1) > a > span"),
            year: title("div:nth-of-type(1) > a > strong"),
            fuel: specs(3),
            odometer: specs(1),
            engine: specs(4),
            gears: specs(2),
            price: title("div:nth-of-type(3) > span:nth-of-type(1)"),
            location: specs(5),
            currency_symbol: "N$".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Field name and template pairs, in listing field order
    pub fn templates(&self) -> [(&'static str, &str); 10] {
        [
            ("link", &self.link),
            ("make", &self.make),
            ("model", &self.model),
            ("year", &self.year),
            ("fuel", &self.fuel),
            ("odometer", &self.odometer),
            ("engine", &self.engine),
            ("gears", &self.gears),
            ("price", &self.price),
            ("location", &self.location),
        ]
    }
}
