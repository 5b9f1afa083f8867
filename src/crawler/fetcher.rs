//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Refusing URLs outside the allowed domain
//! - GET requests to fetch listing pages
//! - Error classification
//!
//! There is no retry loop here; a failed page ends the page walk for the run.

use crate::config::{Config, UserAgentConfig};
use crate::url::is_allowed_url;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Body of a fetched listing page
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Final URL after redirects; relative listing links resolve against it
    pub url: Url,
    pub body: String,
}

/// Errors that end the page walk
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("URL {url} is outside the allowed domain")]
    Offsite { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Source of listing pages
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches one listing page
    async fn fetch(&self, url: &Url) -> Result<PageContent, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use kerbside::config::UserAgentConfig;
/// use kerbside::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "Kerbside".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent as `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Fetches listing pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    allowed_domain: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout)?;
        Ok(Self::with_client(client, &config.crawler.allowed_domain))
    }

    pub fn with_client(client: Client, allowed_domain: &str) -> Self {
        Self {
            client,
            allowed_domain: allowed_domain.to_string(),
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<PageContent, FetchError> {
        if !is_allowed_url(url, &self.allowed_domain) {
            return Err(FetchError::Offsite {
                url: url.to_string(),
            });
        }

        tracing::debug!(%url, "Fetching listing page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let final_url = response.url().clone();
        if !is_allowed_url(&final_url, &self.allowed_domain) {
            return Err(FetchError::Offsite {
                url: final_url.to_string(),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(FetchError::ContentMismatch {
                    url: final_url.to_string(),
                    content_type,
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(&final_url, e))?;

        Ok(PageContent {
            url: final_url,
            body,
        })
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
