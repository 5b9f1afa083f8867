//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small listings site and run the real HTTP
//! fetcher, HTML extractor and SQLite store end-to-end.

use chrono::Utc;
use kerbside::config::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};
use kerbside::crawler::{run_crawl, CrawlOutcome};
use kerbside::listing::Listing;
use kerbside::storage::{ListingStore, RunStatus, RunStore, SqliteStorage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Three slots per page, three pages per run
const MAX_PAGES: u32 = 4;
const MAX_SLOTS: u32 = 4;

fn grid_selectors() -> SelectorConfig {
    let cell = |rest: &str| format!("#grid > div:nth-of-type({{slot}}) {rest}");
    SelectorConfig {
        link: cell("a.title"),
        make: cell("a.title > strong > span"),
        model: cell("a.title > span"),
        year: cell("a.title > strong"),
        fuel: cell(".fuel"),
        odometer: cell(".odo"),
        engine: cell(".engine"),
        gears: cell(".gears"),
        price: cell(".price"),
        location: cell(".location"),
        currency_symbol: "N$".to_string(),
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages: MAX_PAGES,
            max_slots: MAX_SLOTS,
            page_url_template: format!("{}/cars?page={{page}}", base_url),
            allowed_domain: "127.0.0.1".to_string(),
            request_timeout: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().to_string(),
        },
        selectors: grid_selectors(),
    }
}

fn listing_id(n: u32) -> String {
    format!("{}", 10_000_000 + n)
}

fn listing_url(base_url: &str, n: u32) -> String {
    format!("{}/cars/view/{}", base_url, listing_id(n))
}

/// Renders a listing page holding the given listing numbers, newest first
fn page_html(listings: &[u32]) -> String {
    let slots: String = listings
        .iter()
        .map(|n| {
            format!(
                r#"<div>
                  <a class="title" href="/cars/view/{id}"><strong>2019 <span>Toyota</span></strong> <span>Hilux</span></a>
                  <div class="fuel">Diesel</div>
                  <div class="odo">120 000 km</div>
                  <div class="engine">2.8L</div>
                  <div class="gears">Automatic</div>
                  <span class="price">N$ 450,000</span>
                  <div class="location">Windhoek</div>
                </div>"#,
                id = listing_id(*n)
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Cars</title></head><body><div id="grid">{}</div></body></html>"#,
        slots
    )
}

/// Mounts page `number` with the given listings
async fn mount_page(server: &MockServer, number: u32, listings: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", number.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(page_html(listings), "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts the standard site: listings 1..=9 over pages 1..=3
async fn mount_site(server: &MockServer) {
    mount_page(server, 1, &[1, 2, 3]).await;
    mount_page(server, 2, &[4, 5, 6]).await;
    mount_page(server, 3, &[7, 8, 9]).await;
}

#[tokio::test]
async fn test_full_crawl_into_empty_database() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.boundary, None);
    assert_eq!(report.counts.inserted, 9);
    assert_eq!(report.counts.skipped, 0);
    assert_eq!(report.counts.pages_fetched, 3);
    assert!(report.faults.is_empty());

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_listings().unwrap(), 9);
    assert_eq!(
        storage.latest_url().unwrap(),
        Some(listing_url(&base_url, 9))
    );

    let stored = storage.get_listing(&listing_id(1)).unwrap().unwrap();
    assert_eq!(stored.listing.url, listing_url(&base_url, 1));
    assert_eq!(stored.listing.make, "Toyota");
    assert_eq!(stored.listing.model, "Hilux");
    assert_eq!(stored.listing.year, "2019");
    assert_eq!(stored.listing.odometer, "120000");
    assert_eq!(stored.listing.engine, "2.8");
    assert_eq!(stored.listing.price, "450000");
    assert_eq!(stored.listing.location, "Windhoek");

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Exhausted);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.counts, report.counts);
    assert!(run.finished_at.is_some());
}

#[tokio::test]
async fn test_second_run_inserts_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    run_crawl(&config, "test-hash").await.unwrap();
    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::CheckpointReached);
    assert_eq!(report.boundary, Some(listing_url(&base_url, 9)));
    assert_eq!(report.counts.inserted, 0);
    assert_eq!(report.counts.skipped, 9);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_listings().unwrap(), 9);
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().status,
        RunStatus::CheckpointReached
    );
}

#[tokio::test]
async fn test_checkpoint_mid_page_skips_remaining_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, 1, &[1, 2, 3]).await;
    mount_page(&mock_server, 2, &[4, 5, 6]).await;

    // Page 3 must never be requested
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page_html(&[7, 8, 9]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    {
        let mut storage = SqliteStorage::new(&db_path).unwrap();
        let seen = Listing::new(listing_id(5), listing_url(&base_url, 5));
        storage.insert(&seen, Utc::now()).unwrap();
    }

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::CheckpointReached);
    assert_eq!(report.counts.inserted, 4);
    assert_eq!(report.counts.skipped, 1);
    assert_eq!(report.counts.pages_fetched, 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert!(storage.contains(&listing_id(4)).unwrap());
    assert!(!storage.contains(&listing_id(6)).unwrap());
}

#[tokio::test]
async fn test_server_error_ends_page_walk() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, 1, &[1, 2, 3]).await;

    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page_html(&[7, 8, 9]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.counts.inserted, 3);
    assert_eq!(report.counts.pages_fetched, 1);
    assert!(report.fetch_failure.unwrap().contains("500"));
}

#[tokio::test]
async fn test_slot_without_identifier_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let html = page_html(&[1, 2, 3]).replace(
        &format!("/cars/view/{}", listing_id(2)),
        "/cars/featured",
    );
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 2, &[4, 5, 6]).await;
    mount_page(&mock_server, 3, &[7, 8, 9]).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.counts.inserted, 8);
    assert_eq!(report.counts.extract_faults, 1);
    assert_eq!(report.faults[0].page, 1);
    assert_eq!(report.faults[0].slot, 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert!(storage.contains(&listing_id(3)).unwrap());
}

#[tokio::test]
async fn test_non_html_page_ends_page_walk() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"listings": []}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cars.db");
    let config = create_test_config(&base_url, &db_path);

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.counts.pages_fetched, 0);
    assert!(report.fetch_failure.is_some());
}
