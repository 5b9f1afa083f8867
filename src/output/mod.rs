//! Output module for crawl reports and listing statistics
//!
//! This module handles:
//! - Formatting the report of a finished crawl run
//! - Summarizing recorded runs from storage
//! - Displaying listing statistics

pub mod stats;

pub use stats::{load_statistics, print_statistics, ListingStatistics};

use crate::crawler::{CrawlOutcome, CrawlReport};
use crate::storage::{RunCounts, RunRecord};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// A recorded crawl run, ready for display
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,
    pub counts: RunCounts,
}

/// Builds a run summary from a stored run record
///
/// The duration is only known once the run has finished and both timestamps parse.
pub fn summarize_run(run: &RunRecord) -> RunSummary {
    let duration_seconds = match (
        run.started_at.parse::<DateTime<Utc>>(),
        run.finished_at.as_deref().map(str::parse::<DateTime<Utc>>),
    ) {
        (Ok(started), Some(Ok(finished))) => {
            Some((finished - started).num_seconds().max(0) as u64)
        }
        _ => None,
    };

    RunSummary {
        run_id: run.id,
        started_at: run.started_at.clone(),
        finished_at: run.finished_at.clone(),
        duration_seconds,
        status: run.status.to_db_string().to_string(),
        config_hash: run.config_hash.clone(),
        counts: run.counts,
    }
}

/// Formats the report of a finished crawl run
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let outcome = match report.outcome {
        CrawlOutcome::CheckpointReached => "checkpoint reached",
        CrawlOutcome::Exhausted => "ceilings exhausted",
    };

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Report ===\n");
    let _ = writeln!(out, "Outcome: {}", outcome);
    let _ = writeln!(
        out,
        "Checkpoint: {}",
        report.boundary.as_deref().unwrap_or("<none>")
    );
    let _ = writeln!(out, "Pages fetched: {}", report.counts.pages_fetched);
    let _ = writeln!(out, "Listings inserted: {}", report.counts.inserted);
    let _ = writeln!(out, "Listings already stored: {}", report.counts.skipped);
    let _ = writeln!(out, "Extraction faults: {}", report.counts.extract_faults);

    if let Some(failure) = &report.fetch_failure {
        let _ = writeln!(out, "Page walk ended early: {}", failure);
    }

    if !report.faults.is_empty() {
        let _ = writeln!(out, "\nSkipped slots:");
        for fault in &report.faults {
            let _ = writeln!(
                out,
                "  page {} slot {}: {}",
                fault.page, fault.slot, fault.message
            );
        }
    }

    out
}

/// Prints the report of a finished crawl run to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SlotFault;
    use crate::storage::RunStatus;

    #[test]
    fn test_summarize_finished_run() {
        let run = RunRecord {
            id: 7,
            started_at: "2024-03-01T10:00:00Z".to_string(),
            finished_at: Some("2024-03-01T10:01:30Z".to_string()),
            config_hash: "abc".to_string(),
            status: RunStatus::CheckpointReached,
            counts: RunCounts::default(),
        };

        let summary = summarize_run(&run);
        assert_eq!(summary.run_id, 7);
        assert_eq!(summary.duration_seconds, Some(90));
        assert_eq!(summary.status, "checkpoint_reached");
    }

    #[test]
    fn test_summarize_running_run_has_no_duration() {
        let run = RunRecord {
            id: 1,
            started_at: "2024-03-01T10:00:00Z".to_string(),
            finished_at: None,
            config_hash: "abc".to_string(),
            status: RunStatus::Running,
            counts: RunCounts::default(),
        };

        assert_eq!(summarize_run(&run).duration_seconds, None);
    }

    #[test]
    fn test_format_report() {
        let report = CrawlReport {
            outcome: CrawlOutcome::CheckpointReached,
            counts: RunCounts {
                inserted: 18,
                skipped: 1,
                extract_faults: 1,
                pages_fetched: 2,
            },
            boundary: Some("https://a.tld/cars/12345678".to_string()),
            fetch_failure: None,
            faults: vec![SlotFault {
                page: 1,
                slot: 3,
                message: "slot 3 has no listing link".to_string(),
            }],
        };

        let text = format_report(&report);
        assert!(text.contains("Outcome: checkpoint reached"));
        assert!(text.contains("Checkpoint: https://a.tld/cars/12345678"));
        assert!(text.contains("Listings inserted: 18"));
        assert!(text.contains("page 1 slot 3: slot 3 has no listing link"));
        assert!(!text.contains("ended early"));
    }
}
