//! Crawl statistics
//!
//! Counters collected while the crawl runs and the summary printed when it ends.

use crate::state::VisitOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Count of candidate page URLs by terminal outcome
    pub pages_by_outcome: HashMap<VisitOutcome, u64>,

    /// Resources downloaded and written to the mirror
    pub resources_archived: u64,

    /// References pointed at a resource archived earlier in the crawl
    pub resources_reused: u64,

    /// Resource downloads that failed
    pub resources_failed: u64,

    /// References left as written: not HTTP(S) URLs (data:, javascript:, ...)
    /// or pointing at a page of this crawl
    pub resources_unsupported: u64,

    /// Bytes written for pages and resources
    pub bytes_written: u64,
}

impl CrawlStatistics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            pages_by_outcome: HashMap::new(),
            resources_archived: 0,
            resources_reused: 0,
            resources_failed: 0,
            resources_unsupported: 0,
            bytes_written: 0,
        }
    }

    pub fn record_visit(&mut self, outcome: VisitOutcome) {
        *self.pages_by_outcome.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: VisitOutcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// Pages written to the mirror
    pub fn pages_saved(&self) -> u64 {
        self.count(VisitOutcome::Saved)
    }

    /// Page requests issued (successful or not)
    pub fn pages_fetched(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(outcome, _)| outcome.was_fetched())
            .map(|(_, count)| count)
            .sum()
    }

    /// Candidate page URLs considered
    pub fn total_candidates(&self) -> u64 {
        self.pages_by_outcome.values().sum()
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
    }

    /// Crawl duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Candidate pages: {}", stats.total_candidates());
    println!("  Pages fetched: {}", stats.pages_fetched());
    println!("  Pages saved: {}", stats.pages_saved());
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Pages by Outcome:");
    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    for (outcome, count) in outcome_counts {
        println!("  {}: {}", outcome, count);
    }
    println!();

    println!("Resources:");
    println!("  Archived: {}", stats.resources_archived);
    println!("  Reused: {}", stats.resources_reused);
    println!("  Failed: {}", stats.resources_failed);
    println!("  Not archivable: {}", stats.resources_unsupported);
    println!();

    println!("Bytes written: {}", stats.bytes_written);
}
