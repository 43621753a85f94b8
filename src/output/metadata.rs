use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Record written once to `metadata.json` when a crawl starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlMetadata {
    /// Seed URL of the crawl
    pub start_url: String,

    /// When the crawl started (RFC 3339)
    pub crawled_at: DateTime<Utc>,

    /// Configured maximum depth
    pub depth: u32,
}

impl CrawlMetadata {
    pub fn new(seed: &Url, crawled_at: DateTime<Utc>, depth: u32) -> Self {
        Self {
            start_url: seed.to_string(),
            crawled_at,
            depth,
        }
    }
}
