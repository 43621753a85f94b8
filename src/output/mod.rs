//! Output module for crawl records and reports
//!
//! This module handles:
//! - The `metadata.json` record written at crawl start
//! - Crawl statistics and the printed summary

mod metadata;
pub mod stats;

pub use metadata::CrawlMetadata;
pub use stats::{print_statistics, CrawlStatistics};
