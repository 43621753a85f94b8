//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlContext`: visited pages, archived resources, and crawl limits shared by every visit
//! - `VisitOutcome`: the terminal state of each candidate page URL

mod context;
mod outcome;

// Re-export main types
pub use context::CrawlContext;
pub use outcome::VisitOutcome;
