//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with typed failures
//! - Link extraction from fetched pages
//! - Request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pacer;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchError, FetchErrorKind};
pub use pacer::Pacer;
pub use parser::extract_link_hrefs;
