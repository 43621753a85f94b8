//! Shared crawl context
//!
//! One `CrawlContext` lives for the duration of one crawl and is owned by the
//! coordinator. Its membership sets only ever grow.

use crate::archive::MirrorPath;
use crate::url::extract_host;
use crate::UrlError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// State shared by every page visit of a crawl
#[derive(Debug)]
pub struct CrawlContext {
    /// Normalized URLs already fetched as pages (successfully or not)
    visited_pages: HashSet<String>,

    /// Normalized resource URLs already archived, with their mirror location
    downloaded_resources: HashMap<String, MirrorPath>,

    /// Normalized resource URLs whose download failed
    failed_resources: HashSet<String>,

    /// Host of the seed URL
    base_host: String,

    max_depth: u32,
    delay: Duration,
    output_root: PathBuf,
}

impl CrawlContext {
    /// Creates the context for a crawl starting at `seed`
    ///
    /// # Errors
    ///
    /// Returns `UrlError::MissingHost` if the seed has no host.
    pub fn new(
        seed: &Url,
        max_depth: u32,
        delay: Duration,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self, UrlError> {
        let base_host = extract_host(seed).ok_or(UrlError::MissingHost)?;

        Ok(Self {
            visited_pages: HashSet::new(),
            downloaded_resources: HashMap::new(),
            failed_resources: HashSet::new(),
            base_host,
            max_depth,
            delay,
            output_root: output_root.into(),
        })
    }

    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns true if a page at `depth` may still be visited
    pub fn within_depth(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    /// Returns true if links found on a page at `depth` should be followed
    pub fn should_follow_links(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited_pages.contains(key)
    }

    /// Records a page URL as visited
    ///
    /// Returns false if it was already present.
    pub fn mark_visited(&mut self, key: &str) -> bool {
        self.visited_pages.insert(key.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited_pages.len()
    }

    /// Returns the mirror location of an already archived resource
    pub fn archived_resource(&self, key: &str) -> Option<&MirrorPath> {
        self.downloaded_resources.get(key)
    }

    pub fn record_resource(&mut self, key: &str, path: MirrorPath) {
        self.downloaded_resources.insert(key.to_string(), path);
    }

    pub fn resource_count(&self) -> usize {
        self.downloaded_resources.len()
    }

    pub fn is_failed_resource(&self, key: &str) -> bool {
        self.failed_resources.contains(key)
    }

    pub fn record_resource_failure(&mut self, key: &str) {
        self.failed_resources.insert(key.to_string());
    }
}
