//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl from the seed page:
//! - Writing the crawl metadata record
//! - Applying the visited/depth/domain policy to each candidate page
//! - Sequencing fetch, resource archiving, rewriting and saving per page
//! - Following same-domain links depth-first, pacing every request
//!
//! Traversal uses an explicit LIFO work stack. A page's links are pushed in
//! reverse document order, so they are popped (and their subtrees completed) in
//! document order, exactly as a recursive depth-first visit would.

use crate::archive::{extract_resources, rewrite_references, MirrorPath, PageDocument, ResourceArchiver};
use crate::config::Config;
use crate::crawler::{build_http_client, extract_link_hrefs, fetch_page, Pacer};
use crate::output::{CrawlMetadata, CrawlStatistics};
use crate::state::{CrawlContext, VisitOutcome};
use crate::storage::{FilesystemStorage, Storage, StorageError};
use crate::url::{is_same_host, normalize_url, resolve_url};
use crate::{Result, UrlError};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A candidate page waiting on the work stack
#[derive(Debug)]
struct PendingVisit {
    /// The href as written in the referring page
    href: String,

    /// The href resolved against the referring page and normalized
    target: std::result::Result<Url, UrlError>,

    depth: u32,
}

/// Main crawler coordinator structure
///
/// One coordinator runs one crawl; its context is not reset between runs.
pub struct Coordinator<S: Storage = FilesystemStorage> {
    seed: Url,
    context: CrawlContext,
    storage: S,
    client: Client,
    pacer: Pacer,
    stats: CrawlStatistics,
}

impl Coordinator<FilesystemStorage> {
    /// Creates a coordinator writing to `config.output.directory`
    ///
    /// # Errors
    ///
    /// Fails if the seed is not an absolute HTTP(S) URL, the output directory
    /// cannot be created, or the HTTP client cannot be built.
    pub fn new(seed: &str, config: &Config) -> Result<Self> {
        let storage = FilesystemStorage::new(&config.output.directory)?;
        Self::with_storage(seed, config, storage)
    }
}

impl<S: Storage> Coordinator<S> {
    /// Creates a coordinator writing to the given storage
    pub fn with_storage(seed: &str, config: &Config, storage: S) -> Result<Self> {
        let seed = normalize_url(seed)?;
        let delay = Duration::from_millis(config.crawler.delay_ms);
        let context = CrawlContext::new(&seed, config.crawler.max_depth, delay, storage.root())?;

        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;

        let pacer = Pacer::new(context.delay());

        Ok(Self {
            seed,
            context,
            storage,
            client,
            pacer,
            stats: CrawlStatistics::new(Utc::now()),
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn context(&self) -> &CrawlContext {
        &self.context
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs the crawl to completion
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned (storage failures). Page and resource
    /// fetch failures are logged and counted in the returned statistics.
    pub async fn run(&mut self) -> Result<CrawlStatistics> {
        let started_at = Utc::now();
        self.stats = CrawlStatistics::new(started_at);

        let metadata = CrawlMetadata::new(&self.seed, started_at, self.context.max_depth());
        let metadata_path = self.storage.write_metadata(&metadata)?;
        tracing::debug!("Wrote crawl metadata to {}", metadata_path.display());

        tracing::info!(
            "Starting crawl of {} (max depth {}, delay {}ms) into {}",
            self.seed,
            self.context.max_depth(),
            self.context.delay().as_millis(),
            self.context.output_root().display()
        );

        let mut pending = vec![PendingVisit {
            href: self.seed.to_string(),
            target: Ok(self.seed.clone()),
            depth: 0,
        }];

        while let Some(visit) = pending.pop() {
            // Every link visit is paced; the seed goes out immediately
            if visit.depth > 0 {
                self.pacer.wait().await;
            }

            let (outcome, links) = self.visit(visit).await?;
            self.stats.record_visit(outcome);

            pending.extend(links.into_iter().rev());
        }

        self.stats.finish(Utc::now());

        tracing::info!(
            "Crawl completed: {} pages saved, {} resources archived in {}s",
            self.stats.pages_saved(),
            self.stats.resources_archived,
            self.stats.duration_seconds().unwrap_or(0)
        );

        Ok(self.stats.clone())
    }

    /// Processes one candidate page
    ///
    /// Returns the terminal outcome and, for fetched pages below the depth
    /// limit, the page's links in document order. Links of a page whose save
    /// hit a path conflict are still followed.
    async fn visit(&mut self, visit: PendingVisit) -> Result<(VisitOutcome, Vec<PendingVisit>)> {
        let PendingVisit {
            href,
            target,
            depth,
        } = visit;

        let url = match target {
            Ok(url) => url,
            Err(UrlError::InvalidScheme(reason)) => {
                tracing::debug!("Skipping non-HTTP link '{}': {}", href, reason);
                return Ok((VisitOutcome::SkippedInvalidUrl, Vec::new()));
            }
            Err(e) => {
                tracing::warn!("Skipping invalid link '{}': {}", href, e);
                return Ok((VisitOutcome::SkippedInvalidUrl, Vec::new()));
            }
        };
        let key = url.as_str();

        if self.context.is_visited(key) {
            tracing::trace!("Already visited {}", key);
            return Ok((VisitOutcome::SkippedVisited, Vec::new()));
        }

        if !self.context.within_depth(depth) {
            tracing::debug!("Skipping {} beyond max depth ({})", key, depth);
            return Ok((VisitOutcome::SkippedDepth, Vec::new()));
        }

        if !is_same_host(&url, self.context.base_host()) {
            tracing::debug!("Skipping {} (not on {})", key, self.context.base_host());
            return Ok((VisitOutcome::SkippedDomain, Vec::new()));
        }

        // Marked before the fetch: a failed page is never requested again
        self.context.mark_visited(key);

        tracing::info!("Fetching page {} (depth {})", url, depth);
        let body = match fetch_page(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}", e);
                return Ok((VisitOutcome::FailedFetch, Vec::new()));
            }
        };

        let document = PageDocument::parse(&body);
        let references = extract_resources(&document);

        let archiver = ResourceArchiver::new(&self.client, &self.storage, &self.pacer);
        let archived = archiver
            .archive_all(&mut self.context, &mut self.stats, &url, references)
            .await?;

        let rewritten = rewrite_references(&archived);

        let html = document.serialize()?;
        let page_path = MirrorPath::for_page(&url)?;
        let outcome = match self.storage.save_file(&page_path, html.as_bytes()) {
            Ok(_) => {
                self.stats.bytes_written += html.len() as u64;
                tracing::info!(
                    "Saved {} -> {} ({} of {} references rewritten)",
                    url,
                    page_path,
                    rewritten,
                    archived.len()
                );
                VisitOutcome::Saved
            }
            Err(StorageError::PathConflict(at)) => {
                tracing::warn!(
                    "Cannot save page {}: {} is already taken in the mirror",
                    url,
                    at.display()
                );
                VisitOutcome::FailedSave
            }
            Err(e) => return Err(e.into()),
        };

        let links = if self.context.should_follow_links(depth) {
            extract_link_hrefs(&body)
                .into_iter()
                .map(|href| PendingVisit {
                    target: resolve_url(&url, &href),
                    href,
                    depth: depth + 1,
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok((outcome, links))
    }
}

/// Runs a complete crawl from `seed` with the given configuration
///
/// # Example
///
/// ```no_run
/// use sumi_archive::config::Config;
/// use sumi_archive::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_crawl("https://example.com/", &Config::default()).await?;
/// println!("{} pages saved", stats.pages_saved());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(seed: &str, config: &Config) -> Result<CrawlStatistics> {
    let mut coordinator = Coordinator::new(seed, config)?;
    coordinator.run().await
}
