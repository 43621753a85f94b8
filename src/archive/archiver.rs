//! Resource archiving
//!
//! Downloads the resources referenced by a page and saves them into the mirror.
//! Each distinct resource URL is downloaded at most once per crawl, whatever its
//! host: unlike pages, foreign-origin resources are archived.

use crate::archive::extractor::ResourceRef;
use crate::archive::mapper::MirrorPath;
use crate::crawler::{fetch_bytes, Pacer};
use crate::output::CrawlStatistics;
use crate::state::CrawlContext;
use crate::storage::{Storage, StorageError};
use crate::url::resolve_url;
use crate::Result;
use reqwest::Client;
use url::Url;

/// What happened to one resource reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Downloaded and saved during this page visit
    Archived(MirrorPath),

    /// Already archived earlier in the crawl; no request issued
    Reused(MirrorPath),

    /// Download failed now or earlier in the crawl; reference left unchanged
    Failed,

    /// Not an HTTP(S) URL (`data:`, `javascript:`, unparsable); left unchanged
    Unsupported,

    /// The URL is a page of this crawl (`<link rel="canonical">`, `rel="prev"`);
    /// left unchanged so the saved page is not overwritten
    CrawledPage,
}

impl ResourceStatus {
    /// Mirror location to rewrite the reference to, if any
    pub fn location(&self) -> Option<&MirrorPath> {
        match self {
            Self::Archived(path) | Self::Reused(path) => Some(path),
            Self::Failed | Self::Unsupported | Self::CrawledPage => None,
        }
    }
}

/// A resource reference paired with its archiving result
#[derive(Debug, Clone)]
pub struct ArchivedResource {
    pub reference: ResourceRef,
    pub status: ResourceStatus,
}

/// Downloads and saves page resources
pub struct ResourceArchiver<'a, S: Storage> {
    client: &'a Client,
    storage: &'a S,
    pacer: &'a Pacer,
}

impl<'a, S: Storage> ResourceArchiver<'a, S> {
    pub fn new(client: &'a Client, storage: &'a S, pacer: &'a Pacer) -> Self {
        Self {
            client,
            storage,
            pacer,
        }
    }

    /// Archives every reference of one page, sequentially and in order
    ///
    /// # Errors
    ///
    /// Only storage failures are returned; they abort the crawl. Download
    /// failures are recorded per reference as `ResourceStatus::Failed`.
    pub async fn archive_all(
        &self,
        context: &mut CrawlContext,
        stats: &mut CrawlStatistics,
        page_url: &Url,
        references: Vec<ResourceRef>,
    ) -> Result<Vec<ArchivedResource>> {
        let mut archived = Vec::with_capacity(references.len());

        for reference in references {
            let status = self
                .archive_one(context, stats, page_url, &reference)
                .await?;
            archived.push(ArchivedResource { reference, status });
        }

        Ok(archived)
    }

    async fn archive_one(
        &self,
        context: &mut CrawlContext,
        stats: &mut CrawlStatistics,
        page_url: &Url,
        reference: &ResourceRef,
    ) -> Result<ResourceStatus> {
        let url = match resolve_url(page_url, reference.value()) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(
                    "Not archiving {} '{}' on {}: {}",
                    reference.kind(),
                    reference.value(),
                    page_url,
                    e
                );
                stats.resources_unsupported += 1;
                return Ok(ResourceStatus::Unsupported);
            }
        };
        let key = url.as_str();

        if let Some(path) = context.archived_resource(key) {
            tracing::debug!("Resource {} already archived at {}", key, path);
            stats.resources_reused += 1;
            return Ok(ResourceStatus::Reused(path.clone()));
        }

        if context.is_visited(key) {
            tracing::debug!("Not archiving {} {}: it is a crawled page", reference.kind(), key);
            stats.resources_unsupported += 1;
            return Ok(ResourceStatus::CrawledPage);
        }

        if context.is_failed_resource(key) {
            tracing::debug!("Resource {} failed earlier in this crawl, not retrying", key);
            stats.resources_failed += 1;
            return Ok(ResourceStatus::Failed);
        }

        let path = match MirrorPath::for_resource(&url) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("Cannot map resource {} to a mirror path: {}", key, e);
                stats.resources_unsupported += 1;
                return Ok(ResourceStatus::Unsupported);
            }
        };

        self.pacer.wait().await;

        let body = match fetch_bytes(self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Resource download failed ({}): {}", reference.kind(), e);
                context.record_resource_failure(key);
                stats.resources_failed += 1;
                return Ok(ResourceStatus::Failed);
            }
        };

        match self.storage.save_file(&path, &body) {
            Ok(_) => {}
            Err(StorageError::PathConflict(at)) => {
                tracing::warn!(
                    "Cannot archive {} {}: {} is already taken in the mirror",
                    reference.kind(),
                    key,
                    at.display()
                );
                context.record_resource_failure(key);
                stats.resources_failed += 1;
                return Ok(ResourceStatus::Failed);
            }
            Err(e) => return Err(e.into()),
        }
        tracing::debug!("Archived {} {} -> {}", reference.kind(), key, path);

        stats.resources_archived += 1;
        stats.bytes_written += body.len() as u64;
        context.record_resource(key, path.clone());

        Ok(ResourceStatus::Archived(path))
    }
}
