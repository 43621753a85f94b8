//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the archiver:
//! - Building the HTTP client with the identifying user agent and timeout
//! - Single GET requests for pages and resources
//! - Error classification
//!
//! There are no retries: every failure is final for the unit of work it affects.

use crate::config::UserAgentConfig;
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A failed fetch, carrying the URL and a diagnostic
#[derive(Debug, Error)]
#[error("Failed to fetch {url}: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Network(String),
}

impl FetchError {
    fn new(url: &Url, kind: FetchErrorKind) -> Self {
        Self {
            url: url.to_string(),
            kind,
        }
    }

    fn classify(url: &Url, e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            FetchErrorKind::Timeout
        } else if e.is_connect() {
            FetchErrorKind::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchErrorKind::Body(e.to_string())
        } else {
            FetchErrorKind::Network(e.to_string())
        };
        Self::new(url, kind)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is `CrawlerName/Version`. Redirects follow reqwest's default
/// policy.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_archive::config::UserAgentConfig;
/// use sumi_archive::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the raw body
///
/// # Error Classification
///
/// | Condition | Kind |
/// |-----------|------|
/// | Request exceeded the client timeout | `Timeout` |
/// | Connection refused, DNS failure, TLS error | `Connect` |
/// | Non-2xx status | `Status` |
/// | Body could not be read or decoded | `Body` |
/// | Anything else | `Network` |
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = send(client, url).await?;

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::classify(url, e))?;

    Ok(body.to_vec())
}

/// Fetches a page and decodes the body as text
///
/// The charset comes from the `Content-Type` header, defaulting to UTF-8.
/// Invalid byte sequences are replaced rather than rejected.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = send(client, url).await?;

    response
        .text()
        .await
        .map_err(|e| FetchError::classify(url, e))
}

/// Issues the GET and rejects non-2xx responses
async fn send(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(url, FetchErrorKind::Status(status.as_u16())));
    }

    Ok(response)
}
