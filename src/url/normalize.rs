use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the form used as a crawl-set key
///
/// Both the visited-page set and the downloaded-resource set are keyed by the
/// string form of the URL returned here, so two references to the same document
/// collapse to one entry.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed. Parsing already lowercases the host,
///    drops the scheme's default port and resolves `.`/`..` path segments
/// 2. Reject schemes other than `http` and `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after `#`)
///
/// Query strings and trailing slashes are kept verbatim: `/docs` and `/docs/`
/// are different documents on most servers.
///
/// # Examples
///
/// ```
/// use sumi_archive::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves `reference` against `base` and normalizes the result
///
/// Used for `href`/`src` values found inside a page, which may be relative.
pub fn resolve_url(base: &Url, reference: &str) -> UrlResult<Url> {
    let url = base
        .join(reference.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);

    Ok(url)
}
