use url::Url;

/// Extracts the host from a URL
///
/// The `url` crate already lowercases domain hosts; the extra lowercasing keeps
/// the result stable for hosts it leaves alone. The port is not part of the host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_archive::url::extract_host;
///
/// let url = Url::parse("https://Example.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` is on `base_host`
///
/// This is the same-domain policy for pages: hostnames must match exactly, so
/// `blog.example.com` is a different site from `example.com`.
pub fn is_same_host(url: &Url, base_host: &str) -> bool {
    extract_host(url).is_some_and(|host| host == base_host)
}
