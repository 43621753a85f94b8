//! HTML parser for extracting page links
//!
//! Only `<a href>` targets are followed as pages. Embedded assets (`img`,
//! `link`, `script`) are handled by the archive module instead.

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a>` element in document order
///
/// # Exclusions
///
/// - Empty hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same page anchors)
///
/// The returned values are raw attribute values; resolving them against the
/// page URL is the caller's job.
///
/// # Example
///
/// ```
/// use sumi_archive::crawler::extract_link_hrefs;
///
/// let html = r##"<a href="/about">About</a><a href="#top">Top</a>"##;
/// assert_eq!(extract_link_hrefs(html), vec!["/about".to_string()]);
/// ```
pub fn extract_link_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_followable(href))
        .map(str::to_string)
        .collect()
}

/// Returns false for hrefs that can never lead to a page
fn is_followable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}
