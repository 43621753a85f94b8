//! URL to mirror-path mapping
//!
//! A `MirrorPath` is the location of an archived file relative to the output
//! root, kept as a list of already-sanitized segments whose first element is the
//! host. The same value renders both the filesystem path (`to_path`) and the
//! root-relative reference written back into pages (`web_path`).

use crate::url::extract_host;
use crate::UrlError;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Default document for directory-like page URLs
const INDEX_PAGE: &str = "index.html";

/// Suffix given to page files without an extension
const PAGE_SUFFIX: &str = ".html";

/// Default file name for directory-like resource URLs
const INDEX_RESOURCE: &str = "index";

/// Longest file or directory name written, in bytes
const MAX_SEGMENT_LEN: usize = 200;

/// Location of an archived file relative to the output root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirrorPath {
    segments: Vec<String>,
}

/// Which default-document rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Page,
    Resource,
}

impl MirrorPath {
    /// Maps a page URL
    ///
    /// # Mapping Rules
    ///
    /// | URL path | File |
    /// |----------|------|
    /// | empty or `/` | `<host>/index.html` |
    /// | `/docs/` | `<host>/docs/index.html` |
    /// | `/blog/post` | `<host>/blog/post.html` |
    /// | `/about.php` | `<host>/about.php` |
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_archive::archive::MirrorPath;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/blog/post").unwrap();
    /// let path = MirrorPath::for_page(&url).unwrap();
    /// assert_eq!(path.web_path(), "/example.com/blog/post.html");
    /// ```
    pub fn for_page(url: &Url) -> Result<Self, UrlError> {
        Self::map(url, Target::Page)
    }

    /// Maps a resource URL
    ///
    /// Resources keep their literal last segment; a directory-like path (the
    /// host root included) maps to a file named `index`.
    pub fn for_resource(url: &Url) -> Result<Self, UrlError> {
        Self::map(url, Target::Resource)
    }

    fn map(url: &Url, target: Target) -> Result<Self, UrlError> {
        let host = extract_host(url).ok_or(UrlError::MissingHost)?;

        let mut segments = vec![sanitize_host(&host)];

        let path = url.path();
        let mut raw: Vec<&str> = path.split('/').collect();
        let file_raw = raw.pop().unwrap_or_default();

        segments.extend(
            raw.into_iter()
                .filter(|s| is_navigable(s))
                .map(sanitize_segment),
        );

        let file_name = if is_navigable(file_raw) {
            let name = sanitize_segment(file_raw);
            if target == Target::Page && !has_extension(&name) {
                let stem = truncate_to(name, MAX_SEGMENT_LEN - PAGE_SUFFIX.len());
                format!("{}{}", stem, PAGE_SUFFIX)
            } else {
                name
            }
        } else {
            match target {
                Target::Page => INDEX_PAGE.to_string(),
                Target::Resource => INDEX_RESOURCE.to_string(),
            }
        };
        segments.push(file_name);

        Ok(Self { segments })
    }

    /// The sanitized host directory this file lives under
    pub fn host(&self) -> &str {
        &self.segments[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Filesystem location under `root`
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }

    /// Root-relative reference to this file, e.g. `/cdn.other.com/a/b/style.css`
    pub fn web_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for MirrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.web_path())
    }
}

/// Empty, `.` and `..` segments never become directory names
fn is_navigable(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

fn has_extension(name: &str) -> bool {
    match name.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < name.len(),
        None => false,
    }
}

/// IPv6 hosts come bracketed and full of colons
fn sanitize_host(host: &str) -> String {
    sanitize_segment(host.trim_start_matches('[').trim_end_matches(']'))
}

/// Replaces characters that are not portable in file names
fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    truncate_to(cleaned, MAX_SEGMENT_LEN)
}

/// Cuts `segment` to at most `max` bytes on a char boundary
fn truncate_to(mut segment: String, max: usize) -> String {
    if segment.len() > max {
        let mut end = max;
        while !segment.is_char_boundary(end) {
            end -= 1;
        }
        segment.truncate(end);
    }
    segment
}
