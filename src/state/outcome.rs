//! Visit outcome definitions for tracking crawl progress
//!
//! Every candidate page URL ends the crawl in exactly one of these states.
use std::fmt;

/// Terminal state of one candidate page URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitOutcome {
    // ===== Terminal Success States =====
    /// Page was fetched, its resources archived and references rewritten, and saved
    Saved,

    // ===== Terminal Skip States =====
    /// URL was already fetched earlier in this crawl
    SkippedVisited,

    /// URL sits deeper than the configured maximum depth
    SkippedDepth,

    /// URL is on a different host than the seed
    SkippedDomain,

    /// URL could not be parsed or is not an HTTP(S) URL with a host
    SkippedInvalidUrl,

    // ===== Terminal Error States =====
    /// Page fetch failed (network error, timeout, non-success status)
    FailedFetch,

    /// Page was fetched but its mirror path is taken by an archived resource
    FailedSave,
}

impl VisitOutcome {
    /// Returns true if this represents a successful visit
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// Returns true if the URL was skipped by crawl policy without a request
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::SkippedVisited | Self::SkippedDepth | Self::SkippedDomain | Self::SkippedInvalidUrl
        )
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FailedFetch | Self::FailedSave)
    }

    /// Returns true if an HTTP request was issued for the page
    pub fn was_fetched(&self) -> bool {
        matches!(self, Self::Saved | Self::FailedFetch | Self::FailedSave)
    }

    /// Short machine-readable name of the outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::SkippedVisited => "skipped_visited",
            Self::SkippedDepth => "skipped_depth",
            Self::SkippedDomain => "skipped_domain",
            Self::SkippedInvalidUrl => "skipped_invalid_url",
            Self::FailedFetch => "failed_fetch",
            Self::FailedSave => "failed_save",
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> [Self; 7] {
        [
            Self::Saved,
            Self::SkippedVisited,
            Self::SkippedDepth,
            Self::SkippedDomain,
            Self::SkippedInvalidUrl,
            Self::FailedFetch,
            Self::FailedSave,
        ]
    }
}

impl fmt::Display for VisitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Saved => "Saved",
            Self::SkippedVisited => "Skipped (already visited)",
            Self::SkippedDepth => "Skipped (depth limit)",
            Self::SkippedDomain => "Skipped (other domain)",
            Self::SkippedInvalidUrl => "Skipped (invalid URL)",
            Self::FailedFetch => "Failed fetch",
            Self::FailedSave => "Failed save (path conflict)",
        };
        write!(f, "{}", s)
    }
}
