//! URL handling module for Sumi-Archive
//!
//! This module provides the crawl-set key normalization, relative reference
//! resolution, and the host extraction behind the same-domain policy.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, is_same_host};
pub use normalize::{normalize_url, resolve_url};
