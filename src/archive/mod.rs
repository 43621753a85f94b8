//! Archive module: turning fetched pages into a self-contained mirror
//!
//! This module contains the per-page archiving pipeline:
//! - Parsing pages into a mutable document
//! - Extracting resource references (images, stylesheets, scripts, linked assets)
//! - Downloading each distinct resource once and saving it
//! - Mapping URLs to mirror paths
//! - Rewriting references to point at the archived copies

mod archiver;
mod document;
mod extractor;
mod mapper;
mod rewriter;

pub use archiver::{ArchivedResource, ResourceArchiver, ResourceStatus};
pub use document::PageDocument;
pub use extractor::{extract_resources, ResourceKind, ResourceRef};
pub use mapper::MirrorPath;
pub use rewriter::rewrite_references;
