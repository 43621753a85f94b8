//! Storage module for persisting the mirror
//!
//! This module handles all filesystem writes for the archiver:
//! - Saving pages and resources at their mirror paths
//! - Writing the crawl metadata record
//! - Keeping every write inside the output root

mod filesystem;
mod traits;

pub use filesystem::{FilesystemStorage, METADATA_FILE};
pub use traits::{Storage, StorageError, StorageResult};
