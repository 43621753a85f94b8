//! Storage traits and error types
//!
//! This module defines the trait interface for mirror storage backends and
//! associated error types.

use crate::archive::MirrorPath;
use crate::output::CrawlMetadata;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// `PathConflict` concerns a single file and is handled by the caller. Every
/// other storage error is fatal to the crawl: it means the output location
/// cannot hold the mirror.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Another archived file already occupies the path, or one of its
    /// directories, with the other file type
    #[error("Mirror path already taken: {}", .0.display())]
    PathConflict(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to write outside the output root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for mirror storage implementations
pub trait Storage {
    /// Root directory of the mirror
    fn root(&self) -> &Path;

    /// Writes one archived file, creating parent directories as needed
    ///
    /// # Returns
    ///
    /// The absolute location the file was written to
    fn save_file(&self, path: &MirrorPath, contents: &[u8]) -> StorageResult<PathBuf>;

    /// Writes `metadata.json` at the mirror root
    fn write_metadata(&self, metadata: &CrawlMetadata) -> StorageResult<PathBuf>;
}
