use crate::archive::MirrorPath;
use crate::output::CrawlMetadata;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the crawl metadata record
pub const METADATA_FILE: &str = "metadata.json";

/// Storage backed by a directory tree on the local filesystem
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    /// Opens (and creates, if absent) the output root
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            path: root.clone(),
            source,
        })?;

        Ok(Self { root })
    }

    fn write(&self, target: &Path, contents: &[u8]) -> StorageResult<()> {
        if !target.starts_with(&self.root) {
            return Err(StorageError::OutsideRoot(target.to_path_buf()));
        }

        self.check_conflict(target)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(target, contents).map_err(|source| StorageError::Io {
            path: target.to_path_buf(),
            source,
        })
    }

    /// Fails if `target` is a directory or any of its directories below the
    /// root is a file
    fn check_conflict(&self, target: &Path) -> StorageResult<()> {
        if target.is_dir() {
            return Err(StorageError::PathConflict(target.to_path_buf()));
        }

        let blocked = target
            .ancestors()
            .skip(1)
            .take_while(|ancestor| *ancestor != self.root.as_path())
            .find(|ancestor| ancestor.exists() && !ancestor.is_dir());

        match blocked {
            Some(ancestor) => Err(StorageError::PathConflict(ancestor.to_path_buf())),
            None => Ok(()),
        }
    }
}

impl Storage for FilesystemStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    fn save_file(&self, path: &MirrorPath, contents: &[u8]) -> StorageResult<PathBuf> {
        let target = path.to_path(&self.root);
        self.write(&target, contents)?;
        tracing::debug!("Wrote {} bytes to {}", contents.len(), target.display());
        Ok(target)
    }

    fn write_metadata(&self, metadata: &CrawlMetadata) -> StorageResult<PathBuf> {
        let target = self.root.join(METADATA_FILE);
        let json = serde_json::to_vec_pretty(metadata)?;
        self.write(&target, &json)?;
        Ok(target)
    }
}
