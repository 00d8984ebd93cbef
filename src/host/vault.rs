//! Filesystem-backed vault storage

use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use super::VaultStore;
use crate::error::PasteError;

/// A vault stored as a directory on disk
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open a vault rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of a vault-relative path
    pub fn resolve(&self, path: &str) -> PathBuf {
        let normalized = crate::paste::resolve::normalize(path);
        if normalized.is_empty() {
            self.root.clone()
        } else {
            self.root.join(normalized)
        }
    }
}

impl VaultStore for FsVault {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn create_folder(&self, path: &str) -> Result<(), PasteError> {
        let dir = self.resolve(path);
        debug!("Creating folder {}", dir.display());
        std::fs::create_dir_all(&dir).map_err(|e| PasteError::storage("create folder", path, e))
    }

    fn create_file(&self, path: &str, content: &str) -> Result<(), PasteError> {
        let file_path = self.resolve(path);
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .map_err(|e| PasteError::storage("create note", path, e))?;

        file.write_all(content.as_bytes())
            .map_err(|e| PasteError::storage("write note", path, e))?;

        info!("Created {}", file_path.display());
        Ok(())
    }
}
