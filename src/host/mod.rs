//! Host collaborators - clipboard, vault storage, active note and insertion
//!
//! The paste engine never performs I/O itself. These traits are the seams the
//! host layer plugs into, with filesystem-backed implementations for a local
//! Markdown vault.

mod clipboard;
mod document;
mod vault;

pub use clipboard::{StaticClipboard, SystemClipboard};
pub use document::{DocumentInserter, Selection};
pub use vault::FsVault;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::PasteError;
use crate::paste::PasteContext;

/// Source of clipboard text for pastes not triggered by a paste gesture
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// Read the current plain text. `None` means there is no plain-text
    /// representation, which is different from empty text.
    async fn read_text(&self) -> Option<String>;
}

/// Folder and file storage of the vault, addressed by vault-relative paths
pub trait VaultStore {
    /// Whether a folder or file exists
    fn exists(&self, path: &str) -> bool;

    /// Create a folder and its parents. An existing folder is not an error.
    fn create_folder(&self, path: &str) -> Result<(), PasteError>;

    /// Create a new file. An existing file is an error.
    fn create_file(&self, path: &str, content: &str) -> Result<(), PasteError>;
}

/// Inserts text into the active note, replacing the current selection
pub trait TextInserter {
    fn insert(&mut self, text: &str) -> Result<(), PasteError>;
}

/// The note open at the moment of the paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    /// Vault-relative path, including extension
    pub path: String,

    /// File name without extension
    pub base_name: String,

    /// Vault-relative containing folder ("" for the vault root)
    pub folder: String,
}

impl ActiveDocument {
    /// Describe a note from its vault-relative path, e.g. `Journal/Note.md`
    pub fn from_vault_path(path: &str) -> Self {
        let path = crate::paste::resolve::normalize(path);
        let (folder, file_name) = match path.rsplit_once('/') {
            Some((folder, name)) => (folder.to_string(), name.to_string()),
            None => (String::new(), path.clone()),
        };
        let base_name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file_name,
        };

        Self {
            path,
            base_name,
            folder,
        }
    }

    /// Capture the paste context at `now`
    pub fn context(&self, now: DateTime<Local>) -> PasteContext {
        PasteContext::new(&self.base_name, &self.folder, now)
    }
}
