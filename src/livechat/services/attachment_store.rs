use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::livechat::models::Attachment;

/// Manages the files backing message attachments and composer previews.
///
/// Imported attachments are copied into the store so the message keeps
/// rendering after the user's original file moves or changes. Previews are
/// short-lived copies owned by the composer; each one is released exactly
/// once, when the selection is replaced or the composer goes away.
pub struct AttachmentStore {
    attachments_dir: PathBuf,
    previews_dir: PathBuf,
}

impl AttachmentStore {
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_local_dir()
            .context("Could not determine local data directory")?
            .join("livechat");

        Ok(Self::with_root(data_dir))
    }

    /// Store rooted at an explicit directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            attachments_dir: root.join("attachments"),
            previews_dir: root.join("previews"),
        }
    }

    /// Copy `source` into the store and return its durable record.
    /// The stored name carries a unique prefix so equal file names never
    /// collide.
    pub fn import(&self, source: &Path) -> Result<Attachment> {
        let name = file_name_of(source);
        let stored = self.copy_into(&self.attachments_dir, source, &name)?;

        debug!(?source, stored = %stored.display(), "Imported attachment");

        Ok(Attachment {
            name,
            url: stored.to_string_lossy().into_owned(),
        })
    }

    /// Snapshot `source` for the composer preview strip.
    pub fn preview(&self, source: &Path) -> Result<PreviewHandle> {
        let name = file_name_of(source);
        let stored = self.copy_into(&self.previews_dir, source, &name)?;

        Ok(PreviewHandle {
            path: stored,
            released: false,
        })
    }

    fn copy_into(&self, dir: &Path, source: &Path, name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let stored = dir.join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::copy(source, &stored)
            .with_context(|| format!("Failed to copy {} into store", source.display()))?;

        Ok(stored)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Owned handle to one preview file. Releasing removes the backing file;
/// dropping an unreleased handle releases it.
pub struct PreviewHandle {
    path: PathBuf,
    released: bool,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the backing file. Safe to call more than once; only the first
    /// call touches the filesystem.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "Failed to remove preview file");
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_and_source() -> (tempfile::TempDir, AttachmentStore, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::with_root(dir.path().join("store"));
        let source = dir.path().join("photo.png");
        fs::write(&source, b"fake image bytes").unwrap();
        (dir, store, source)
    }

    #[test]
    fn import_copies_the_file() {
        let (_dir, store, source) = store_and_source();

        let attachment = store.import(&source).unwrap();

        assert_eq!(attachment.name, "photo.png");
        let stored = PathBuf::from(&attachment.url);
        assert!(stored.exists());
        assert_eq!(fs::read(&stored).unwrap(), b"fake image bytes");
    }

    #[test]
    fn equal_names_get_distinct_urls() {
        let (_dir, store, source) = store_and_source();

        let first = store.import(&source).unwrap();
        let second = store.import(&source).unwrap();

        assert_eq!(first.name, second.name);
        assert_ne!(first.url, second.url);
    }

    #[test]
    fn import_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::with_root(dir.path().join("store"));

        assert!(store.import(&dir.path().join("nope.png")).is_err());
    }

    #[test]
    fn preview_release_removes_the_file_once() {
        let (_dir, store, source) = store_and_source();

        let mut handle = store.preview(&source).unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());

        handle.release();
        assert!(!path.exists());

        // A second release must not panic or warn about the same file twice.
        handle.release();
    }

    #[test]
    fn dropping_an_unreleased_preview_removes_the_file() {
        let (_dir, store, source) = store_and_source();

        let path = {
            let handle = store.preview(&source).unwrap();
            handle.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[test]
    fn previews_do_not_disturb_imported_attachments() {
        let (_dir, store, source) = store_and_source();

        let attachment = store.import(&source).unwrap();
        let mut handle = store.preview(&source).unwrap();
        handle.release();

        assert!(PathBuf::from(&attachment.url).exists());
    }
}
