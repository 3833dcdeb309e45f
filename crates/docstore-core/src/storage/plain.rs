//! Plain filesystem backend.
//!
//! Stores documents unencrypted. Writes replace any existing document;
//! there is no exclusivity or authentication. Use
//! [`EncryptedFilesystemStore`](super::EncryptedFilesystemStore) for those.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::traits::DocumentStore;
use crate::error::{DocstoreError, Result};

/// Unencrypted document store rooted at an existing directory.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FilesystemStore {
    fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = crate::fs::document_path(&self.root, name)?;
        crate::fs::replace_atomic(&self.root, &path, data)?;
        debug!(name, bytes = data.len(), "wrote plain document");
        Ok(path)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = crate::fs::document_path(&self.root, name)?;
        fs::read(&path).map_err(|e| DocstoreError::from_open(e, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_lands_under_root() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path());

        let dst = store.write("hello.txt", b"Hello world\n").unwrap();

        assert!(dst.starts_with(store.root()));
        assert_eq!(fs::read(&dst).unwrap(), b"Hello world\n");
        assert_eq!(store.read("hello.txt").unwrap(), b"Hello world\n");
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path());

        store.write("note.txt", b"first").unwrap();
        store.write("note.txt", b"second").unwrap();

        assert_eq!(store.read("note.txt").unwrap(), b"second");
    }

    #[test]
    fn test_read_missing() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path());

        assert!(matches!(
            store.read("nonexistent"),
            Err(DocstoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path());

        assert!(matches!(
            store.write("../escape.txt", b"x"),
            Err(DocstoreError::InvalidName(_))
        ));
    }
}
