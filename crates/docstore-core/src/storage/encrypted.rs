//! Passphrase-encrypted filesystem backend.
//!
//! Writes go to a staging file in the store root first. The envelope is
//! finished (trailing chunk and tag flushed), the staging file is synced,
//! and only then is it linked into place under its final name with a
//! no-clobber rename. Readers therefore see either no document or a
//! complete one, and a second writer for the same name fails with
//! `AlreadyExists` instead of replacing the first.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::config::StoreConfig;
use super::traits::PassphraseStore;
use crate::envelope;
use crate::error::{DocstoreError, Result};
use crate::fs::{discard, document_path, staging_file, sync_dir};

/// Encrypted document store rooted at an existing directory.
#[derive(Debug, Clone)]
pub struct EncryptedFilesystemStore {
    root: PathBuf,
    config: StoreConfig,
}

impl EncryptedFilesystemStore {
    /// Store with the default native envelope and work factor.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: StoreConfig::default(),
        }
    }

    /// Store with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::KeyDerivationFailed` if the configured work
    /// factor is outside the format's range.
    pub fn with_config(root: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: root.into(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn write_envelope(
        &self,
        temp: &mut NamedTempFile,
        plaintext: &[u8],
        passphrase: &str,
    ) -> Result<()> {
        let sink = BufWriter::new(temp.as_file_mut());
        let mut writer = envelope::encrypt_to(
            sink,
            passphrase,
            self.config.format,
            self.config.effective_work_factor(),
        )?;
        writer.write_all(plaintext)?;

        // Envelope first, then the buffered file writer, then the disk.
        let sink = writer.finish()?;
        sink.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        Ok(())
    }
}

impl PassphraseStore for EncryptedFilesystemStore {
    fn write(&self, name: &str, plaintext: &[u8], passphrase: &str) -> Result<PathBuf> {
        let target = document_path(&self.root, name)?;

        // Fail fast before paying for key derivation. The no-clobber
        // persist below is what actually enforces exclusivity.
        if target.symlink_metadata().is_ok() {
            return Err(DocstoreError::AlreadyExists(name.to_string()));
        }

        debug!(name, format = %self.config.format, "writing encrypted document");

        let mut temp = staging_file(&self.root)?;
        if let Err(err) = self.write_envelope(&mut temp, plaintext, passphrase) {
            discard(temp);
            return Err(err);
        }

        if let Err(err) = temp.persist_noclobber(&target) {
            let kind = err.error.kind();
            discard(err.file);
            return Err(if kind == std::io::ErrorKind::AlreadyExists {
                DocstoreError::AlreadyExists(name.to_string())
            } else {
                DocstoreError::Io { source: err.error }
            });
        }
        // The new name is only durable once the directory entry is.
        sync_dir(&self.root)?;

        debug!(name, path = %target.display(), "stored encrypted document");
        Ok(target)
    }

    fn read(&self, name: &str, passphrase: &str) -> Result<Vec<u8>> {
        let path = document_path(&self.root, name)?;
        let file = File::open(&path).map_err(|e| DocstoreError::from_open(e, name))?;

        debug!(name, "reading encrypted document");

        let mut reader = envelope::decrypt_from(BufReader::new(file), passphrase)?;
        let mut plaintext = Vec::new();
        reader
            .read_to_end(&mut plaintext)
            .map_err(envelope::map_stream_error)?;
        Ok(plaintext)
    }
}
