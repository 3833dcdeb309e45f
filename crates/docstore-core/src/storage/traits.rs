//! Store capability traits.
//!
//! Two distinct capabilities share the same read/write shape. The plain
//! backend stores bytes as-is; the encrypted backend additionally takes a
//! passphrase on every call. Keeping them as separate traits means code
//! written against `PassphraseStore` cannot be handed a plain store, and
//! cannot forget the passphrase.

use std::path::PathBuf;

use crate::error::Result;

/// Plain document storage: whole-document writes and reads, no encryption.
pub trait DocumentStore {
    /// Store `data` under `name`, returning the location written.
    ///
    /// Plain stores may replace an existing document.
    fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf>;

    /// Read the whole document stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if no such document exists.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Passphrase-encrypted document storage.
///
/// Implementations must ensure:
/// - Documents are encrypted at rest under a passphrase-derived key
/// - A write never replaces or corrupts an existing document
/// - A failed write leaves nothing that reads as a valid document
/// - A read never returns unauthenticated plaintext
pub trait PassphraseStore {
    /// Encrypt `plaintext` under `passphrase` and store it as `name`.
    ///
    /// # Errors
    ///
    /// - `DocstoreError::AlreadyExists` if `name` is already occupied
    /// - `DocstoreError::KeyDerivationFailed` for bad parameters or randomness failure
    /// - `DocstoreError::Io` for storage failures
    fn write(&self, name: &str, plaintext: &[u8], passphrase: &str) -> Result<PathBuf>;

    /// Read and decrypt the document stored as `name`.
    ///
    /// # Errors
    ///
    /// - `DocstoreError::NotFound` if the document does not exist
    /// - `DocstoreError::MalformedEnvelope` if the header is truncated or unrecognized
    /// - `DocstoreError::AuthenticationFailed` for a wrong passphrase or tampered data
    fn read(&self, name: &str, passphrase: &str) -> Result<Vec<u8>>;
}
