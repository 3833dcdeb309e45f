//! Error types for Docstore core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Each failure kind gets its own variant so callers can branch on it
//! (re-prompt on a wrong passphrase, pick another name on a collision).
//! The CLI layer maps these to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Docstore operations.
pub type Result<T> = std::result::Result<T, DocstoreError>;

/// Key derivation failures.
#[derive(Debug, Error)]
pub enum KdfError {
    /// Work factor (or another KDF parameter) outside the accepted range
    #[error("Invalid key derivation parameter: {0}")]
    Parameter(String),

    /// Randomness source or primitive failure; not worth retrying
    #[error("Key derivation failed: {0}")]
    Unspecified(String),
}

/// Core error type for Docstore operations.
#[derive(Debug, Error)]
pub enum DocstoreError {
    /// A document with this name is already stored
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// No document with this name
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Header truncated, unknown magic, unknown version or KDF tag
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong passphrase or tampered ciphertext
    #[error("Authentication failed: incorrect passphrase or corrupted document")]
    AuthenticationFailed,

    /// Key derivation error
    #[error(transparent)]
    KeyDerivationFailed(#[from] KdfError),

    /// Document name cannot be addressed under the store root
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DocstoreError {
    /// Map an I/O error from reading a document, turning a missing file into `NotFound`.
    pub(crate) fn from_open(err: std::io::Error, name: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DocstoreError::NotFound(name.to_string())
        } else {
            DocstoreError::Io { source: err }
        }
    }
}
