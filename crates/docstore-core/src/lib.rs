//! # Docstore Core
//!
//! Core library for Docstore - a minimal document store that persists named
//! byte blobs to a directory, optionally encrypted at rest under a
//! passphrase.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation from passphrases
//! - **envelope**: On-disk framing (header + authenticated ciphertext stream)
//! - **storage**: Plain and encrypted filesystem stores
//! - **fs**: Document addressing and atomic file placement
//!
//! ## Example
//!
//! ```no_run
//! use docstore_core::storage::{EncryptedFilesystemStore, PassphraseStore};
//!
//! let store = EncryptedFilesystemStore::new("/srv/docs");
//! store.write("greeting.txt.age", b"sekrit file\n", "password123")?;
//! let plaintext = store.read("greeting.txt.age", "password123")?;
//! assert_eq!(plaintext, b"sekrit file\n");
//! # Ok::<(), docstore_core::DocstoreError>(())
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod storage;

pub use envelope::EnvelopeFormat;
pub use error::{DocstoreError, KdfError, Result};
pub use storage::{
    DocumentStore, EncryptedFilesystemStore, FilesystemStore, PassphraseStore, StoreConfig,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
