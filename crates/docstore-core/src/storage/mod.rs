//! Storage backends for Docstore.
//!
//! ## Architecture
//!
//! Two capabilities with the same whole-document read/write shape:
//! - [`DocumentStore`]: plain bytes on disk ([`FilesystemStore`])
//! - [`PassphraseStore`]: encrypted at rest ([`EncryptedFilesystemStore`])
//!
//! Both are rooted at a caller-provided directory that must already
//! exist. Stores own the files they create, never the directory.
//!
//! ## Security
//!
//! The encrypted backend is responsible for:
//! - Encryption at rest under a passphrase-derived key
//! - Exclusive creation: an existing document is never replaced
//! - Publishing only complete, synced envelopes

pub mod config;
pub mod encrypted;
pub mod plain;
pub mod traits;

pub use config::StoreConfig;
pub use encrypted::EncryptedFilesystemStore;
pub use plain::FilesystemStore;
pub use traits::{DocumentStore, PassphraseStore};
