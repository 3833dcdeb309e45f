//! Cryptographic primitives for Docstore.
//!
//! ## Security Model
//!
//! - Passphrase-based encryption only; keys are derived per document
//! - Argon2id for key derivation (memory-hard, resistant to brute-force)
//! - A fresh random salt for every write
//! - Derived keys zeroized from memory on drop, never persisted or cached
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of stored document files
//! - Offline brute-force attacks on passphrases
//! - Tampering with stored files (detected, never silently decrypted)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory during a read or write

pub mod key;

pub use key::{
    derive_key, fill_random, generate_salt, validate_work_factor, DerivedKey, DEFAULT_WORK_FACTOR,
    KEY_LENGTH, SALT_LENGTH, WORK_FACTOR_RANGE,
};
