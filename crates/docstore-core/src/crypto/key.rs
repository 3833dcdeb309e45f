//! Key derivation using Argon2id.
//!
//! This module derives encryption keys from passphrases using the Argon2id
//! algorithm, which is memory-hard and resistant to GPU-based attacks.
//!
//! The work factor is the log2 of the Argon2 memory cost in KiB. It is
//! recorded in every envelope header, so raising the default later does
//! not break documents written at an older cost.

use std::ops::RangeInclusive;

use argon2::Argon2;
use zeroize::ZeroizeOnDrop;

use crate::error::KdfError;

/// Accepted work factors: 1 MiB up to 1 GiB of Argon2 memory.
pub const WORK_FACTOR_RANGE: RangeInclusive<u8> = 10..=20;

/// Default work factor: 64 MiB.
pub const DEFAULT_WORK_FACTOR: u8 = 16;

/// Argon2id time cost and lanes. Fixed for KDF tag 1.
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (32 bytes = 256 bits for XChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// Length of the per-document salt.
pub const SALT_LENGTH: usize = 16;

/// A cryptographic key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped and is never
/// cached between calls.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Check a work factor against [`WORK_FACTOR_RANGE`].
pub fn validate_work_factor(work_factor: u8) -> Result<(), KdfError> {
    if !WORK_FACTOR_RANGE.contains(&work_factor) {
        return Err(KdfError::Parameter(format!(
            "Argon2id work factor {} outside {}..={}",
            work_factor,
            WORK_FACTOR_RANGE.start(),
            WORK_FACTOR_RANGE.end()
        )));
    }
    Ok(())
}

/// Fill `buf` from the OS randomness source.
pub fn fill_random(buf: &mut [u8]) -> Result<(), KdfError> {
    getrandom::getrandom(buf)
        .map_err(|e| KdfError::Unspecified(format!("Randomness source failed: {}", e)))
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH], KdfError> {
    let mut salt = [0u8; SALT_LENGTH];
    fill_random(&mut salt)?;
    Ok(salt)
}

/// Derive an encryption key from a passphrase using Argon2id.
///
/// # Arguments
///
/// * `passphrase` - The passphrase to derive from (may be empty)
/// * `salt` - Random salt, unique per document
/// * `work_factor` - log2 of the memory cost in KiB, within [`WORK_FACTOR_RANGE`]
///
/// # Security
///
/// - Same passphrase + salt + work factor always produces the same key
/// - Different salt produces a different key (salt is stored in the header)
///
/// # Examples
///
/// ```
/// use docstore_core::crypto::derive_key;
///
/// let salt = b"unique-salt-per-document";
/// let key = derive_key("my-passphrase", salt, 10).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8], work_factor: u8) -> Result<DerivedKey, KdfError> {
    validate_work_factor(work_factor)?;

    if salt.len() < SALT_LENGTH {
        return Err(KdfError::Parameter(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        1u32 << work_factor,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| KdfError::Parameter(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| KdfError::Unspecified(format!("Argon2id failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}
