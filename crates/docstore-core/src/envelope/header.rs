//! Native envelope header.
//!
//! Layout (46 bytes):
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 8 | magic `docstore` |
//! | 8 | 1 | format version |
//! | 9 | 1 | KDF tag (1 = Argon2id v0x13) |
//! | 10 | 1 | work factor |
//! | 11 | 16 | salt |
//! | 27 | 19 | stream nonce prefix |
//!
//! The encoded header is also the associated data of every ciphertext
//! chunk, so it cannot be edited without failing authentication.

use std::io::{self, Read, Write};

use crate::crypto::{self, SALT_LENGTH};
use crate::error::{DocstoreError, KdfError, Result};

/// Leading bytes of every native envelope.
pub const MAGIC: &[u8; 8] = b"docstore";
pub const FORMAT_VERSION: u8 = 1;
/// Argon2id v0x13, t=3, p=1, memory `2^work_factor` KiB.
pub const KDF_ARGON2ID: u8 = 1;
/// XNonce (24 bytes) minus the 4-byte counter and 1-byte last flag.
pub const NONCE_PREFIX_LENGTH: usize = 19;
pub const HEADER_LENGTH: usize = MAGIC.len() + 3 + SALT_LENGTH + NONCE_PREFIX_LENGTH;

/// Per-document envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub kdf: u8,
    pub work_factor: u8,
    pub salt: [u8; SALT_LENGTH],
    pub nonce_prefix: [u8; NONCE_PREFIX_LENGTH],
}

impl EnvelopeHeader {
    /// Build a header with a fresh salt and nonce prefix.
    pub fn generate(work_factor: u8) -> std::result::Result<Self, KdfError> {
        crypto::validate_work_factor(work_factor)?;
        let salt = crypto::generate_salt()?;
        let mut nonce_prefix = [0u8; NONCE_PREFIX_LENGTH];
        crypto::fill_random(&mut nonce_prefix)?;
        Ok(Self {
            kdf: KDF_ARGON2ID,
            work_factor,
            salt,
            nonce_prefix,
        })
    }

    /// Encode the header in its fixed on-disk layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LENGTH] {
        let mut out = [0u8; HEADER_LENGTH];
        out[..8].copy_from_slice(MAGIC);
        out[8] = FORMAT_VERSION;
        out[9] = self.kdf;
        out[10] = self.work_factor;
        out[11..11 + SALT_LENGTH].copy_from_slice(&self.salt);
        out[11 + SALT_LENGTH..].copy_from_slice(&self.nonce_prefix);
        out
    }

    /// Decode a header, rejecting unknown magic, version or KDF tag as
    /// `MalformedEnvelope`.
    ///
    /// The work factor is not range-checked here; key derivation does that.
    pub fn from_bytes(bytes: &[u8; HEADER_LENGTH]) -> Result<Self> {
        if &bytes[..8] != MAGIC {
            return Err(DocstoreError::MalformedEnvelope(
                "Unrecognized format tag".to_string(),
            ));
        }
        if bytes[8] != FORMAT_VERSION {
            return Err(DocstoreError::MalformedEnvelope(format!(
                "Unsupported envelope version {}",
                bytes[8]
            )));
        }
        if bytes[9] != KDF_ARGON2ID {
            return Err(DocstoreError::MalformedEnvelope(format!(
                "Unknown key derivation algorithm {}",
                bytes[9]
            )));
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&bytes[11..11 + SALT_LENGTH]);
        let mut nonce_prefix = [0u8; NONCE_PREFIX_LENGTH];
        nonce_prefix.copy_from_slice(&bytes[11 + SALT_LENGTH..]);

        Ok(Self {
            kdf: bytes[9],
            work_factor: bytes[10],
            salt,
            nonce_prefix,
        })
    }

    /// Write the encoded header to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Read and parse a header, failing with `MalformedEnvelope` when truncated.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LENGTH];
        reader.read_exact(&mut bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                DocstoreError::MalformedEnvelope("Header truncated".to_string())
            } else {
                DocstoreError::Io { source: e }
            }
        })?;
        Self::from_bytes(&bytes)
    }
}
