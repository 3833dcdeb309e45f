//! Age-compatible envelope.
//!
//! Documents in the age v1 format with a single scrypt passphrase stanza.
//! Age records the salt and the scrypt work factor (log2 N) in its own
//! header and seals the payload with its STREAM construction.
//!
//! Note: age performs key derivation internally with scrypt, so the
//! Argon2id work factor range does not apply to this format.

use std::io::{self, Read, Write};
use std::iter;
use std::ops::RangeInclusive;

use age::stream::{StreamReader, StreamWriter};
use secrecy::SecretString;

use crate::error::{DocstoreError, KdfError, Result};

/// Leading bytes of every binary age file.
pub const AGE_MAGIC: &[u8] = b"age-encryption.org/";

/// Accepted scrypt work factors (log2 N).
pub const WORK_FACTOR_RANGE: RangeInclusive<u8> = 10..=22;

/// Default scrypt work factor, matching the age reference implementation.
pub const DEFAULT_WORK_FACTOR: u8 = 18;

/// Check a scrypt work factor against [`WORK_FACTOR_RANGE`].
pub fn validate_work_factor(work_factor: u8) -> std::result::Result<(), KdfError> {
    if !WORK_FACTOR_RANGE.contains(&work_factor) {
        return Err(KdfError::Parameter(format!(
            "scrypt work factor {} outside {}..={}",
            work_factor,
            WORK_FACTOR_RANGE.start(),
            WORK_FACTOR_RANGE.end()
        )));
    }
    Ok(())
}

/// Start an age envelope on `sink` sealed to `passphrase`.
pub fn encrypt_to<W: Write>(sink: W, passphrase: &str, work_factor: u8) -> Result<StreamWriter<W>> {
    validate_work_factor(work_factor)?;

    let mut recipient = age::scrypt::Recipient::new(SecretString::from(passphrase.to_string()));
    recipient.set_work_factor(work_factor);

    let encryptor = age::Encryptor::with_recipients(iter::once(&recipient as &dyn age::Recipient))
        .map_err(|e| KdfError::Unspecified(format!("Failed to create encryptor: {}", e)))?;

    Ok(encryptor.wrap_output(sink)?)
}

/// Parse an age header from `source` and unlock it with `passphrase`.
pub fn decrypt_from<R: Read>(source: R, passphrase: &str) -> Result<StreamReader<R>> {
    let decryptor = age::Decryptor::new(source).map_err(map_decrypt_error)?;

    if !decryptor.is_scrypt() {
        return Err(DocstoreError::MalformedEnvelope(
            "age file is not passphrase-encrypted".to_string(),
        ));
    }

    let mut identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));
    identity.set_max_work_factor(*WORK_FACTOR_RANGE.end());

    decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(map_decrypt_error)
}

fn map_decrypt_error(err: age::DecryptError) -> DocstoreError {
    match err {
        age::DecryptError::NoMatchingKeys
        | age::DecryptError::DecryptionFailed
        | age::DecryptError::KeyDecryptionFailed
        | age::DecryptError::InvalidMac => DocstoreError::AuthenticationFailed,
        err @ age::DecryptError::ExcessiveWork { .. } => {
            KdfError::Parameter(err.to_string()).into()
        }
        age::DecryptError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            DocstoreError::MalformedEnvelope("Header truncated".to_string())
        }
        age::DecryptError::Io(e) => DocstoreError::Io { source: e },
        other => DocstoreError::MalformedEnvelope(other.to_string()),
    }
}
