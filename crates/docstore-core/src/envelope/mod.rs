//! Encryption envelope: on-disk framing of an encrypted document.
//!
//! Every document is a plaintext header (KDF tag, work factor, salt)
//! followed by a self-delimiting authenticated ciphertext stream. Two
//! formats are supported:
//!
//! - **Native**: Argon2id + XChaCha20-Poly1305 STREAM (see [`header`] and [`stream`])
//! - **Age**: the age v1 format with a scrypt passphrase stanza (see [`age_format`])
//!
//! Writes use the configured format. Reads detect the format from the
//! leading magic bytes.

pub mod age_format;
pub mod header;
pub mod stream;

use std::io::{self, BufRead, Read, Write};

use serde::{Deserialize, Serialize};

use crate::crypto::{self, derive_key};
use crate::error::{DocstoreError, KdfError, Result};

pub use header::EnvelopeHeader;
pub use stream::{DecryptingReader, EncryptingWriter};

/// Envelope format used for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeFormat {
    #[default]
    Native,
    Age,
}

impl EnvelopeFormat {
    pub fn name(self) -> &'static str {
        match self {
            EnvelopeFormat::Native => "native",
            EnvelopeFormat::Age => "age",
        }
    }

    pub fn default_work_factor(self) -> u8 {
        match self {
            EnvelopeFormat::Native => crypto::DEFAULT_WORK_FACTOR,
            EnvelopeFormat::Age => age_format::DEFAULT_WORK_FACTOR,
        }
    }

    pub fn validate_work_factor(self, work_factor: u8) -> std::result::Result<(), KdfError> {
        match self {
            EnvelopeFormat::Native => crypto::validate_work_factor(work_factor),
            EnvelopeFormat::Age => age_format::validate_work_factor(work_factor),
        }
    }

    /// Identify the format of an envelope from its first bytes.
    pub fn detect(prefix: &[u8]) -> Result<Self> {
        if prefix.starts_with(header::MAGIC) {
            Ok(EnvelopeFormat::Native)
        } else if prefix.starts_with(age_format::AGE_MAGIC) {
            Ok(EnvelopeFormat::Age)
        } else {
            Err(DocstoreError::MalformedEnvelope(
                "Unrecognized format tag".to_string(),
            ))
        }
    }
}

impl std::fmt::Display for EnvelopeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Encrypting sink for either format.
pub enum EnvelopeWriter<W: Write> {
    Native(EncryptingWriter<W>),
    Age(age::stream::StreamWriter<W>),
}

impl<W: Write> EnvelopeWriter<W> {
    /// Seal the trailing chunk and return the underlying writer.
    ///
    /// The caller closes the underlying file only after this returns.
    pub fn finish(self) -> io::Result<W> {
        match self {
            EnvelopeWriter::Native(writer) => writer.finish(),
            EnvelopeWriter::Age(writer) => writer.finish(),
        }
    }
}

impl<W: Write> Write for EnvelopeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            EnvelopeWriter::Native(writer) => writer.write(buf),
            EnvelopeWriter::Age(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            EnvelopeWriter::Native(writer) => writer.flush(),
            EnvelopeWriter::Age(writer) => writer.flush(),
        }
    }
}

/// Decrypting source for either format.
pub enum EnvelopeReader<R: Read> {
    Native(DecryptingReader<R>),
    Age(age::stream::StreamReader<R>),
}

impl<R: Read> Read for EnvelopeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EnvelopeReader::Native(reader) => reader.read(buf),
            EnvelopeReader::Age(reader) => reader.read(buf),
        }
    }
}

/// Begin an envelope on `sink`: writes the header and returns the encrypting sink.
///
/// A fresh salt is generated for every call. The derived key lives only
/// inside the returned cipher state.
pub fn encrypt_to<W: Write>(
    sink: W,
    passphrase: &str,
    format: EnvelopeFormat,
    work_factor: u8,
) -> Result<EnvelopeWriter<W>> {
    match format {
        EnvelopeFormat::Native => {
            let header = EnvelopeHeader::generate(work_factor)?;
            let key = derive_key(passphrase, &header.salt, header.work_factor)?;
            Ok(EnvelopeWriter::Native(EncryptingWriter::new(
                sink, &key, &header,
            )?))
        }
        EnvelopeFormat::Age => Ok(EnvelopeWriter::Age(age_format::encrypt_to(
            sink,
            passphrase,
            work_factor,
        )?)),
    }
}

/// Parse the envelope header on `source`, re-derive the key from the
/// stored salt and work factor, and return the decrypting source.
pub fn decrypt_from<R: BufRead>(mut source: R, passphrase: &str) -> Result<EnvelopeReader<R>> {
    let format = EnvelopeFormat::detect(source.fill_buf()?)?;
    match format {
        EnvelopeFormat::Native => {
            let header = EnvelopeHeader::read_from(&mut source)?;
            let key = derive_key(passphrase, &header.salt, header.work_factor)?;
            Ok(EnvelopeReader::Native(DecryptingReader::new(
                source, &key, &header,
            )))
        }
        EnvelopeFormat::Age => Ok(EnvelopeReader::Age(age_format::decrypt_from(
            source, passphrase,
        )?)),
    }
}

/// Map an error from reading a decrypting stream.
///
/// Both stream formats report failed chunk authentication as
/// `InvalidData`, and a ciphertext cut short as `UnexpectedEof`.
pub fn map_stream_error(err: io::Error) -> DocstoreError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            DocstoreError::AuthenticationFailed
        }
        _ => DocstoreError::Io { source: err },
    }
}
