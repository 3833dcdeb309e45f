//! Chunked authenticated encryption stream (XChaCha20-Poly1305 STREAM).
//!
//! Plaintext is cut into [`CHUNK_SIZE`] chunks. Chunk `i` is sealed under
//! the nonce `prefix(19) || i (u32 BE) || last_flag(1)` with the encoded
//! header as associated data. Only the final chunk carries `last_flag = 1`,
//! so truncation at a chunk boundary fails authentication just like a
//! flipped byte does.

use std::cmp;
use std::io::{self, Read, Write};

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};

use super::header::{EnvelopeHeader, HEADER_LENGTH, NONCE_PREFIX_LENGTH};
use crate::crypto::DerivedKey;

/// Plaintext bytes per chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Poly1305 tag appended to every chunk.
pub const TAG_LENGTH: usize = 16;

const ENCRYPTED_CHUNK_SIZE: usize = CHUNK_SIZE + TAG_LENGTH;

fn chunk_nonce(prefix: &[u8; NONCE_PREFIX_LENGTH], counter: u32, last: bool) -> XNonce {
    let mut nonce = [0u8; 24];
    nonce[..NONCE_PREFIX_LENGTH].copy_from_slice(prefix);
    nonce[NONCE_PREFIX_LENGTH..23].copy_from_slice(&counter.to_be_bytes());
    nonce[23] = u8::from(last);
    XNonce::clone_from_slice(&nonce)
}

fn authentication_error() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "chunk authentication failed")
}

/// Write-side sink: buffers plaintext and emits sealed chunks to `inner`.
///
/// [`EncryptingWriter::finish`] must be called to seal the final chunk.
/// Dropping the writer without finishing leaves an envelope that will not
/// authenticate.
pub struct EncryptingWriter<W: Write> {
    inner: W,
    cipher: XChaCha20Poly1305,
    nonce_prefix: [u8; NONCE_PREFIX_LENGTH],
    aad: [u8; HEADER_LENGTH],
    counter: u32,
    buffer: Vec<u8>,
}

impl<W: Write> EncryptingWriter<W> {
    /// Write `header` to `inner` and prepare to encrypt under `key`.
    pub fn new(mut inner: W, key: &DerivedKey, header: &EnvelopeHeader) -> io::Result<Self> {
        header.write_to(&mut inner)?;
        Ok(Self {
            inner,
            cipher: XChaCha20Poly1305::new(Key::from_slice(key.as_bytes())),
            nonce_prefix: header.nonce_prefix,
            aad: header.to_bytes(),
            counter: 0,
            buffer: Vec::with_capacity(CHUNK_SIZE),
        })
    }

    fn seal(&mut self, last: bool) -> io::Result<()> {
        let nonce = chunk_nonce(&self.nonce_prefix, self.counter, last);
        let sealed = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &self.buffer,
                    aad: &self.aad,
                },
            )
            .map_err(|_| io::Error::other("chunk encryption failed"))?;
        self.inner.write_all(&sealed)?;
        self.buffer.clear();

        if !last {
            self.counter = self
                .counter
                .checked_add(1)
                .ok_or_else(|| io::Error::other("document exceeds maximum chunk count"))?;
        }
        Ok(())
    }

    /// Seal the final chunk, flush, and hand back the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.seal(true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncryptingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // A full buffer is only sealed once more data arrives, so the final
        // chunk is never empty unless the whole document is.
        if self.buffer.len() == CHUNK_SIZE {
            self.seal(false)?;
        }
        let take = cmp::min(CHUNK_SIZE - self.buffer.len(), buf.len());
        self.buffer.extend_from_slice(&buf[..take]);
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Read-side source: authenticates and decrypts chunks from `inner`.
///
/// Authentication failures surface as `io::ErrorKind::InvalidData`.
pub struct DecryptingReader<R: Read> {
    inner: R,
    cipher: XChaCha20Poly1305,
    nonce_prefix: [u8; NONCE_PREFIX_LENGTH],
    aad: [u8; HEADER_LENGTH],
    counter: u32,
    lookahead: Option<Vec<u8>>,
    plaintext: Vec<u8>,
    pos: usize,
    finished: bool,
}

impl<R: Read> DecryptingReader<R> {
    /// `inner` must be positioned just past the header.
    pub fn new(inner: R, key: &DerivedKey, header: &EnvelopeHeader) -> Self {
        Self {
            inner,
            cipher: XChaCha20Poly1305::new(Key::from_slice(key.as_bytes())),
            nonce_prefix: header.nonce_prefix,
            aad: header.to_bytes(),
            counter: 0,
            lookahead: None,
            plaintext: Vec::new(),
            pos: 0,
            finished: false,
        }
    }

    fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        let mut chunk = Vec::with_capacity(ENCRYPTED_CHUNK_SIZE);
        self.inner
            .by_ref()
            .take(ENCRYPTED_CHUNK_SIZE as u64)
            .read_to_end(&mut chunk)?;
        Ok(chunk)
    }

    fn open_next_chunk(&mut self) -> io::Result<()> {
        let current = match self.lookahead.take() {
            Some(chunk) => chunk,
            None => self.read_chunk()?,
        };
        let following = if current.len() == ENCRYPTED_CHUNK_SIZE {
            self.read_chunk()?
        } else {
            Vec::new()
        };
        let last = following.is_empty();

        let nonce = chunk_nonce(&self.nonce_prefix, self.counter, last);
        self.plaintext = self
            .cipher
            .decrypt(
                &nonce,
                Payload {
                    msg: &current,
                    aad: &self.aad,
                },
            )
            .map_err(|_| authentication_error())?;
        self.pos = 0;

        if last {
            self.finished = true;
        } else {
            self.counter = self.counter.checked_add(1).ok_or_else(authentication_error)?;
            self.lookahead = Some(following);
        }
        Ok(())
    }
}

impl<R: Read> Read for DecryptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos == self.plaintext.len() {
            if self.finished {
                return Ok(0);
            }
            self.open_next_chunk()?;
        }
        let n = cmp::min(buf.len(), self.plaintext.len() - self.pos);
        buf[..n].copy_from_slice(&self.plaintext[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;

    fn setup() -> (DerivedKey, EnvelopeHeader) {
        let header = EnvelopeHeader::generate(10).unwrap();
        let key = derive_key("stream-passphrase", &header.salt, header.work_factor).unwrap();
        (key, header)
    }

    fn seal_all(key: &DerivedKey, header: &EnvelopeHeader, plaintext: &[u8]) -> Vec<u8> {
        let mut writer = EncryptingWriter::new(Vec::new(), key, header).unwrap();
        writer.write_all(plaintext).unwrap();
        writer.finish().unwrap()
    }

    fn open_all(key: &DerivedKey, header: &EnvelopeHeader, sealed: &[u8]) -> io::Result<Vec<u8>> {
        let mut source = &sealed[HEADER_LENGTH..];
        let mut reader = DecryptingReader::new(&mut source, key, header);
        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_chunk_boundaries() {
        let (key, header) = setup();
        for len in [
            0,
            1,
            CHUNK_SIZE - 1,
            CHUNK_SIZE,
            CHUNK_SIZE + 1,
            2 * CHUNK_SIZE,
            2 * CHUNK_SIZE + 17,
        ] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let sealed = seal_all(&key, &header, &plaintext);
            let chunks = cmp::max(1, len.div_ceil(CHUNK_SIZE));
            assert_eq!(sealed.len(), HEADER_LENGTH + len + chunks * TAG_LENGTH);
            assert_eq!(open_all(&key, &header, &sealed).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_header_written_first() {
        let (key, header) = setup();
        let sealed = seal_all(&key, &header, b"payload");
        assert_eq!(&sealed[..HEADER_LENGTH], &header.to_bytes()[..]);
    }

    #[test]
    fn test_truncated_at_chunk_boundary_fails() {
        let (key, header) = setup();
        let plaintext = vec![0x42u8; 2 * CHUNK_SIZE + 10];
        let sealed = seal_all(&key, &header, &plaintext);

        let truncated = &sealed[..HEADER_LENGTH + 2 * ENCRYPTED_CHUNK_SIZE];
        let err = open_all(&key, &header, truncated).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_ciphertext_fails() {
        let (key, header) = setup();
        let sealed = seal_all(&key, &header, b"");
        let err = open_all(&key, &header, &sealed[..HEADER_LENGTH]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let (key, header) = setup();
        let mut sealed = seal_all(&key, &header, b"short document");
        sealed.extend_from_slice(b"junk");
        assert!(open_all(&key, &header, &sealed).is_err());
    }

    #[test]
    fn test_altered_header_fails() {
        let (key, header) = setup();
        let sealed = seal_all(&key, &header, b"bound to its header");

        let mut other = header.clone();
        other.nonce_prefix[0] ^= 0x01;
        let err = open_all(&key, &other, &sealed).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_unfinished_writer_does_not_authenticate() {
        let (key, header) = setup();
        let mut sink = Vec::new();
        {
            let mut writer = EncryptingWriter::new(&mut sink, &key, &header).unwrap();
            writer.write_all(b"never sealed").unwrap();
        }
        assert!(open_all(&key, &header, &sink).is_err());
    }
}
