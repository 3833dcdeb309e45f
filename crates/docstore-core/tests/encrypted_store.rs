use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use docstore_core::envelope::header::{EnvelopeHeader, HEADER_LENGTH};
use docstore_core::storage::{EncryptedFilesystemStore, PassphraseStore, StoreConfig};
use docstore_core::{DocstoreError, EnvelopeFormat, KdfError};
use tempfile::{tempdir, TempDir};

fn store_in(dir: &TempDir) -> EncryptedFilesystemStore {
    EncryptedFilesystemStore::with_config(dir.path(), StoreConfig::default().with_work_factor(10))
        .expect("config should be valid")
}

fn header_of(path: &Path) -> EnvelopeHeader {
    let bytes = fs::read(path).expect("read should succeed");
    EnvelopeHeader::read_from(&mut bytes.as_slice()).expect("header should parse")
}

#[test]
fn test_greeting_scenario() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    store
        .write("greeting.txt.age", b"sekrit file\n", "password123")
        .expect("write should succeed");

    let plaintext = store
        .read("greeting.txt.age", "password123")
        .expect("read should succeed");
    assert_eq!(plaintext, b"sekrit file\n");

    let result = store.read("greeting.txt.age", "wrong");
    assert!(matches!(result, Err(DocstoreError::AuthenticationFailed)));
}

#[test]
fn test_empty_document_round_trip() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    store.write("empty", b"", "passphrase").unwrap();
    assert_eq!(store.read("empty", "passphrase").unwrap(), b"");
}

#[test]
fn test_large_document_round_trip() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    // Several chunks plus a partial one
    let plaintext: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();

    store.write("large.bin", &plaintext, "passphrase").unwrap();
    assert_eq!(store.read("large.bin", "passphrase").unwrap(), plaintext);
}

#[test]
fn test_no_overwrite() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    store.write("doc", b"first version", "pw").unwrap();
    let result = store.write("doc", b"second version", "pw");
    assert!(matches!(result, Err(DocstoreError::AlreadyExists(name)) if name == "doc"));

    assert_eq!(store.read("doc", "pw").unwrap(), b"first version");
}

#[test]
fn test_existing_plain_file_not_clobbered() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    fs::write(dir.path().join("taken"), b"someone else's file").unwrap();

    let result = store.write("taken", b"secret", "pw");
    assert!(matches!(result, Err(DocstoreError::AlreadyExists(_))));
    assert_eq!(
        fs::read(dir.path().join("taken")).unwrap(),
        b"someone else's file"
    );
}

#[test]
fn test_missing_document() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    for passphrase in ["", "pw", "password123"] {
        let result = store.read("nonexistent", passphrase);
        assert!(matches!(result, Err(DocstoreError::NotFound(_))));
    }
}

#[test]
fn test_salt_uniqueness() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    let first = store.write("one", b"same plaintext", "same-pw").unwrap();
    let second = store.write("two", b"same plaintext", "same-pw").unwrap();

    assert_ne!(header_of(&first).salt, header_of(&second).salt);

    let bytes1 = fs::read(&first).unwrap();
    let bytes2 = fs::read(&second).unwrap();
    assert_ne!(bytes1[HEADER_LENGTH..], bytes2[HEADER_LENGTH..]);
}

#[test]
fn test_header_records_work_factor() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    let path = store.write("doc", b"data", "pw").unwrap();
    assert_eq!(header_of(&path).work_factor, 10);
}

#[test]
fn test_tamper_detection_every_ciphertext_byte() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let path = store.write("doc", b"sekrit file\n", "password123").unwrap();
    let original = fs::read(&path).unwrap();

    for index in HEADER_LENGTH..original.len() {
        let mut tampered = original.clone();
        tampered[index] ^= 0x01;
        fs::write(&path, &tampered).unwrap();

        let result = store.read("doc", "password123");
        assert!(
            matches!(result, Err(DocstoreError::AuthenticationFailed)),
            "flipping byte {} was not detected",
            index
        );
    }
}

#[test]
fn test_header_tampering_detected() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let path = store.write("doc", b"payload", "pw").unwrap();
    let original = fs::read(&path).unwrap();

    // Salt and nonce prefix bytes
    for index in [11, 20, 30, 45] {
        let mut tampered = original.clone();
        tampered[index] ^= 0x80;
        fs::write(&path, &tampered).unwrap();

        assert!(matches!(
            store.read("doc", "pw"),
            Err(DocstoreError::AuthenticationFailed)
        ));
    }
}

#[test]
fn test_truncated_header_is_malformed() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let path = store.write("doc", b"payload", "pw").unwrap();
    let original = fs::read(&path).unwrap();

    fs::write(&path, &original[..HEADER_LENGTH - 5]).unwrap();
    assert!(matches!(
        store.read("doc", "pw"),
        Err(DocstoreError::MalformedEnvelope(_))
    ));
}

#[test]
fn test_truncated_ciphertext_fails_authentication() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let path = store.write("doc", b"payload", "pw").unwrap();
    let original = fs::read(&path).unwrap();

    fs::write(&path, &original[..original.len() - 1]).unwrap();
    assert!(matches!(
        store.read("doc", "pw"),
        Err(DocstoreError::AuthenticationFailed)
    ));
}

#[test]
fn test_unknown_format_tag_is_malformed() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let path = store.write("doc", b"payload", "pw").unwrap();
    let mut bytes = fs::read(&path).unwrap();
    bytes[..8].copy_from_slice(b"notadocs");
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        store.read("doc", "pw"),
        Err(DocstoreError::MalformedEnvelope(_))
    ));
}

#[test]
fn test_concurrent_writers_same_name() {
    let dir = tempdir().unwrap();
    let store = Arc::new(store_in(&dir));
    let writers = 4;
    let barrier = Arc::new(Barrier::new(writers));

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let payload = format!("writer {}", i);
                store
                    .write("contested", payload.as_bytes(), "pw")
                    .map(|_| payload)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(DocstoreError::AlreadyExists(_)))));

    let stored = store.read("contested", "pw").unwrap();
    assert_eq!(stored, winners[0].as_bytes());

    // Only the published document remains in the root
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_concurrent_writers_different_names() {
    let dir = tempdir().unwrap();
    let store = Arc::new(store_in(&dir));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.write(&format!("doc-{}", i), b"payload", "pw"))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().expect("independent writes should succeed");
    }
    for i in 0..4 {
        assert_eq!(store.read(&format!("doc-{}", i), "pw").unwrap(), b"payload");
    }
}

#[test]
fn test_reads_documents_from_either_format() {
    let dir = tempdir().unwrap();
    let native = store_in(&dir);
    let age = EncryptedFilesystemStore::with_config(
        dir.path(),
        StoreConfig::new(EnvelopeFormat::Age).with_work_factor(10),
    )
    .unwrap();

    native.write("native.doc", b"native", "pw").unwrap();
    age.write("greeting.txt.age", b"sekrit file\n", "password123")
        .unwrap();

    // Format is detected on read, regardless of the store's write format
    assert_eq!(age.read("native.doc", "pw").unwrap(), b"native");
    assert_eq!(
        native.read("greeting.txt.age", "password123").unwrap(),
        b"sekrit file\n"
    );
    assert!(matches!(
        native.read("greeting.txt.age", "wrong"),
        Err(DocstoreError::AuthenticationFailed)
    ));
}

#[test]
fn test_age_tamper_detection() {
    let dir = tempdir().unwrap();
    let store = EncryptedFilesystemStore::with_config(
        dir.path(),
        StoreConfig::new(EnvelopeFormat::Age).with_work_factor(10),
    )
    .unwrap();
    let path = store.write("doc.age", b"age payload", "pw").unwrap();
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        store.read("doc.age", "pw"),
        Err(DocstoreError::AuthenticationFailed)
    ));
}

#[test]
fn test_age_file_for_key_recipient_is_malformed() {
    use std::io::Write;

    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    let identity = age::x25519::Identity::generate();
    let recipient = identity.to_public();
    let encryptor =
        age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
            .unwrap();
    let mut sealed = Vec::new();
    let mut writer = encryptor.wrap_output(&mut sealed).unwrap();
    writer.write_all(b"not for passphrases").unwrap();
    writer.finish().unwrap();
    fs::write(dir.path().join("keyed.age"), &sealed).unwrap();

    assert!(matches!(
        store.read("keyed.age", "pw"),
        Err(DocstoreError::MalformedEnvelope(_))
    ));
}

#[test]
fn test_out_of_range_work_factor_rejected() {
    let dir = tempdir().unwrap();
    for work_factor in [9, 21] {
        let result = EncryptedFilesystemStore::with_config(
            dir.path(),
            StoreConfig::default().with_work_factor(work_factor),
        );
        assert!(matches!(
            result,
            Err(DocstoreError::KeyDerivationFailed(KdfError::Parameter(_)))
        ));
    }
}
