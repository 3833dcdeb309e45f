//! Filesystem helpers: document addressing and atomic file placement.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{DocstoreError, Result};

/// Resolve a document name to its path under `root`.
///
/// Names are single path components: not empty, not `.` or `..`, and
/// free of separators and NUL bytes.
pub fn document_path(root: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty() {
        return Err(DocstoreError::InvalidName(
            "Name cannot be empty".to_string(),
        ));
    }
    if name == "." || name == ".." {
        return Err(DocstoreError::InvalidName(format!(
            "\"{}\" is not a document name",
            name
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(DocstoreError::InvalidName(format!(
            "\"{}\" must not contain path separators",
            name.escape_debug()
        )));
    }
    Ok(root.join(name))
}

/// Create an empty temporary file next to documents in `root`.
///
/// The file is removed when the returned handle is dropped, unless it is
/// persisted first.
pub fn staging_file(root: &Path) -> io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".docstore-")
        .suffix(".tmp")
        .tempfile_in(root)
}

/// Replace `destination` with `data` atomically: write a staging file,
/// sync it, then rename it over the destination.
pub fn replace_atomic(root: &Path, destination: &Path, data: &[u8]) -> io::Result<()> {
    let mut temp = staging_file(root)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| e.error)?;
    sync_dir(root)
}

/// Flush directory entries in `dir` (new or renamed names) to disk.
#[cfg(unix)]
pub fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

/// No-op where directories cannot be opened as files.
#[cfg(not(unix))]
pub fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Delete a staging file, logging rather than failing when removal does not work.
pub fn discard(temp: NamedTempFile) {
    let path = temp.path().to_path_buf();
    if let Err(err) = temp.close() {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove staging file");
    }
}
