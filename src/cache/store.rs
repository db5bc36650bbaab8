//! Cache Store Module
//!
//! Filesystem access for cache files: directory creation, reads that tell a
//! missing file apart from a failing one, and whole-file atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{CacheError, Result};

// == Exists ==
/// Returns true if a cache file is present at `path`.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

// == Ensure Directory ==
/// Creates `dir` (and its parents) unless it already exists.
///
/// Creation races with other writers: if it fails, the directory is checked
/// again and an existing directory counts as success.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    match fs::create_dir_all(dir) {
        Ok(()) => {
            debug!(path = %dir.display(), "created cache directory");
            Ok(())
        }
        Err(_) if dir.is_dir() => {
            trace!(path = %dir.display(), "cache directory created concurrently");
            Ok(())
        }
        Err(source) => Err(CacheError::DirectoryCreateFailed {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

// == Read ==
/// Reads the whole file at `path`.
///
/// Returns `Ok(None)` when the file does not exist, including when a parent
/// component is a regular file; any other failure is a `ReadFailed` error.
pub fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(None)
        }
        Err(source) => Err(CacheError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// == Write ==
/// Replaces the file at `path` with `bytes` in a single step.
///
/// The payload goes to a temporary file in the same directory, is synced, and
/// is then renamed over the target. On failure the previous file is untouched
/// and the temporary file is removed. The file ends up with the mode of the
/// file it replaces, or `0644` for a new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_failed = |source: io::Error| CacheError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_failed)?;
    set_cache_permissions(&file, path).map_err(write_failed)?;
    file.write_all(bytes).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;
    file.persist(path).map_err(|err| write_failed(err.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote cache file");
    Ok(())
}

// Temporary files are created owner-only; widen to what a plain write would give.
#[cfg(unix)]
fn set_cache_permissions(file: &NamedTempFile, target: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(target) {
        Ok(meta) if meta.is_file() => meta.permissions(),
        _ => fs::Permissions::from_mode(0o644),
    };
    file.as_file().set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_cache_permissions(_file: &NamedTempFile, _target: &Path) -> io::Result<()> {
    Ok(())
}
