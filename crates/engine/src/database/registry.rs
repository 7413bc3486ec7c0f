//! Process-wide registry of attached database files
//!
//! At most one `Database` may be attached to a given file within a process.
//! Paths are canonicalized so that different spellings of the same file
//! collide. A `Registration` removes its path when dropped.

use metadb_core::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Canonical paths of every attached database file
static OPEN_DATABASES: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Proof that a path is attached; releases it on drop.
#[derive(Debug)]
pub(crate) struct Registration {
    path: PathBuf,
}

impl Drop for Registration {
    fn drop(&mut self) {
        OPEN_DATABASES.lock().remove(&self.path);
    }
}

/// Resolve `path` to an absolute, canonical file path.
///
/// The file itself may not exist yet, so only the parent directory is
/// canonicalized. The parent is created if missing.
pub(crate) fn canonical_file_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::IoError(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' does not name a file", path.display()),
        ))
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    Ok(parent.canonicalize()?.join(file_name))
}

/// Attach `canonical`, then run `open` with the registration.
///
/// The path is claimed before `open` runs, so a second thread opening the
/// same file fails fast instead of loading it concurrently.
pub(crate) fn register_with<T>(
    canonical: PathBuf,
    open: impl FnOnce(Registration) -> Result<T>,
) -> Result<T> {
    let mut registry = OPEN_DATABASES.lock();
    if registry.contains(&canonical) {
        return Err(Error::DatabaseInUse(canonical));
    }
    registry.insert(canonical.clone());
    drop(registry);

    // On failure the registration is dropped inside `open`, which
    // removes the path again.
    open(Registration { path: canonical })
}

#[cfg(test)]
pub(crate) fn is_registered(path: &Path) -> bool {
    OPEN_DATABASES.lock().contains(path)
}
