//! Task snapshot persistence.
//!
//! The store is serialized to JSON after every accepted mutation and
//! restored at startup. Writes go through a sibling temp file plus
//! rename so a crash mid-write never truncates the snapshot. Load
//! failures are absorbed: a missing file means a first run, an
//! unreadable or unparsable one is logged and the overlay starts with
//! an empty store (the reducer side never sees persistence errors).

use std::path::{Path, PathBuf};

use crate::tasks::TaskStore;

/// Errors that can occur while writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Creating the parent directory or writing/renaming the file failed.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The store could not be serialized (practically unreachable for
    /// this data model, but surfaced rather than swallowed).
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load the snapshot at `path`, falling back to an empty store.
#[must_use]
pub fn load(path: &Path) -> TaskStore {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot found, starting empty");
            return TaskStore::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), err = %e, "failed to read snapshot, starting empty");
            return TaskStore::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(path = %path.display(), err = %e, "failed to parse snapshot, starting empty");
            TaskStore::new()
        }
    }
}

/// Write the snapshot atomically (temp file + rename).
///
/// # Errors
///
/// Returns [`PersistError`] when serialization or any filesystem step
/// fails. Callers log and carry on — a failed save must not take the
/// overlay down.
pub fn save(path: &Path, store: &TaskStore) -> Result<(), PersistError> {
    let json = serde_json::to_vec_pretty(store)?;

    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, &json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

/// Sibling temp path used for the atomic write.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map_or_else(
        || std::ffi::OsString::from("snapshot"),
        std::ffi::OsStr::to_os_string,
    );
    name.push(".tmp");
    path.with_file_name(name)
}
