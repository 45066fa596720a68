//! Snapshot publishing with atomic replacement.
//!
//! A snapshot is serialized to compact JSON, written to a temporary file
//! created next to the target, synced, and renamed over the target. Readers
//! opening the target path therefore see either the previous complete
//! snapshot or the new one. The temporary file must live in the target's
//! directory so the rename stays on one filesystem.

pub mod error;

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::ScoreboardFacts;

pub use error::PublishError;

/// Owns the snapshot path and replaces its content on every publish.
///
/// # Examples
/// ```no_run
/// use icast_core::{SnapshotPublisher, decode_datagram, encode_message};
///
/// let raw = encode_message("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME")?;
/// let facts = decode_datagram(&raw)?;
/// SnapshotPublisher::new("match-facts.json").publish(&facts)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    path: PathBuf,
}

impl SnapshotPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn publish(&self, facts: &ScoreboardFacts) -> Result<(), PublishError> {
        let json = serde_json::to_vec(facts)?;
        write_atomic(&self.path, &json)
    }
}

/// Replace `path` with `contents` so that no reader observes a partial file.
///
/// On failure before the rename the temporary file is removed and `path` is
/// left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PublishError> {
    let file_name = path.file_name().ok_or_else(|| PublishError::Io {
        context: "resolve snapshot path",
        source: io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no file name in {}", path.display()),
        ),
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut prefix = OsString::from(".");
    prefix.push(file_name);
    prefix.push(".");

    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(PublishError::io("create temporary file"))?;
    temp.write_all(contents)
        .map_err(PublishError::io("write temporary file"))?;
    temp.flush()
        .map_err(PublishError::io("flush temporary file"))?;
    temp.as_file()
        .sync_all()
        .map_err(PublishError::io("sync temporary file"))?;

    // Dropping the returned handle on error removes the temporary file.
    temp.persist(path)
        .map_err(|err| PublishError::Io {
            context: "replace snapshot",
            source: err.error,
        })?;

    sync_dir(dir);
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(err) = std::fs::File::open(dir).and_then(|handle| handle.sync_all()) {
        tracing::warn!(dir = %dir.display(), error = %err, "failed to sync snapshot directory");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
