//! File-backed snapshot store.
//!
//! Layout under the base directory:
//!
//! - `snapshot.json`: last document fetched from the server
//! - `pending.json`: edited document whose write did not land
//!
//! Files are written to a temp sibling and renamed into place, so a crash
//! mid-write leaves the previous snapshot readable.

use crate::domain::{PendingEdit, Snapshot, SyncError};
use crate::ports::SnapshotStore;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_FILE: &str = "snapshot.json";
const PENDING_FILE: &str = "pending.json";

pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    /// Open (creating if needed) a snapshot directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, SyncError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(|e| io_error(&base_dir, e))?;
        Ok(Self { base_dir })
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(SNAPSHOT_FILE)
    }

    pub fn pending_path(&self) -> PathBuf {
        self.base_dir.join(PENDING_FILE)
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SyncError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SyncError::Snapshot(format!("{} is corrupt: {e}", path.display())))
    }

    fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), SyncError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| SyncError::Snapshot(format!("failed to encode snapshot: {e}")))?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).map_err(|e| io_error(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| io_error(path, e))?;

        debug!(path = %path.display(), "Saved snapshot file");
        Ok(())
    }

    fn remove(path: &Path) -> Result<(), SyncError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(path, e)),
        }
    }
}

fn io_error(path: &Path, err: std::io::Error) -> SyncError {
    SyncError::Snapshot(format!("{}: {err}", path.display()))
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, SyncError> {
        Self::read(&self.snapshot_path())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        Self::write(&self.snapshot_path(), snapshot)
    }

    fn clear(&self) -> Result<(), SyncError> {
        Self::remove(&self.snapshot_path())
    }

    fn load_pending(&self) -> Result<Option<PendingEdit>, SyncError> {
        Self::read(&self.pending_path())
    }

    fn save_pending(&self, edit: &PendingEdit) -> Result<(), SyncError> {
        Self::write(&self.pending_path(), edit)
    }

    fn clear_pending(&self) -> Result<(), SyncError> {
        Self::remove(&self.pending_path())
    }
}
