//! In-memory snapshot store, for tests and short-lived tools.

use crate::domain::{PendingEdit, Snapshot, SyncError};
use crate::ports::SnapshotStore;
use parking_lot::Mutex;

#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<Snapshot>>,
    pending: Mutex<Option<PendingEdit>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            pending: Mutex::new(None),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, SyncError> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SyncError> {
        *self.snapshot.lock() = None;
        Ok(())
    }

    fn load_pending(&self) -> Result<Option<PendingEdit>, SyncError> {
        Ok(self.pending.lock().clone())
    }

    fn save_pending(&self, edit: &PendingEdit) -> Result<(), SyncError> {
        *self.pending.lock() = Some(edit.clone());
        Ok(())
    }

    fn clear_pending(&self) -> Result<(), SyncError> {
        *self.pending.lock() = None;
        Ok(())
    }
}
