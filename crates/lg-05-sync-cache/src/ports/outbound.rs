//! Outbound ports: the league server and the local snapshot storage.

use crate::domain::{ClientError, PendingEdit, Snapshot, SyncError};
use async_trait::async_trait;
use lg_03_dispatcher::ActionRequest;
use serde_json::Value;

/// The league server, as seen by a client.
#[async_trait]
pub trait LeagueRemote: Send + Sync {
    /// Run one action. `Ok` carries the success body, `"success": true`
    /// included.
    async fn call(&self, request: ActionRequest) -> Result<Value, ClientError>;

    /// Probe the unauthenticated health route. An unhealthy server still
    /// answers `Ok` with its report.
    async fn health(&self) -> Result<Value, ClientError>;

    /// Human-readable location of the server, for messages.
    fn endpoint(&self) -> String;
}

/// Durable slot for the last-known-good snapshot and one pending edit.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<Snapshot>, SyncError>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<(), SyncError>;

    fn clear(&self) -> Result<(), SyncError>;

    fn load_pending(&self) -> Result<Option<PendingEdit>, SyncError>;

    fn save_pending(&self, edit: &PendingEdit) -> Result<(), SyncError>;

    fn clear_pending(&self) -> Result<(), SyncError>;
}
