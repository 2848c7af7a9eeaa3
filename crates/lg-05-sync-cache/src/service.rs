//! # Cached League Client
//!
//! Read-through cache of the last league document fetched from the server.
//!
//! - A successful `get-data` overwrites the snapshot wholesale.
//! - A read that fails for availability reasons answers from the snapshot
//!   and is labelled [`Freshness::Stale`](crate::domain::Freshness::Stale).
//! - A failed write is reported as not landed; a whole-document edit is
//!   kept locally as a [`PendingEdit`] for a manual retry. The snapshot is
//!   never written back to the server on its own.

use crate::domain::{ClientError, PendingEdit, Snapshot, SyncError, Synced};
use crate::ports::{LeagueRemote, SnapshotStore};
use lg_02_standings::{self as standings, LeagueSummary, StandingsTable};
use lg_03_dispatcher::ActionRequest;
use serde_json::Value;
use shared_types::{Clock, LeagueDocument, SystemClock, VersionToken};
use std::sync::Arc;
use tracing::{info, warn};

/// Standings as shown to a client, recomputed locally from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsView {
    pub group: Option<String>,
    pub table: StandingsTable,
    pub summary: LeagueSummary,
    pub goals_conserved: bool,
}

impl StandingsView {
    pub fn from_document(document: &LeagueDocument, group: Option<&str>) -> Self {
        let table = match group {
            Some(group) => standings::project_group(&document.teams, group),
            None => standings::project(&document.teams),
        };
        Self {
            group: group.map(str::to_string),
            table,
            summary: standings::summarize(document),
            goals_conserved: standings::goals_conserved(document),
        }
    }
}

pub struct CachedLeagueClient {
    remote: Arc<dyn LeagueRemote>,
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
}

impl CachedLeagueClient {
    pub fn new(remote: Arc<dyn LeagueRemote>, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            remote,
            snapshots,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn endpoint(&self) -> String {
        self.remote.endpoint()
    }

    /// Fetch the document, falling back to the snapshot when the server is
    /// unavailable.
    pub async fn pull(&self) -> Result<Synced<LeagueDocument>, SyncError> {
        match self.fetch_live().await {
            Ok((document, version)) => {
                let snapshot = Snapshot {
                    document,
                    version: version.clone(),
                    cached_at: self.clock.now(),
                };
                if let Err(e) = self.snapshots.save(&snapshot) {
                    warn!(error = %e, "Fetched document but could not refresh snapshot");
                }
                Ok(Synced::live(snapshot.document, version))
            }
            Err(cause) if cause.allows_fallback() => {
                let Some(snapshot) = self.snapshots.load()? else {
                    return Err(SyncError::NoSnapshot { cause });
                };
                warn!(
                    endpoint = %self.remote.endpoint(),
                    error = %cause,
                    cached_at = %snapshot.cached_at,
                    "Serving cached league data"
                );
                Ok(Synced::stale(
                    snapshot.document,
                    snapshot.cached_at,
                    cause.to_string(),
                ))
            }
            Err(cause) => Err(SyncError::Remote(cause)),
        }
    }

    /// Standings, projected locally from [`pull`](Self::pull).
    pub async fn standings(&self, group: Option<&str>) -> Result<Synced<StandingsView>, SyncError> {
        let synced = self.pull().await?;
        Ok(synced.map(|document| StandingsView::from_document(&document, group)))
    }

    /// The current snapshot, without contacting the server.
    pub fn cached(&self) -> Result<Option<Snapshot>, SyncError> {
        self.snapshots.load()
    }

    pub fn pending(&self) -> Result<Option<PendingEdit>, SyncError> {
        self.snapshots.load_pending()
    }

    /// Replace the whole document on the server. With `expected` set the
    /// write only lands if the server is still at that version.
    ///
    /// On failure the edited document is kept as the pending edit.
    pub async fn push(
        &self,
        document: LeagueDocument,
        expected: Option<VersionToken>,
    ) -> Result<VersionToken, SyncError> {
        let data = serde_json::to_value(&document)
            .map_err(|e| SyncError::Snapshot(format!("failed to encode document: {e}")))?;
        let mut request = action_request("update-data").with_data(data);
        if let Some(version) = expected.clone() {
            request = request.with_version(version);
        }

        let reply = self.remote.call(request).await.and_then(|body| {
            version_field(&body).ok_or_else(|| {
                ClientError::Decode("update-data reply carries no version".into())
            })
        });

        match reply {
            Ok(version) => {
                let snapshot = Snapshot {
                    document,
                    version: Some(version.clone()),
                    cached_at: self.clock.now(),
                };
                if let Err(e) = self.snapshots.save(&snapshot) {
                    warn!(error = %e, "Write landed but snapshot refresh failed");
                }
                self.snapshots.clear_pending()?;
                info!(version = %version, "Document saved");
                Ok(version)
            }
            Err(cause) => {
                let edit = PendingEdit {
                    document,
                    base_version: expected,
                    saved_at: self.clock.now(),
                    reason: cause.to_string(),
                };
                let pending_saved = match self.snapshots.save_pending(&edit) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, "Could not keep the unsaved edit locally");
                        false
                    }
                };
                Err(SyncError::WriteNotLanded {
                    cause,
                    pending_saved,
                })
            }
        }
    }

    /// Push the pending edit again, under the version it was based on.
    /// `Ok(None)` when there is nothing pending.
    pub async fn retry_pending(&self) -> Result<Option<VersionToken>, SyncError> {
        let Some(edit) = self.snapshots.load_pending()? else {
            return Ok(None);
        };
        self.push(edit.document, edit.base_version).await.map(Some)
    }

    /// Run a single-purpose write action such as `register-team`.
    pub async fn write(&self, action: &str, data: Option<Value>) -> Result<Value, SyncError> {
        let mut request = action_request(action);
        if let Some(data) = data {
            request = request.with_data(data);
        }
        self.remote
            .call(request)
            .await
            .map_err(|cause| SyncError::WriteNotLanded {
                cause,
                pending_saved: false,
            })
    }

    /// Run a read action that has no cached equivalent, such as `stats`.
    pub async fn read(&self, action: &str, data: Option<Value>) -> Result<Value, SyncError> {
        let mut request = action_request(action);
        if let Some(data) = data {
            request = request.with_data(data);
        }
        Ok(self.remote.call(request).await?)
    }

    pub async fn health(&self) -> Result<Value, SyncError> {
        Ok(self.remote.health().await?)
    }

    async fn fetch_live(&self) -> Result<(LeagueDocument, Option<VersionToken>), ClientError> {
        let mut body = self.remote.call(action_request("get-data")).await?;
        let version = version_field(&body);
        let data = body
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| ClientError::Decode("get-data reply carries no data".into()))?;
        let document = serde_json::from_value(data)
            .map_err(|e| ClientError::Decode(format!("league document: {e}")))?;
        Ok((document, version))
    }
}

/// Request without a secret; the remote attaches its own.
fn action_request(action: &str) -> ActionRequest {
    ActionRequest {
        action: action.to_string(),
        ..Default::default()
    }
}

fn version_field(body: &Value) -> Option<VersionToken> {
    body.get("version")
        .and_then(Value::as_str)
        .map(VersionToken::new)
}
