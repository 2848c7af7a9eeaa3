//! What the client keeps on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{LeagueDocument, VersionToken};

/// Last document successfully fetched from the server. Overwritten
/// wholesale on the next successful fetch, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub document: LeagueDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
    pub cached_at: DateTime<Utc>,
}

/// An edited document whose write did not land, kept for a manual retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    pub document: LeagueDocument,
    /// Version the edit was based on, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_version: Option<VersionToken>,
    pub saved_at: DateTime<Utc>,
    /// Why the write failed.
    pub reason: String,
}
