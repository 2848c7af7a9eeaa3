//! # Store Entities
//!
//! What the store hands back: raw content plus the revision it belongs to.

use serde::{Deserialize, Serialize};
use shared_types::VersionToken;

/// A document as read from the store, with the token that must accompany the
/// next write of the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

/// Commit information reported by the backend for a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMetadata {
    /// Backend commit identifier, when the backend has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// The commit description supplied by the writer.
    pub message: String,
    /// Link to the commit, when the backend provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Outcome of a committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Token of the revision just written.
    pub version: VersionToken,
    pub commit: CommitMetadata,
}
