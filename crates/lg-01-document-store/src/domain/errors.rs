//! # Domain Errors
//!
//! Failure modes of the document store.
//!
//! ## Design Principles
//!
//! - `NotFound` is reported, never papered over: the adapter does not invent
//!   content for an absent path.
//! - `VersionConflict` means the expected token no longer matches (or a
//!   create-only write found an existing document).
//! - Network-level failures are `Transient`; quota exhaustion is
//!   `RateLimited` and carries a retry hint when the backend gives one.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Nothing is stored at this path.
    #[error("Document not found: {path}")]
    NotFound { path: String },

    /// Another writer updated the document first.
    #[error("Version conflict on {path}: the stored document changed since it was read")]
    VersionConflict { path: String },

    /// Remote quota exhausted.
    #[error("Store rate limit exceeded (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The store credential was refused.
    #[error("Store credential rejected: {0}")]
    CredentialRejected(String),

    /// The backend refused the request for a reason other than a conflict.
    #[error("Store rejected the request: {0}")]
    Rejected(String),

    /// Network failure, timeout or backend outage.
    #[error("Transient store failure: {0}")]
    Transient(String),

    /// The backend answered with something that cannot be decoded.
    #[error("Unreadable store response: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::VersionConflict { .. }
                | StoreError::RateLimited { .. }
                | StoreError::Transient(_)
        )
    }
}
