//! # Dispatch Errors
//!
//! The closed failure taxonomy surfaced to callers. The gateway matches it
//! exhaustively to choose an HTTP status.

use lg_01_document_store::StoreError;
use lg_02_standings::LeagueError;
use shared_types::DocumentCodecError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Missing or wrong shared secret. Terminal.
    #[error("Unauthorized: Invalid secret key")]
    Unauthorized,

    /// Required server configuration is absent. Operator action required.
    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(String),

    /// The action needs a `data` payload and none was sent.
    #[error("Missing data for action '{0}'")]
    MissingPayload(&'static str),

    /// The action name is not in the registry.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The payload was present but unusable.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The document changed underneath every attempt.
    #[error("Version conflict after {attempts} attempt(s): reload and retry")]
    VersionConflict { attempts: u32 },

    #[error("Store rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Network failure, timeout or backend outage. The write did not land.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Stable variant name used as the `kind` field of error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Unauthorized => "Unauthorized",
            DispatchError::ServerMisconfigured(_) => "ServerMisconfigured",
            DispatchError::MissingPayload(_) => "MissingPayload",
            DispatchError::InvalidAction(_) => "InvalidAction",
            DispatchError::InvalidPayload(_) => "InvalidPayload",
            DispatchError::NotFound(_) => "NotFound",
            DispatchError::VersionConflict { .. } => "VersionConflict",
            DispatchError::RateLimited { .. } => "RateLimited",
            DispatchError::StoreUnavailable(_) => "StoreUnavailable",
            DispatchError::Internal(_) => "Internal",
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DispatchError::VersionConflict { .. }
                | DispatchError::RateLimited { .. }
                | DispatchError::StoreUnavailable(_)
        )
    }

    /// Backoff hint, if the store supplied one.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            DispatchError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => DispatchError::NotFound(path),
            StoreError::VersionConflict { .. } => DispatchError::VersionConflict { attempts: 1 },
            StoreError::RateLimited { retry_after_secs } => {
                DispatchError::RateLimited { retry_after_secs }
            }
            StoreError::CredentialRejected(msg) => {
                DispatchError::ServerMisconfigured(format!("store credential rejected: {msg}"))
            }
            StoreError::Rejected(msg) | StoreError::Transient(msg) => {
                DispatchError::StoreUnavailable(msg)
            }
            StoreError::Corrupt(msg) => DispatchError::Internal(msg),
        }
    }
}

impl From<LeagueError> for DispatchError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::TeamNotFound(_) | LeagueError::MatchNotFound(_) => {
                DispatchError::NotFound(err.to_string())
            }
            other => DispatchError::InvalidPayload(other.to_string()),
        }
    }
}

impl From<DocumentCodecError> for DispatchError {
    fn from(err: DocumentCodecError) -> Self {
        DispatchError::Internal(err.to_string())
    }
}
