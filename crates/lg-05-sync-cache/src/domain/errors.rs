//! Client-side failures.

use serde_json::Value;
use thiserror::Error;

/// Failure talking to the league server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, TLS failure.
    #[error("cannot reach {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("request to the league server timed out")]
    Timeout,

    /// The server answered with an error body.
    #[error("{kind} ({status}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// The server answered with something that is not a league reply.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a gateway error body. Missing
    /// fields fall back to the HTTP status.
    pub fn from_error_body(status: u16, body: &Value) -> Self {
        let error = body.get("error");
        let field = |name: &str| {
            error
                .and_then(|e| e.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        ClientError::Api {
            status,
            kind: field("kind").unwrap_or_else(|| format!("Http{status}")),
            message: field("message").unwrap_or_else(|| "no error message".to_string()),
            retry_after_secs: error
                .and_then(|e| e.get("retryAfterSecs"))
                .and_then(Value::as_u64),
        }
    }

    /// Whether the local snapshot may stand in for the answer. Caller
    /// mistakes and a bad secret are reported, not papered over.
    pub fn allows_fallback(&self) -> bool {
        match self {
            ClientError::Unreachable { .. } | ClientError::Timeout | ClientError::Decode(_) => true,
            ClientError::Api { status, .. } => *status >= 500 || *status == 429,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            ClientError::Unreachable { .. } => "Unreachable",
            ClientError::Timeout => "Timeout",
            ClientError::Api { kind, .. } => kind,
            ClientError::Decode(_) => "Decode",
        }
    }
}

/// Failure of a cached-client operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The server refused in a way the snapshot cannot cover.
    #[error(transparent)]
    Remote(#[from] ClientError),

    /// The server is unavailable and nothing has been cached yet.
    #[error("league server unavailable and no cached copy exists: {cause}")]
    NoSnapshot { cause: ClientError },

    /// A write failed. The server copy is unchanged.
    #[error("write did not land: {cause}{}", pending_note(.pending_saved))]
    WriteNotLanded {
        cause: ClientError,
        pending_saved: bool,
    },

    /// Reading or writing the local snapshot failed.
    #[error("snapshot storage error: {0}")]
    Snapshot(String),
}

fn pending_note(saved: &bool) -> &'static str {
    if *saved {
        " (edited document kept locally for retry)"
    } else {
        ""
    }
}
