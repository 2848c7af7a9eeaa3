//! Live/stale labelling of everything the client shows.

use chrono::{DateTime, SecondsFormat, Utc};
use shared_types::VersionToken;
use std::fmt;

/// Where a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Straight from the server.
    Live { version: Option<VersionToken> },
    /// From the local snapshot because the server could not be used.
    Stale {
        cached_at: DateTime<Utc>,
        reason: String,
    },
}

impl Freshness {
    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale { .. })
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Live { version: Some(v) } => write!(f, "LIVE (version {v})"),
            Freshness::Live { version: None } => f.write_str("LIVE"),
            Freshness::Stale { cached_at, reason } => write!(
                f,
                "STALE (cached at {}, reason: {reason})",
                cached_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
        }
    }
}

/// A value with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Synced<T> {
    pub fn live(value: T, version: Option<VersionToken>) -> Self {
        Self {
            value,
            freshness: Freshness::Live { version },
        }
    }

    pub fn stale(value: T, cached_at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            value,
            freshness: Freshness::Stale {
                cached_at,
                reason: reason.into(),
            },
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Synced<U> {
        Synced {
            value: f(self.value),
            freshness: self.freshness,
        }
    }
}
