//! Success payloads returned by the dispatcher.
//!
//! Serialized untagged: the gateway merges the fields with `"success": true`.

use chrono::{DateTime, Utc};
use lg_01_document_store::CommitMetadata;
use lg_02_standings::{LeagueSummary, StandingsRow};
use serde::{Deserialize, Serialize};
use shared_types::{ChangeSummary, LeagueDocument, Match, NewsItem, Notification, Team, VersionToken};

/// Collection sizes of the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub teams: usize,
    pub matches: usize,
    pub news: usize,
    pub notifications: usize,
    pub unread_notifications: usize,
    pub played_matches: usize,
    pub total_goals: u64,
}

/// Result of probing the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// `ok`, `degraded` or `misconfigured`.
    pub status: String,
    pub configured: bool,
    /// Store backend tag, when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    pub store_reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.configured && self.store_reachable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ActionReply {
    /// `get-data`.
    Document {
        data: LeagueDocument,
        version: VersionToken,
        /// True when this call created the document.
        initialized: bool,
    },
    /// `update-data` and `clear-data`.
    Replaced {
        message: String,
        version: VersionToken,
        commit: CommitMetadata,
        changes: ChangeSummary,
        timestamp: DateTime<Utc>,
    },
    /// `add-notification`.
    NotificationAdded {
        message: String,
        notification: Notification,
        version: VersionToken,
    },
    /// `mark-notifications-read`.
    NotificationsRead { marked: usize, version: VersionToken },
    Stats {
        #[serde(flatten)]
        stats: DocumentStats,
        status: String,
    },
    Health(HealthReport),
    Backup {
        backup_path: String,
        version: VersionToken,
        commit: CommitMetadata,
    },
    Team { team: Team, version: VersionToken },
    Match {
        #[serde(rename = "match")]
        fixture: Match,
        version: VersionToken,
    },
    News { news: NewsItem, version: VersionToken },
    Standings {
        #[serde(skip_serializing_if = "Option::is_none")]
        group: Option<String>,
        standings: Vec<StandingsRow>,
        summary: LeagueSummary,
        goals_conserved: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<VersionToken>,
    },
}

impl ActionReply {
    /// New version token, if the action produced or observed one.
    pub fn version(&self) -> Option<&VersionToken> {
        match self {
            ActionReply::Document { version, .. }
            | ActionReply::Replaced { version, .. }
            | ActionReply::NotificationAdded { version, .. }
            | ActionReply::NotificationsRead { version, .. }
            | ActionReply::Backup { version, .. }
            | ActionReply::Team { version, .. }
            | ActionReply::Match { version, .. }
            | ActionReply::News { version, .. } => Some(version),
            ActionReply::Standings { version, .. } => version.as_ref(),
            ActionReply::Stats { .. } | ActionReply::Health(_) => None,
        }
    }
}
