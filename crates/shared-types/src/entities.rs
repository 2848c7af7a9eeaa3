//! # League Entities
//!
//! Defines the single persisted aggregate (`LeagueDocument`) and the records
//! nested inside it.
//!
//! ## Clusters
//!
//! - **Competition**: `Team`, `Match`
//! - **Publishing**: `NewsItem`, `Notification`
//! - **Configuration**: `LeagueSettings`
//!
//! Field names serialize in camelCase so the stored `data.json` stays
//! readable by the browser front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque team identifier, generated at registration.
pub type TeamId = String;

/// Opaque match identifier.
pub type MatchId = String;

/// Group assigned to a team until the draw says otherwise.
pub const DEFAULT_GROUP: &str = "A";

/// Stage label given to matches created without one.
pub const DEFAULT_STAGE: &str = "Group stage";

/// Severity given to notifications created without one.
pub const DEFAULT_NOTIFICATION_KIND: &str = "info";

/// Identifier of the news item seeded into a fresh document.
pub const WELCOME_NEWS_ID: &str = "welcome";

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

fn default_notification_kind() -> String {
    DEFAULT_NOTIFICATION_KIND.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

// =============================================================================
// CLUSTER A: COMPETITION
// =============================================================================

/// A registered team and its running table counters.
///
/// Counters are only ever advanced by one completed match at a time; they are
/// never recomputed from match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    #[serde(default)]
    pub goals_difference: i64,
    #[serde(default)]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<DateTime<Utc>>,
}

impl Team {
    /// Create a team with zeroed counters.
    pub fn new(
        id: impl Into<TeamId>,
        name: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
            group: group.into(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goals_difference: 0,
            points: 0,
            registration_date: Some(registered_at),
        }
    }

    /// Goal difference as derived from the raw counters.
    pub fn derived_goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Check the counter invariants:
    /// `played = wins + draws + losses`, `points = 3*wins + draws`,
    /// `goalsDifference = goalsFor - goalsAgainst`.
    pub fn counters_consistent(&self) -> bool {
        self.played == self.wins + self.draws + self.losses
            && self.points == 3 * self.wins + self.draws
            && self.goals_difference == self.derived_goal_difference()
    }

    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// A fixture between two distinct teams.
///
/// `played` and `confirmed` are independent: a result can be recorded before
/// it is confirmed as official.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    #[serde(default)]
    pub home_team_id: TeamId,
    #[serde(default)]
    pub away_team_id: TeamId,
    /// Display name of the home team at scheduling time.
    #[serde(default)]
    pub home_team: String,
    /// Display name of the away team at scheduling time.
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    /// Scheduled kick-off as entered by the admin (free-form date string).
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub confirmed: bool,
}

impl Match {
    /// Create an unplayed, unconfirmed fixture.
    pub fn scheduled(id: impl Into<MatchId>, home: &Team, away: &Team, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            home_team_id: home.id.clone(),
            away_team_id: away.id.clone(),
            home_team: home.name.clone(),
            away_team: away.name.clone(),
            home_score: None,
            away_score: None,
            date: date.into(),
            stage: default_stage(),
            played: false,
            confirmed: false,
        }
    }

    /// Final score, if the match has been played and both scores are set.
    pub fn final_score(&self) -> Option<(u32, u32)> {
        if !self.played {
            return None;
        }
        Some((self.home_score?, self.away_score?))
    }

    /// Whether the given team takes part in this match.
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

// =============================================================================
// CLUSTER B: PUBLISHING
// =============================================================================

/// A news post shown on the public site, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Publish timestamp.
    #[serde(default)]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
}

/// An entry in the admin notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    /// Severity tag (`info`, `warning`, `success`, `error`, or anything else).
    #[serde(rename = "type", default = "default_notification_kind")]
    pub kind: String,
    /// Creation timestamp.
    #[serde(default)]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        kind: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            kind: kind.unwrap_or_else(default_notification_kind),
            date: created_at,
            read: false,
        }
    }
}

// =============================================================================
// CLUSTER C: CONFIGURATION
// =============================================================================

/// Tournament-wide settings. Unknown keys are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub match_days: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            prize_pool: Some("To be announced".to_string()),
            start_date: None,
            match_days: vec!["Saturday".to_string(), "Sunday".to_string()],
            extra: BTreeMap::new(),
        }
    }
}

// =============================================================================
// THE AGGREGATE
// =============================================================================

/// The single persisted aggregate holding all tournament state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueDocument {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub admin_notifications: Vec<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<LeagueSettings>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl LeagueDocument {
    /// The document written the first time the store is found empty:
    /// no teams or matches, one welcome news item, default settings.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            teams: Vec::new(),
            matches: Vec::new(),
            news: vec![NewsItem {
                id: WELCOME_NEWS_ID.to_string(),
                title: "The league is live!".to_string(),
                content: "Welcome to the official tournament site.".to_string(),
                date: now,
                pinned: false,
            }],
            admin_notifications: Vec::new(),
            settings: Some(LeagueSettings::default()),
            last_updated: Some(now),
        }
    }

    /// An emptied document that keeps the current settings.
    pub fn reset_from(previous: &LeagueDocument, now: DateTime<Utc>) -> Self {
        Self {
            settings: previous.settings.clone(),
            last_updated: Some(now),
            ..Self::default()
        }
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_name(name))
    }

    pub fn find_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Stamp the document as written at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = Some(now);
    }

    /// Collection sizes reported after a whole-document replace.
    pub fn change_summary(&self) -> ChangeSummary {
        ChangeSummary {
            teams: self.teams.len(),
            matches: self.matches.len(),
            news: self.news.len(),
        }
    }

    /// Unread entries in the notification log.
    pub fn unread_notifications(&self) -> usize {
        self.admin_notifications.iter().filter(|n| !n.read).count()
    }
}

/// Counts of teams, matches and news in a written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub teams: usize,
    pub matches: usize,
    pub news: usize,
}

// =============================================================================
// VERSIONING
// =============================================================================

/// Opaque content hash identifying one stored revision of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 24, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_seeded_document_shape() {
        let doc = LeagueDocument::seeded(now());
        assert!(doc.teams.is_empty());
        assert!(doc.matches.is_empty());
        assert!(doc.admin_notifications.is_empty());
        assert_eq!(doc.news.len(), 1);
        assert_eq!(doc.news[0].id, WELCOME_NEWS_ID);
        assert!(doc.settings.is_some());
        assert_eq!(doc.last_updated, Some(now()));
    }

    #[test]
    fn test_reset_keeps_settings_only() {
        let mut doc = LeagueDocument::seeded(now());
        doc.teams.push(Team::new("t1", "Lions", "Alex", "A", now()));
        let reset = LeagueDocument::reset_from(&doc, now());
        assert!(reset.teams.is_empty());
        assert!(reset.news.is_empty());
        assert_eq!(reset.settings, doc.settings);
    }

    #[test]
    fn test_reads_stored_camel_case_json() {
        let raw = r#"{
            "teams": [{
                "id": "demo1", "name": "Real", "owner": "Alex", "group": "A",
                "played": 3, "wins": 2, "draws": 1, "losses": 0,
                "goalsFor": 7, "goalsAgainst": 2, "goalsDifference": 5, "points": 7
            }],
            "matches": [{
                "id": "m1", "homeTeam": "Real", "awayTeam": "Barca",
                "homeScore": 2, "awayScore": 2, "date": "2026-01-24T15:00:00Z",
                "played": true, "confirmed": true
            }],
            "news": [],
            "adminNotifications": [{"id": "n1", "message": "hi", "date": "2026-01-24T15:00:00Z", "read": false}],
            "settings": {"prizePool": "100", "matchDays": ["Fri"], "season": 2}
        }"#;
        let doc: LeagueDocument = serde_json::from_str(raw).unwrap();
        assert!(doc.teams[0].counters_consistent());
        assert_eq!(doc.matches[0].final_score(), Some((2, 2)));
        assert_eq!(doc.matches[0].stage, DEFAULT_STAGE);
        assert_eq!(doc.admin_notifications[0].kind, DEFAULT_NOTIFICATION_KIND);
        let settings = doc.settings.unwrap();
        assert_eq!(settings.extra.get("season"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_team_name_is_case_insensitive() {
        let team = Team::new("t1", "Dynamo", "Mike", "B", now());
        assert!(team.has_name("  dYNAMO "));
        assert!(!team.has_name("Dynamo Kyiv"));
    }

    #[test]
    fn test_unplayed_match_has_no_final_score() {
        let home = Team::new("h", "Home", "a", "A", now());
        let away = Team::new("w", "Away", "b", "A", now());
        let mut fixture = Match::scheduled("m", &home, &away, "2026-02-01");
        assert_eq!(fixture.final_score(), None);
        fixture.home_score = Some(1);
        fixture.away_score = Some(0);
        assert_eq!(fixture.final_score(), None);
        fixture.played = true;
        assert_eq!(fixture.final_score(), Some((1, 0)));
        assert!(fixture.involves("w"));
    }
}
