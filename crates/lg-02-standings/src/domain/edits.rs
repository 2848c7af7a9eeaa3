//! Admin edits to the league document: registration, fixtures, news, removal.
//!
//! Each function validates first and mutates only on success.

use super::errors::LeagueError;
use chrono::{DateTime, SecondsFormat, Utc};
use shared_types::{LeagueDocument, Match, NewsItem, Team, DEFAULT_GROUP};

/// Minimum length of a team name, in characters, after trimming.
pub const MIN_TEAM_NAME_CHARS: usize = 3;

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, LeagueError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::MissingField(field));
    }
    Ok(trimmed)
}

/// Register a new team with zeroed counters.
///
/// Names are trimmed, must have at least [`MIN_TEAM_NAME_CHARS`] characters,
/// and must not collide (case-insensitively) with a registered team.
pub fn register_team(
    document: &mut LeagueDocument,
    name: &str,
    owner: &str,
    group: Option<&str>,
    id: String,
    now: DateTime<Utc>,
) -> Result<Team, LeagueError> {
    let name = required(name, "name")?;
    if name.chars().count() < MIN_TEAM_NAME_CHARS {
        return Err(LeagueError::TeamNameTooShort(name.to_string()));
    }
    let owner = required(owner, "owner")?;
    if document.team_by_name(name).is_some() {
        return Err(LeagueError::DuplicateTeamName(name.to_string()));
    }

    let group = group
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GROUP);
    let team = Team::new(id, name, owner, group, now);
    document.teams.push(team.clone());
    Ok(team)
}

/// Add an unplayed fixture between two registered teams.
///
/// A missing or blank `date` schedules the fixture at `now`.
pub fn schedule_match(
    document: &mut LeagueDocument,
    home_team_id: &str,
    away_team_id: &str,
    date: Option<&str>,
    stage: Option<&str>,
    id: String,
    now: DateTime<Utc>,
) -> Result<Match, LeagueError> {
    if home_team_id == away_team_id {
        return Err(LeagueError::SelfMatch(home_team_id.to_string()));
    }
    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => date.to_string(),
        None => now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let home = document
        .team(home_team_id)
        .ok_or_else(|| LeagueError::TeamNotFound(home_team_id.to_string()))?;
    let away = document
        .team(away_team_id)
        .ok_or_else(|| LeagueError::TeamNotFound(away_team_id.to_string()))?;

    let mut fixture = Match::scheduled(id, home, away, date);
    if let Some(stage) = stage.map(str::trim).filter(|s| !s.is_empty()) {
        fixture.stage = stage.to_string();
    }
    document.matches.push(fixture.clone());
    Ok(fixture)
}

/// Publish a news item at the head of the feed.
pub fn publish_news(
    document: &mut LeagueDocument,
    title: &str,
    content: &str,
    pinned: bool,
    id: String,
    now: DateTime<Utc>,
) -> Result<NewsItem, LeagueError> {
    let title = required(title, "title")?;
    let item = NewsItem {
        id,
        title: title.to_string(),
        content: content.trim().to_string(),
        date: now,
        pinned,
    };
    document.news.insert(0, item.clone());
    Ok(item)
}

/// Remove a team that has no fixtures.
pub fn remove_team(document: &mut LeagueDocument, team_id: &str) -> Result<Team, LeagueError> {
    let index = document
        .teams
        .iter()
        .position(|t| t.id == team_id)
        .ok_or_else(|| LeagueError::TeamNotFound(team_id.to_string()))?;

    let fixtures = document.matches.iter().filter(|m| m.involves(team_id)).count();
    if fixtures > 0 {
        return Err(LeagueError::TeamHasMatches {
            team_id: team_id.to_string(),
            matches: fixtures,
        });
    }
    Ok(document.teams.remove(index))
}
