//! # Domain Errors
//!
//! Rejections raised by league edit operations. Every variant leaves the
//! document untouched.

use thiserror::Error;

/// Errors that can occur while editing the league document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    /// A required text field was empty after trimming.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Team names must be at least three characters.
    #[error("Team name '{0}' is too short (minimum {min} characters)", min = crate::domain::edits::MIN_TEAM_NAME_CHARS)]
    TeamNameTooShort(String),

    /// Team names are unique, ignoring case.
    #[error("A team named '{0}' is already registered")]
    DuplicateTeamName(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    /// Home and away must be different teams.
    #[error("A team cannot play itself: {0}")]
    SelfMatch(String),

    /// Scores are write-once: a played match cannot be re-scored.
    #[error("Match {0} already has a recorded result")]
    MatchAlreadyPlayed(String),

    #[error("Score {0} is out of range (maximum {max})", max = crate::domain::results::MAX_SCORE)]
    ScoreOutOfRange(u32),

    /// A team counter would exceed its range.
    #[error("Counters for team {0} would overflow")]
    CounterOverflow(String),

    #[error("Match {0} has not been played yet")]
    MatchNotPlayed(String),

    /// Teams with fixtures cannot be removed without orphaning results.
    #[error("Team {team_id} still has {matches} match(es)")]
    TeamHasMatches { team_id: String, matches: usize },
}
