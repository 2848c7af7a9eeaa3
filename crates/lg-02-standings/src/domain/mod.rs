//! # Domain Layer
//!
//! Pure functions over `LeagueDocument`. No I/O.

pub mod edits;
pub mod errors;
pub mod projection;
pub mod results;

pub use edits::{publish_news, register_team, remove_team, schedule_match, MIN_TEAM_NAME_CHARS};
pub use errors::LeagueError;
pub use projection::{
    goals_conserved, project, project_group, summarize, LeagueSummary, StandingsRow,
    StandingsTable, Zone,
};
pub use results::{
    apply_result, confirm_result, record_result, Outcome, MAX_SCORE, POINTS_DRAW, POINTS_WIN,
};
