//! Read-side standings table.
//!
//! Never persisted: computed from the team counters on every read.

use serde::{Deserialize, Serialize};
use shared_types::{LeagueDocument, Team};
use std::cmp::Ordering;

/// Rows at the top of the table that qualify.
pub const QUALIFYING_ROWS: usize = 2;

/// Rows at the bottom of the table that are eliminated.
pub const ELIMINATION_ROWS: usize = 2;

/// Table position band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Qualified,
    Safe,
    Eliminated,
}

/// One ranked team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    /// 1-based table position.
    pub position: usize,
    pub zone: Zone,
    #[serde(flatten)]
    pub team: Team,
}

/// Ranked table: points descending, then goal difference descending, then
/// original order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandingsTable {
    pub rows: Vec<StandingsRow>,
}

impl StandingsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a team, if it is in the table.
    pub fn position_of(&self, team_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.team.id == team_id)
            .map(|r| r.position)
    }

    pub fn leader(&self) -> Option<&Team> {
        self.rows.first().map(|r| &r.team)
    }
}

/// Aggregates computed alongside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSummary {
    pub total_teams: usize,
    pub played_matches: usize,
    /// Sum of `goalsFor` across all teams.
    pub total_goals: u64,
    /// Played but not yet confirmed as official.
    pub awaiting_confirmation: usize,
    /// Not yet played.
    pub upcoming_matches: usize,
}

fn compare_points(a: &Team, b: &Team) -> Ordering {
    b.points.cmp(&a.points)
}

fn compare_goal_difference(a: &Team, b: &Team) -> Ordering {
    b.goals_difference.cmp(&a.goals_difference)
}

/// Rank `teams`. Identical input (including order) always yields identical
/// output; ties on both keys keep their input order.
pub fn project(teams: &[Team]) -> StandingsTable {
    let mut ranked: Vec<&Team> = teams.iter().collect();
    // `sort_by` is stable, which provides the final tie-break.
    ranked.sort_by(|a, b| compare_points(a, b).then_with(|| compare_goal_difference(a, b)));

    let total = ranked.len();
    let rows = ranked
        .into_iter()
        .enumerate()
        .map(|(index, team)| StandingsRow {
            position: index + 1,
            zone: zone_for(index, total),
            team: team.clone(),
        })
        .collect();

    StandingsTable { rows }
}

/// Rank only the teams in `group`.
pub fn project_group(teams: &[Team], group: &str) -> StandingsTable {
    let members: Vec<Team> = teams
        .iter()
        .filter(|t| t.group.eq_ignore_ascii_case(group))
        .cloned()
        .collect();
    project(&members)
}

fn zone_for(index: usize, total: usize) -> Zone {
    if index < QUALIFYING_ROWS {
        Zone::Qualified
    } else if total > QUALIFYING_ROWS + ELIMINATION_ROWS && index >= total - ELIMINATION_ROWS {
        Zone::Eliminated
    } else {
        Zone::Safe
    }
}

/// Counts and goal totals for the whole document.
pub fn summarize(document: &LeagueDocument) -> LeagueSummary {
    let played = document.matches.iter().filter(|m| m.played);
    LeagueSummary {
        total_teams: document.teams.len(),
        played_matches: played.clone().count(),
        total_goals: document.teams.iter().map(|t| u64::from(t.goals_for)).sum(),
        awaiting_confirmation: played.filter(|m| !m.confirmed).count(),
        upcoming_matches: document.matches.iter().filter(|m| !m.played).count(),
    }
}

/// Goals credited to teams equal goals scored in played matches.
pub fn goals_conserved(document: &LeagueDocument) -> bool {
    let credited: u64 = document.teams.iter().map(|t| u64::from(t.goals_for)).sum();
    let scored: u64 = document
        .matches
        .iter()
        .filter_map(|m| m.final_score())
        .map(|(h, a)| u64::from(h) + u64::from(a))
        .sum();
    credited == scored
}
