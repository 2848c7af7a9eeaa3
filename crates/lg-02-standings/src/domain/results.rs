//! Result recording.
//!
//! A completed match advances each participant's counters exactly once:
//! `played += 1`, one of `wins`/`draws`/`losses` += 1, goals for and against
//! by the scores, then goal difference and points re-derived.

use super::errors::LeagueError;
use shared_types::{LeagueDocument, Match, Team};

/// Points for a win.
pub const POINTS_WIN: u32 = 3;

/// Points for a draw.
pub const POINTS_DRAW: u32 = 1;

/// Highest score either side may be credited with in one match.
pub const MAX_SCORE: u32 = 99;

/// Outcome of a match from one side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    fn from_scores(own: u32, other: u32) -> Self {
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

fn bump(value: u32, by: u32, team: &Team) -> Result<u32, LeagueError> {
    value
        .checked_add(by)
        .ok_or_else(|| LeagueError::CounterOverflow(team.id.clone()))
}

/// The counters of `team` after one more match, or an error if any of them
/// would overflow.
fn credit(team: &Team, scored: u32, conceded: u32) -> Result<Team, LeagueError> {
    let mut next = team.clone();
    next.played = bump(team.played, 1, team)?;
    match Outcome::from_scores(scored, conceded) {
        Outcome::Win => next.wins = bump(team.wins, 1, team)?,
        Outcome::Draw => next.draws = bump(team.draws, 1, team)?,
        Outcome::Loss => next.losses = bump(team.losses, 1, team)?,
    }
    next.goals_for = bump(team.goals_for, scored, team)?;
    next.goals_against = bump(team.goals_against, conceded, team)?;
    next.goals_difference = next.derived_goal_difference();
    next.points = POINTS_WIN
        .checked_mul(next.wins)
        .and_then(|wins| POINTS_DRAW.checked_mul(next.draws)?.checked_add(wins))
        .ok_or_else(|| LeagueError::CounterOverflow(team.id.clone()))?;
    Ok(next)
}

/// Apply one completed match to both participants.
///
/// Both teams are left untouched when either side's counters would overflow.
pub fn apply_result(
    home: &mut Team,
    away: &mut Team,
    home_score: u32,
    away_score: u32,
) -> Result<(), LeagueError> {
    let next_home = credit(home, home_score, away_score)?;
    let next_away = credit(away, away_score, home_score)?;
    *home = next_home;
    *away = next_away;
    Ok(())
}

/// Record the final score of `match_id` and advance both teams' counters.
///
/// Scores are write-once: a match that is already played is rejected and
/// nothing changes. Scores above [`MAX_SCORE`] are rejected. `confirmed`
/// marks the result as official.
pub fn record_result(
    document: &mut LeagueDocument,
    match_id: &str,
    home_score: u32,
    away_score: u32,
    confirmed: bool,
) -> Result<Match, LeagueError> {
    if let Some(score) = [home_score, away_score].into_iter().find(|s| *s > MAX_SCORE) {
        return Err(LeagueError::ScoreOutOfRange(score));
    }
    let index = document
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;

    let fixture = &document.matches[index];
    if fixture.played {
        return Err(LeagueError::MatchAlreadyPlayed(match_id.to_string()));
    }

    let home_index = team_index(document, &fixture.home_team_id)?;
    let away_index = team_index(document, &fixture.away_team_id)?;
    if home_index == away_index {
        return Err(LeagueError::SelfMatch(fixture.home_team_id.clone()));
    }

    let (home, away) = pair_mut(&mut document.teams, home_index, away_index);
    apply_result(home, away, home_score, away_score)?;

    let fixture = &mut document.matches[index];
    fixture.home_score = Some(home_score);
    fixture.away_score = Some(away_score);
    fixture.played = true;
    fixture.confirmed = confirmed;

    Ok(fixture.clone())
}

/// Mark an already played match as official.
pub fn confirm_result(document: &mut LeagueDocument, match_id: &str) -> Result<Match, LeagueError> {
    let fixture = document
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or_else(|| LeagueError::MatchNotFound(match_id.to_string()))?;
    if !fixture.played {
        return Err(LeagueError::MatchNotPlayed(match_id.to_string()));
    }
    fixture.confirmed = true;
    Ok(fixture.clone())
}

fn team_index(document: &LeagueDocument, team_id: &str) -> Result<usize, LeagueError> {
    document
        .teams
        .iter()
        .position(|t| t.id == team_id)
        .ok_or_else(|| LeagueError::TeamNotFound(team_id.to_string()))
}

/// Two distinct mutable borrows into `teams`. Callers guarantee `a != b`.
fn pair_mut(teams: &mut [Team], a: usize, b: usize) -> (&mut Team, &mut Team) {
    if a < b {
        let (left, right) = teams.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = teams.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::goals_conserved;
    use chrono::Utc;

    fn fresh(id: &str) -> Team {
        Team::new(id, id.to_uppercase(), "owner", "A", Utc::now())
    }

    fn league() -> LeagueDocument {
        let home = fresh("home");
        let away = fresh("away");
        let mut doc = LeagueDocument::default();
        doc.matches.push(Match::scheduled("m1", &home, &away, "2026-02-01"));
        doc.matches.push(Match::scheduled("m2", &away, &home, "2026-02-08"));
        doc.teams = vec![home, away];
        doc
    }

    #[test]
    fn test_draw_two_all() {
        let mut home = fresh("h");
        let mut away = fresh("a");
        apply_result(&mut home, &mut away, 2, 2).unwrap();

        for team in [&home, &away] {
            assert_eq!(team.played, 1);
            assert_eq!(team.draws, 1);
            assert_eq!(team.wins + team.losses, 0);
            assert_eq!(team.goals_for, 2);
            assert_eq!(team.goals_against, 2);
            assert_eq!(team.goals_difference, 0);
            assert_eq!(team.points, 1);
            assert!(team.counters_consistent());
        }
    }

    #[test]
    fn test_home_win_three_one() {
        let mut home = fresh("h");
        let mut away = fresh("a");
        apply_result(&mut home, &mut away, 3, 1).unwrap();

        assert_eq!((home.wins, home.points, home.goals_difference), (1, 3, 2));
        assert_eq!((away.losses, away.points, away.goals_difference), (1, 0, -2));
        assert!(home.counters_consistent());
        assert!(away.counters_consistent());
    }

    #[test]
    fn test_record_result_updates_match_and_both_teams() {
        let mut doc = league();
        let recorded = record_result(&mut doc, "m1", 1, 0, true).unwrap();
        assert!(recorded.played);
        assert!(recorded.confirmed);
        assert_eq!(recorded.final_score(), Some((1, 0)));

        assert_eq!(doc.team("home").unwrap().points, 3);
        assert_eq!(doc.team("away").unwrap().losses, 1);
        assert!(goals_conserved(&doc));
    }

    #[test]
    fn test_reversed_fixture_borrows_correctly() {
        let mut doc = league();
        record_result(&mut doc, "m2", 4, 2, false).unwrap();
        assert_eq!(doc.team("away").unwrap().goals_for, 4);
        assert_eq!(doc.team("home").unwrap().goals_for, 2);
    }

    #[test]
    fn test_second_recording_is_rejected_without_double_counting() {
        let mut doc = league();
        record_result(&mut doc, "m1", 2, 1, false).unwrap();
        let before = doc.clone();

        let err = record_result(&mut doc, "m1", 5, 0, true).unwrap_err();
        assert_eq!(err, LeagueError::MatchAlreadyPlayed("m1".into()));
        assert_eq!(doc, before);
        assert_eq!(doc.team("home").unwrap().played, 1);
    }

    #[test]
    fn test_unknown_match_or_team() {
        let mut doc = league();
        assert_eq!(
            record_result(&mut doc, "nope", 0, 0, false).unwrap_err(),
            LeagueError::MatchNotFound("nope".into())
        );

        doc.teams.retain(|t| t.id != "away");
        let before = doc.clone();
        assert_eq!(
            record_result(&mut doc, "m1", 0, 0, false).unwrap_err(),
            LeagueError::TeamNotFound("away".into())
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_confirm_requires_played_match() {
        let mut doc = league();
        assert_eq!(
            confirm_result(&mut doc, "m1").unwrap_err(),
            LeagueError::MatchNotPlayed("m1".into())
        );
        record_result(&mut doc, "m1", 0, 0, false).unwrap();
        assert!(confirm_result(&mut doc, "m1").unwrap().confirmed);
        assert_eq!(doc.team("home").unwrap().played, 1);
    }

    #[test]
    fn test_score_above_maximum_is_rejected() {
        let mut doc = league();
        let before = doc.clone();

        let err = record_result(&mut doc, "m1", u32::MAX, 0, false).unwrap_err();
        assert_eq!(err, LeagueError::ScoreOutOfRange(u32::MAX));
        let err = record_result(&mut doc, "m1", 0, MAX_SCORE + 1, false).unwrap_err();
        assert_eq!(err, LeagueError::ScoreOutOfRange(MAX_SCORE + 1));
        assert_eq!(doc, before);

        let recorded = record_result(&mut doc, "m1", MAX_SCORE, 0, false).unwrap();
        assert_eq!(recorded.final_score(), Some((MAX_SCORE, 0)));
        assert!(goals_conserved(&doc));
    }

    #[test]
    fn test_counter_overflow_leaves_both_teams_untouched() {
        let mut home = fresh("h");
        let mut away = fresh("a");
        away.goals_against = u32::MAX - 1;
        let (home_before, away_before) = (home.clone(), away.clone());

        let err = apply_result(&mut home, &mut away, 2, 0).unwrap_err();
        assert_eq!(err, LeagueError::CounterOverflow("a".into()));
        assert_eq!(home, home_before);
        assert_eq!(away, away_before);
    }

    #[test]
    fn test_points_overflow_is_an_error() {
        let mut home = fresh("h");
        let mut away = fresh("a");
        home.wins = u32::MAX / POINTS_WIN;
        assert_eq!(
            apply_result(&mut home, &mut away, 1, 0).unwrap_err(),
            LeagueError::CounterOverflow("h".into())
        );
        assert_eq!(home.played, 0);
    }
}
