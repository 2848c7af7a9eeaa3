//! Plain-text rendering for terminal output.

use lg_05_sync_cache::{Freshness, PendingEdit, StandingsView};
use shared_types::LeagueDocument;
use std::fmt::Write;

/// First line of every cached read, e.g. `[LIVE (version abc)]`.
pub fn banner(freshness: &Freshness) -> String {
    format!("[{freshness}]")
}

pub fn document_summary(document: &LeagueDocument) -> String {
    let unread = document
        .admin_notifications
        .iter()
        .filter(|n| !n.read)
        .count();
    let mut out = String::new();
    let _ = writeln!(out, "teams:         {}", document.teams.len());
    let _ = writeln!(out, "matches:       {}", document.matches.len());
    let _ = writeln!(out, "news:          {}", document.news.len());
    let _ = writeln!(
        out,
        "notifications: {} ({} unread)",
        document.admin_notifications.len(),
        unread
    );
    if let Some(updated) = document.last_updated {
        let _ = writeln!(out, "last updated:  {}", updated.to_rfc3339());
    }
    out
}

pub fn standings(view: &StandingsView) -> String {
    let mut out = String::new();
    if let Some(group) = &view.group {
        let _ = writeln!(out, "Group {group}");
    }
    if view.table.is_empty() {
        out.push_str("no teams registered\n");
        return out;
    }

    let width = view
        .table
        .rows
        .iter()
        .map(|row| row.team.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let _ = writeln!(
        out,
        "{:>3}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3}  zone",
        "#", "team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for row in &view.table.rows {
        let team = &row.team;
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>+4} {:>3}  {:?}",
            row.position,
            team.name,
            team.played,
            team.wins,
            team.draws,
            team.losses,
            team.goals_for,
            team.goals_against,
            team.goals_difference,
            team.points,
            row.zone,
        );
    }
    let summary = &view.summary;
    let _ = writeln!(
        out,
        "\n{} played, {} goals, {} awaiting confirmation, {} upcoming",
        summary.played_matches,
        summary.total_goals,
        summary.awaiting_confirmation,
        summary.upcoming_matches
    );
    if !view.goals_conserved {
        out.push_str("warning: goals scored and conceded do not balance\n");
    }
    out
}

pub fn pending(edit: &PendingEdit) -> String {
    let base = edit
        .base_version
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "unsaved edit from {} (based on version {base})\nreason: {}\nrun `league-admin import` to retry\n",
        edit.saved_at.to_rfc3339(),
        edit.reason
    )
}
