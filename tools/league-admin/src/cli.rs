//! Command-line surface.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

/// League Hub admin client
#[derive(Parser, Debug)]
#[command(name = "league-admin")]
#[command(about = "Manage a League Hub server from the command line")]
pub struct Args {
    /// Base URL of the league server
    #[arg(short, long, env = "LEAGUE_ENDPOINT", default_value = "http://127.0.0.1:3000")]
    pub endpoint: String,

    /// Shared admin secret
    #[arg(short, long, env = "ADMIN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Directory for the local snapshot and pending edit
    #[arg(long, env = "LEAGUE_CACHE_DIR", default_value = ".league-cache")]
    pub cache_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "15")]
    pub timeout: u64,

    /// Print raw JSON replies
    #[arg(long)]
    pub json: bool,

    /// Log verbosity (tracing filter)
    #[arg(long, env = "LEAGUE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the league document (falls back to the local snapshot)
    Pull {
        /// Also write the document to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the standings table
    Standings {
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Server-side document statistics
    Stats,
    /// Server health
    Health,
    /// Register a team
    AddTeam {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        group: Option<String>,
    },
    /// Remove a team that has no matches
    RemoveTeam {
        #[arg(long)]
        id: String,
    },
    /// Schedule a fixture
    ScheduleMatch {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
        /// Kickoff, e.g. 2026-06-01T18:00:00Z; the server's current time if omitted
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        stage: Option<String>,
    },
    /// Record a final score
    RecordResult {
        #[arg(long = "match")]
        match_id: String,
        #[arg(long)]
        home_score: u32,
        #[arg(long)]
        away_score: u32,
        /// Mark the result official at once
        #[arg(long)]
        confirmed: bool,
    },
    /// Mark a recorded result as official
    ConfirmResult {
        #[arg(long = "match")]
        match_id: String,
    },
    /// Publish a news item
    AddNews {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long)]
        pinned: bool,
    },
    /// Append an admin notification
    Notify {
        message: String,
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Mark every notification read
    MarkRead,
    /// Copy the document to a timestamped backup
    Backup,
    /// Write the cached snapshot to a file without contacting the server
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replace the whole document from a file, or retry the pending edit
    Import {
        /// Document to upload. Omit to retry the pending edit.
        file: Option<PathBuf>,
        /// Only write if the server is still at this version
        #[arg(long)]
        expect_version: Option<String>,
    },
    /// Show the unsaved edit, if any
    Pending,
    /// Reset the document to its empty state
    Clear {
        /// Required; clearing is not reversible except from a backup
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    /// Wire action and payload for single-purpose writes. `None` for
    /// commands handled some other way.
    pub fn write_action(&self) -> Option<(&'static str, Option<Value>)> {
        let action = match self {
            Command::AddTeam { name, owner, group } => (
                "register-team",
                Some(json!({ "name": name, "owner": owner, "group": group })),
            ),
            Command::RemoveTeam { id } => ("remove-team", Some(json!({ "teamId": id }))),
            Command::ScheduleMatch {
                home,
                away,
                date,
                stage,
            } => (
                "schedule-match",
                Some(json!({
                    "homeTeamId": home,
                    "awayTeamId": away,
                    "date": date,
                    "stage": stage,
                })),
            ),
            Command::RecordResult {
                match_id,
                home_score,
                away_score,
                confirmed,
            } => (
                "record-result",
                Some(json!({
                    "matchId": match_id,
                    "homeScore": home_score,
                    "awayScore": away_score,
                    "confirmed": confirmed,
                })),
            ),
            Command::ConfirmResult { match_id } => {
                ("confirm-result", Some(json!({ "matchId": match_id })))
            }
            Command::AddNews {
                title,
                content,
                pinned,
            } => (
                "add-news",
                Some(json!({ "title": title, "content": content, "pinned": pinned })),
            ),
            Command::Notify { message, kind } => (
                "add-notification",
                Some(json!({ "message": message, "type": kind })),
            ),
            Command::MarkRead => ("mark-notifications-read", None),
            Command::Backup => ("backup", None),
            Command::Clear { .. } => ("clear-data", None),
            _ => return None,
        };
        Some(action)
    }
}
