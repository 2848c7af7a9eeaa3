//! Command execution against a [`CachedLeagueClient`].

use crate::cli::Command;
use crate::render;
use anyhow::{bail, Context, Result};
use lg_05_sync_cache::{CachedLeagueClient, SyncError};
use serde_json::Value;
use shared_types::{LeagueDocument, VersionToken};
use std::io::Write;
use std::path::Path;

/// Run one command, writing human output (or raw JSON) to `out`.
pub async fn run(
    client: &CachedLeagueClient,
    command: &Command,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if let Some((action, data)) = command.write_action() {
        if let Command::Clear { yes: false } = command {
            bail!("refusing to clear the league without --yes");
        }
        let reply = client.write(action, data).await.map_err(describe)?;
        return write_reply(out, action, &reply, json);
    }

    match command {
        Command::Pull { output } => {
            let synced = client.pull().await.map_err(describe)?;
            writeln!(out, "{}", render::banner(&synced.freshness))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&synced.value)?)?;
            } else {
                write!(out, "{}", render::document_summary(&synced.value))?;
            }
            if let Some(path) = output {
                write_document(path, &synced.value)?;
                writeln!(out, "document written to {}", path.display())?;
            }
        }
        Command::Standings { group } => {
            let synced = client
                .standings(group.as_deref())
                .await
                .map_err(describe)?;
            writeln!(out, "{}", render::banner(&synced.freshness))?;
            write!(out, "{}", render::standings(&synced.value))?;
        }
        Command::Stats => {
            let reply = client.read("stats", None).await.map_err(describe)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&reply)?)?;
        }
        Command::Health => {
            let reply = client.health().await.map_err(describe)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&reply)?)?;
            } else {
                let status = reply.get("status").and_then(Value::as_str).unwrap_or("unknown");
                writeln!(out, "{}: {status}", client.endpoint())?;
                if let Some(detail) = reply.get("detail").and_then(Value::as_str) {
                    writeln!(out, "detail: {detail}")?;
                }
            }
        }
        Command::Export { output } => {
            let Some(snapshot) = client.cached().map_err(describe)? else {
                bail!("no local snapshot yet; run `league-admin pull` first");
            };
            write_document(output, &snapshot.document)?;
            let version = snapshot
                .version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".into());
            writeln!(
                out,
                "snapshot (version {version}, cached at {}) written to {}",
                snapshot.cached_at.to_rfc3339(),
                output.display()
            )?;
        }
        Command::Import {
            file,
            expect_version,
        } => {
            let expected = expect_version.clone().map(VersionToken::new);
            let version = match file {
                Some(path) => {
                    let document = read_document(path)?;
                    client.push(document, expected).await.map_err(describe)?
                }
                None => match client.retry_pending().await.map_err(describe)? {
                    Some(version) => version,
                    None => {
                        writeln!(out, "nothing pending")?;
                        return Ok(());
                    }
                },
            };
            writeln!(out, "document saved (version {version})")?;
        }
        Command::Pending => match client.pending().map_err(describe)? {
            Some(edit) => write!(out, "{}", render::pending(&edit))?,
            None => writeln!(out, "nothing pending")?,
        },
        other => bail!("unhandled command {other:?}"),
    }
    Ok(())
}

fn write_reply(out: &mut impl Write, action: &str, reply: &Value, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(reply)?)?;
        return Ok(());
    }
    let message = reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("done");
    match reply.get("version").and_then(Value::as_str) {
        Some(version) => writeln!(out, "{action}: {message} (version {version})")?,
        None => writeln!(out, "{action}: {message}")?,
    }
    Ok(())
}

/// Attach the user-facing hint that matters for each failure.
fn describe(err: SyncError) -> anyhow::Error {
    let hint = match &err {
        SyncError::WriteNotLanded { .. } => "the change did not land on the server",
        SyncError::NoSnapshot { .. } => "server unavailable and nothing cached locally",
        SyncError::Remote(_) => "the server refused the request",
        SyncError::Snapshot(_) => "local cache problem",
    };
    anyhow::Error::new(err).context(hint)
}

fn read_document(path: &Path) -> Result<LeagueDocument> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("{} is not a league document", path.display()))
}

fn write_document(path: &Path, document: &LeagueDocument) -> Result<()> {
    let raw = serde_json::to_vec_pretty(document)?;
    std::fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use lg_03_dispatcher::ActionRequest;
    use lg_05_sync_cache::{
        ClientError, LeagueRemote, MemorySnapshotStore, Snapshot, SnapshotStore,
    };
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    /// Remote that is either down or answers every action from a script.
    struct ScriptedRemote {
        online: bool,
        calls: Mutex<Vec<ActionRequest>>,
    }

    impl ScriptedRemote {
        fn new(online: bool) -> Arc<Self> {
            Arc::new(Self {
                online,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LeagueRemote for ScriptedRemote {
        async fn call(&self, request: ActionRequest) -> Result<Value, ClientError> {
            self.calls.lock().push(request.clone());
            if !self.online {
                return Err(ClientError::Timeout);
            }
            Ok(match request.action.as_str() {
                "get-data" => json!({"data": LeagueDocument::default(), "version": "v1"}),
                "update-data" => json!({"message": "Data updated successfully", "version": "v2"}),
                _ => json!({"message": "ok", "version": "v2"}),
            })
        }

        async fn health(&self) -> Result<Value, ClientError> {
            Ok(json!({"status": "ok"}))
        }

        fn endpoint(&self) -> String {
            "http://league.test".into()
        }
    }

    fn cached_snapshot() -> Snapshot {
        Snapshot {
            document: LeagueDocument::default(),
            version: Some(VersionToken::new("v0")),
            cached_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    async fn run_to_string(client: &CachedLeagueClient, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(client, &command, false, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_pull_live_and_stale_banners() {
        let store = Arc::new(MemorySnapshotStore::with_snapshot(cached_snapshot()));
        let live = CachedLeagueClient::new(ScriptedRemote::new(true), store.clone());
        let text = run_to_string(&live, Command::Pull { output: None }).await.unwrap();
        assert!(text.starts_with("[LIVE (version v1)]"));

        let offline = CachedLeagueClient::new(ScriptedRemote::new(false), store);
        let text = run_to_string(&offline, Command::Pull { output: None }).await.unwrap();
        assert!(text.starts_with("[STALE"));
    }

    #[tokio::test]
    async fn test_failed_write_reports_not_landed() {
        let client = CachedLeagueClient::new(
            ScriptedRemote::new(false),
            Arc::new(MemorySnapshotStore::new()),
        );
        let err = run_to_string(&client, Command::MarkRead).await.unwrap_err();
        assert!(format!("{err:#}").contains("did not land"));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let remote = ScriptedRemote::new(true);
        let client = CachedLeagueClient::new(remote.clone(), Arc::new(MemorySnapshotStore::new()));
        assert!(run_to_string(&client, Command::Clear { yes: false }).await.is_err());
        assert!(remote.calls.lock().is_empty());

        let text = run_to_string(&client, Command::Clear { yes: true }).await.unwrap();
        assert!(text.starts_with("clear-data"));
        assert_eq!(remote.calls.lock()[0].action, "clear-data");
    }

    #[tokio::test]
    async fn test_import_file_and_export_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("league.json");
        write_document(&file, &LeagueDocument::default()).unwrap();

        let store = Arc::new(MemorySnapshotStore::new());
        let remote = ScriptedRemote::new(true);
        let client = CachedLeagueClient::new(remote.clone(), store.clone());
        let text = run_to_string(
            &client,
            Command::Import {
                file: Some(file),
                expect_version: Some("v1".into()),
            },
        )
        .await
        .unwrap();
        assert!(text.contains("version v2"));
        assert_eq!(
            remote.calls.lock()[0].version,
            Some(VersionToken::new("v1"))
        );

        let exported = dir.path().join("export.json");
        run_to_string(&client, Command::Export { output: exported.clone() })
            .await
            .unwrap();
        assert_eq!(read_document(&exported).unwrap(), LeagueDocument::default());
        assert!(store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_import_without_pending_is_a_no_op() {
        let client = CachedLeagueClient::new(
            ScriptedRemote::new(true),
            Arc::new(MemorySnapshotStore::new()),
        );
        let text = run_to_string(
            &client,
            Command::Import {
                file: None,
                expect_version: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(text.trim(), "nothing pending");
    }

    #[tokio::test]
    async fn test_export_without_snapshot_fails() {
        let client = CachedLeagueClient::new(
            ScriptedRemote::new(true),
            Arc::new(MemorySnapshotStore::new()),
        );
        let dir = tempfile::tempdir().unwrap();
        let result = run_to_string(
            &client,
            Command::Export {
                output: dir.path().join("x.json"),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
