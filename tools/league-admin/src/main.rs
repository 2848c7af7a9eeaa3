//! League Admin: command-line client for the league server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use league_admin::{commands, Args};
use lg_05_sync_cache::{CachedLeagueClient, FileSnapshotStore, HttpClientConfig, HttpLeagueClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut http = HttpClientConfig::new(&args.endpoint);
    http.timeout = Duration::from_secs(args.timeout);
    if let Some(secret) = &args.secret {
        http = http.with_secret(secret);
    }
    let remote = HttpLeagueClient::new(http).context("failed to create HTTP client")?;
    let snapshots = FileSnapshotStore::new(&args.cache_dir)
        .with_context(|| format!("cache directory {}", args.cache_dir.display()))?;
    let client = CachedLeagueClient::new(Arc::new(remote), Arc::new(snapshots));
    tracing::debug!(
        endpoint = %client.endpoint(),
        cache_dir = %args.cache_dir.display(),
        command = ?args.command,
        "running command"
    );

    let mut stdout = std::io::stdout().lock();
    commands::run(&client, &args.command, args.json, &mut stdout).await
}
