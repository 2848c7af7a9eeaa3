//! # League Server
//!
//! Entry point for the league backend.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialise logging
//! 3. Build the document store and dispatcher (warn on missing credentials)
//! 4. Serve HTTP until Ctrl+C, then drain in-flight requests

use anyhow::{Context, Result};
use league_server::{build_gateway, init_logging, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config.log)?;

    info!("===========================================");
    info!("  League Server v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        store = ?config.store,
        data_path = %config.dispatcher.data_path,
        addr = %config.gateway.http_addr(),
        "configuration loaded"
    );

    let mut gateway = build_gateway(&config)?;
    let shutdown = gateway.shutdown_handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Dropping the sender would stop the server; keep serving.
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received, draining requests");
        let _ = shutdown.send(());
    });

    gateway.start().await.context("gateway stopped with an error")?;
    info!("league server stopped");
    Ok(())
}
