//! # League Server
//!
//! Process wiring for the league backend:
//!
//! ```text
//! environment ──→ AppConfig
//!                    │
//!      GitHubContentStore / InMemoryDocumentStore
//!                    │
//!              ActionDispatcher (secret gate)
//!                    │
//!              GatewayService (HTTP, CORS, timeout)
//! ```
//!
//! Missing credentials degrade to `ServerMisconfigured` responses rather
//! than refusing to start, so `/health` can report what is wrong.

pub mod config;

pub use config::{AppConfig, AppConfigError, GitHubSettings, LogConfig, StoreKind};

use lg_01_document_store::{
    DocumentStore, GitHubContentStore, GitHubStoreConfig, InMemoryDocumentStore, StoreError,
};
use lg_03_dispatcher::ActionDispatcher;
use lg_04_api_gateway::{GatewayError, GatewayService};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("logging: {0}")]
    Logging(String),
}

/// Install the global tracing subscriber.
pub fn init_logging(log: &LogConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_new(&log.filter)
        .map_err(|e| StartupError::Logging(format!("bad filter '{}': {e}", log.filter)))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Pick the document store for `config`. `None` when GitHub mode lacks
/// a token or repository.
pub fn build_store(config: &AppConfig) -> Result<Option<Arc<dyn DocumentStore>>, StartupError> {
    match config.store {
        StoreKind::Memory => {
            warn!("using in-memory document store; data is lost on restart");
            Ok(Some(Arc::new(InMemoryDocumentStore::new())))
        }
        StoreKind::GitHub => {
            let Some(github) = &config.github else {
                warn!("GITHUB_TOKEN or GITHUB_REPO not set; store actions will fail");
                return Ok(None);
            };
            let mut store_config =
                GitHubStoreConfig::new(github.repository.clone(), github.token.clone());
            store_config.branch = github.branch.clone();
            store_config.api_url = github.api_url.clone();
            store_config.timeout = config.dispatcher.store_timeout;
            info!(
                repository = %github.repository,
                branch = %github.branch,
                "using GitHub document store"
            );
            Ok(Some(Arc::new(GitHubContentStore::new(store_config)?)))
        }
    }
}

pub fn build_dispatcher(config: &AppConfig) -> Result<ActionDispatcher, StartupError> {
    let store = build_store(config)?;
    if config.admin_secret.is_none() {
        warn!("ADMIN_SECRET not set; every action except health will be refused");
    }
    Ok(ActionDispatcher::new(
        store,
        config.admin_secret.clone(),
        config.dispatcher.clone(),
    ))
}

pub fn build_gateway(config: &AppConfig) -> Result<GatewayService, StartupError> {
    let dispatcher = build_dispatcher(config)?;
    Ok(GatewayService::new(
        config.gateway.clone(),
        Arc::new(dispatcher),
    )?)
}
