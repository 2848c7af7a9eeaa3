//! Gateway service: binds the HTTP listener and serves until shut down.

use crate::domain::config::{ConfigError, GatewayConfig};
use crate::middleware::GatewayMetrics;
use crate::router::build_router;
use axum::Router;
use lg_03_dispatcher::ActionHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Gateway startup and runtime errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// HTTP gateway in front of an [`ActionHandler`].
pub struct GatewayService {
    config: GatewayConfig,
    handler: Arc<dyn ActionHandler>,
    metrics: Arc<GatewayMetrics>,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl GatewayService {
    pub fn new(config: GatewayConfig, handler: Arc<dyn ActionHandler>) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            handler,
            metrics: Arc::new(GatewayMetrics::new()),
            shutdown_rx: None,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The router this service serves.
    pub fn router(&self) -> Router {
        build_router(
            Arc::clone(&self.handler),
            Arc::clone(&self.metrics),
            &self.config,
        )
    }

    /// Sender that stops the next [`start`](Self::start) or
    /// [`serve`](Self::serve). Without one the server runs until it fails.
    pub fn shutdown_handle(&mut self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.shutdown_rx = Some(rx);
        tx
    }

    /// Bind the configured address and serve.
    pub async fn start(&mut self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(&mut self, listener: TcpListener) -> Result<(), GatewayError> {
        let shutdown_rx = self.shutdown_rx.take();
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "Starting league gateway");

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                match shutdown_rx {
                    Some(rx) => {
                        let _ = rx.await;
                        info!("Received shutdown signal");
                    }
                    None => std::future::pending::<()>().await,
                }
            })
            .await;

        if let Err(e) = &result {
            error!(error = %e, "HTTP server error");
        }
        info!("League gateway stopped");
        Ok(result?)
    }
}
