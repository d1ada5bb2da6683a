//! Relay HTTP server
//!
//! Binds the viewer-facing listener and serves the stream and status
//! endpoints over the shared registry and upstream status.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::registry::ViewerRegistry;
use crate::upstream::UpstreamStatus;

use super::config::ServerConfig;
use super::handlers::{self, AppState};

/// Viewer-facing HTTP server
pub struct RelayServer {
    config: ServerConfig,
    registry: Arc<ViewerRegistry>,
    upstream: Arc<UpstreamStatus>,
}

impl RelayServer {
    /// Create a new server over the given registry and upstream status
    pub fn new(
        config: ServerConfig,
        registry: Arc<ViewerRegistry>,
        upstream: Arc<UpstreamStatus>,
    ) -> Self {
        Self {
            config,
            registry,
            upstream,
        }
    }

    /// Get a reference to the viewer registry
    pub fn registry(&self) -> &Arc<ViewerRegistry> {
        &self.registry
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    pub(crate) fn router(&self) -> Router {
        let state = AppState {
            registry: Arc::clone(&self.registry),
            upstream: Arc::clone(&self.upstream),
            config: self.config.clone(),
        };

        Router::new()
            .route("/relay-stream", get(handlers::relay_stream))
            .route("/status", get(handlers::status))
            .with_state(state)
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Relay server listening");

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Relay server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
