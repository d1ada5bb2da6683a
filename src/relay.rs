//! Relay composition
//!
//! Owns all relay state (registry, upstream status, connector, server),
//! constructed once at startup and shared by reference, with no ambient
//! globals.

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{RegistryConfig, ViewerRegistry};
use crate::server::{RelayServer, ServerConfig};
use crate::upstream::{UpstreamConfig, UpstreamConnector, UpstreamStatus};

/// Configuration for a complete relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream connection settings
    pub upstream: UpstreamConfig,
    /// Viewer-facing server settings
    pub server: ServerConfig,
    /// Viewer registry settings
    pub registry: RegistryConfig,
}

impl RelayConfig {
    /// Relay the given upstream URL with default server and registry
    /// settings
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream: UpstreamConfig::new(upstream_url),
            server: ServerConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

/// A complete relay: one upstream connector fanning out to HTTP viewers
pub struct Relay {
    registry: Arc<ViewerRegistry>,
    status: Arc<UpstreamStatus>,
    connector: UpstreamConnector,
    server: RelayServer,
}

impl Relay {
    /// Build a relay from configuration
    pub fn new(config: RelayConfig) -> Result<Self> {
        let registry = Arc::new(ViewerRegistry::with_config(config.registry));
        let status = Arc::new(UpstreamStatus::new());
        let connector = UpstreamConnector::new(
            config.upstream,
            Arc::clone(&registry),
            Arc::clone(&status),
        )?;
        let server = RelayServer::new(config.server, Arc::clone(&registry), Arc::clone(&status));

        Ok(Self {
            registry,
            status,
            connector,
            server,
        })
    }

    /// Get a reference to the viewer registry
    pub fn registry(&self) -> &Arc<ViewerRegistry> {
        &self.registry
    }

    /// Get a reference to the upstream status handle
    pub fn upstream_status(&self) -> &Arc<UpstreamStatus> {
        &self.status
    }

    /// Run the connector and the server until the server stops
    pub async fn run(&self) -> Result<()> {
        tokio::select! {
            result = self.server.run() => result,
            _ = self.connector.run() => Ok(()),
        }
    }

    /// Run with graceful shutdown of the server
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::select! {
            result = self.server.run_until(shutdown) => result,
            _ = self.connector.run() => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_builds_and_shares_state() {
        let mut config = RelayConfig::new("http://127.0.0.1:9/stream");
        config.server = ServerConfig::default().bind("127.0.0.1:0".parse().unwrap());

        let relay = Relay::new(config).unwrap();

        assert_eq!(relay.registry().count().await, 0);
        assert_eq!(
            relay.upstream_status().state(),
            crate::upstream::UpstreamState::Idle
        );
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let mut config = RelayConfig::new("http://127.0.0.1:9/stream");
        config.server = ServerConfig::default().bind("127.0.0.1:0".parse().unwrap());

        let relay = Relay::new(config).unwrap();
        let result = relay.run_until(async {}).await;

        assert!(result.is_ok());
    }
}
