//! Upstream connector
//!
//! Keeps exactly one connection to the upstream camera alive, or in the
//! process of being re-established, at all times. Every chunk read from
//! the upstream body is forwarded to the viewer registry in arrival
//! order; clean ends and failures both lead back to a reconnect after
//! the configured backoff delay. There is no retry limit and no terminal
//! state.

use std::sync::Arc;

use futures::StreamExt;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::registry::ViewerRegistry;

use super::config::UpstreamConfig;
use super::error::UpstreamError;
use super::state::{UpstreamState, UpstreamStatus};

/// Connector for the single upstream stream
pub struct UpstreamConnector {
    config: UpstreamConfig,
    registry: Arc<ViewerRegistry>,
    status: Arc<UpstreamStatus>,
    client: reqwest::Client,
}

impl UpstreamConnector {
    /// Create a connector that feeds the given registry
    pub fn new(
        config: UpstreamConfig,
        registry: Arc<ViewerRegistry>,
        status: Arc<UpstreamStatus>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            config,
            registry,
            status,
            client,
        })
    }

    /// Get the connector configuration
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Get the shared status handle
    pub fn status(&self) -> &Arc<UpstreamStatus> {
        &self.status
    }

    /// Run the connect-and-stream loop forever
    ///
    /// Connection failures and mid-stream errors are logged and retried
    /// indefinitely; this future only completes if its task is cancelled.
    pub async fn run(&self) {
        loop {
            self.status.set_state(UpstreamState::Connecting);

            let finished = match self.stream_once().await {
                Ok(chunks) => {
                    tracing::info!(
                        url = %self.config.url,
                        chunks,
                        "Upstream stream ended, reconnecting"
                    );
                    UpstreamState::Ended
                }
                Err(e) => {
                    tracing::warn!(
                        url = %self.config.url,
                        error = %e,
                        "Upstream connection failed, retrying"
                    );
                    UpstreamState::Failed
                }
            };

            self.status.set_state(finished);
            tokio::time::sleep(self.config.backoff.delay_for(finished)).await;
            self.status.record_reconnect();
        }
    }

    /// One full connect-and-stream attempt
    ///
    /// Returns the number of chunks forwarded once the upstream ends the
    /// stream cleanly.
    pub(crate) async fn stream_once(&self) -> std::result::Result<u64, UpstreamError> {
        let request = self.client.get(self.config.url.as_str()).send();
        let response = match timeout(self.config.connect_timeout, request).await {
            Err(_) => return Err(UpstreamError::Timeout(self.config.connect_timeout)),
            Ok(Err(e)) if e.is_timeout() => {
                return Err(UpstreamError::Timeout(self.config.connect_timeout))
            }
            Ok(Err(e)) => return Err(UpstreamError::Connect(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(UpstreamError::Status(http_status.as_u16()));
        }

        self.status.set_state(UpstreamState::Streaming);
        tracing::info!(
            url = %self.config.url,
            status = http_status.as_u16(),
            "Connected to upstream"
        );

        let mut body = response.bytes_stream();
        let mut chunks: u64 = 0;
        while let Some(next) = body.next().await {
            let chunk = next.map_err(|e| UpstreamError::Stream(e.to_string()))?;
            self.status.record_chunk(chunk.len());
            chunks += 1;
            self.registry.broadcast(chunk).await;
        }

        Ok(chunks)
    }
}
