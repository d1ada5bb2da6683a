//! Upstream connection handling
//!
//! Provides the connector side of the relay:
//! - Long-lived HTTP connection to the camera stream
//! - Chunk forwarding into the viewer registry
//! - Reconnect-forever lifecycle with a two-tier backoff policy

pub mod backoff;
pub mod config;
pub mod connector;
pub mod error;
pub mod state;

pub use backoff::BackoffPolicy;
pub use config::UpstreamConfig;
pub use connector::UpstreamConnector;
pub use error::UpstreamError;
pub use state::{UpstreamState, UpstreamStatus};
