//! Upstream error types
//!
//! All of these are handled inside the connector's reconnect loop; none
//! of them is fatal to the relay. A clean end of stream is not an error
//! and is represented by a successful attempt.

use std::time::Duration;

/// Error type for a single upstream connection attempt
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// Could not reach the upstream (refused, unreachable, DNS)
    Connect(String),
    /// The attempt exceeded the configured connect timeout
    Timeout(Duration),
    /// The upstream answered with a non-success HTTP status
    Status(u16),
    /// The stream broke mid-read
    Stream(String),
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Connect(reason) => write!(f, "Connect failed: {}", reason),
            UpstreamError::Timeout(limit) => {
                write!(f, "Connect attempt exceeded {:?}", limit)
            }
            UpstreamError::Status(code) => write!(f, "Upstream returned HTTP {}", code),
            UpstreamError::Stream(reason) => write!(f, "Stream read failed: {}", reason),
        }
    }
}

impl std::error::Error for UpstreamError {}
