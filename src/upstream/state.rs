//! Upstream connection state
//!
//! Tracks the lifecycle of the single upstream connection and the
//! counters the status endpoint reports. The connector owns all writes;
//! everything else reads.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

/// Lifecycle state of the upstream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UpstreamState {
    /// Connector not started yet
    Idle = 0,
    /// Connection attempt in flight
    Connecting = 1,
    /// Connected, forwarding chunks
    Streaming = 2,
    /// Upstream closed the stream cleanly; reconnect pending
    Ended = 3,
    /// Connection attempt or read failed; reconnect pending
    Failed = 4,
}

impl UpstreamState {
    /// Stable lowercase name for logs and the status endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamState::Idle => "idle",
            UpstreamState::Connecting => "connecting",
            UpstreamState::Streaming => "streaming",
            UpstreamState::Ended => "ended",
            UpstreamState::Failed => "failed",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => UpstreamState::Connecting,
            2 => UpstreamState::Streaming,
            3 => UpstreamState::Ended,
            4 => UpstreamState::Failed,
            _ => UpstreamState::Idle,
        }
    }
}

impl std::fmt::Display for UpstreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared observability handle for the connector
///
/// Lock-free: the state lives in an `AtomicU8`, counters in `AtomicU64`s,
/// so the status endpoint never contends with the forwarding loop.
#[derive(Debug)]
pub struct UpstreamStatus {
    state: AtomicU8,
    reconnect_attempts: AtomicU64,
    chunks_forwarded: AtomicU64,
    bytes_forwarded: AtomicU64,
    started_at: Instant,
}

impl UpstreamStatus {
    /// Create a status handle in the `Idle` state
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(UpstreamState::Idle as u8),
            reconnect_attempts: AtomicU64::new(0),
            chunks_forwarded: AtomicU64::new(0),
            bytes_forwarded: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Current upstream state
    pub fn state(&self) -> UpstreamState {
        UpstreamState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Number of completed reconnect cycles
    pub fn reconnect_attempts(&self) -> u64 {
        self.reconnect_attempts.load(Ordering::Relaxed)
    }

    /// Chunks forwarded since startup, across all connections
    pub fn chunks_forwarded(&self) -> u64 {
        self.chunks_forwarded.load(Ordering::Relaxed)
    }

    /// Bytes forwarded since startup, across all connections
    pub fn bytes_forwarded(&self) -> u64 {
        self.bytes_forwarded.load(Ordering::Relaxed)
    }

    /// Time since the status handle was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub(crate) fn set_state(&self, next: UpstreamState) {
        let prev = UpstreamState::from_u8(self.state.swap(next as u8, Ordering::Relaxed));
        if prev != next {
            tracing::debug!(from = prev.as_str(), to = next.as_str(), "Upstream state");
        }
    }

    pub(crate) fn record_reconnect(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_chunk(&self, bytes: usize) {
        self.chunks_forwarded.fetch_add(1, Ordering::Relaxed);
        self.bytes_forwarded.fetch_add(bytes as u64, Ordering::Relaxed);
    }
}

impl Default for UpstreamStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let status = UpstreamStatus::new();

        assert_eq!(status.state(), UpstreamState::Idle);
        assert_eq!(status.reconnect_attempts(), 0);
        assert_eq!(status.chunks_forwarded(), 0);
        assert_eq!(status.bytes_forwarded(), 0);
    }

    #[test]
    fn test_state_transitions() {
        let status = UpstreamStatus::new();

        status.set_state(UpstreamState::Connecting);
        assert_eq!(status.state(), UpstreamState::Connecting);

        status.set_state(UpstreamState::Streaming);
        assert_eq!(status.state(), UpstreamState::Streaming);

        status.set_state(UpstreamState::Ended);
        assert_eq!(status.state(), UpstreamState::Ended);

        status.set_state(UpstreamState::Failed);
        assert_eq!(status.state(), UpstreamState::Failed);
    }

    #[test]
    fn test_counters() {
        let status = UpstreamStatus::new();

        status.record_chunk(100);
        status.record_chunk(50);
        status.record_reconnect();

        assert_eq!(status.chunks_forwarded(), 2);
        assert_eq!(status.bytes_forwarded(), 150);
        assert_eq!(status.reconnect_attempts(), 1);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(UpstreamState::Idle.as_str(), "idle");
        assert_eq!(UpstreamState::Connecting.as_str(), "connecting");
        assert_eq!(UpstreamState::Streaming.as_str(), "streaming");
        assert_eq!(UpstreamState::Ended.as_str(), "ended");
        assert_eq!(UpstreamState::Failed.as_str(), "failed");
    }

    #[test]
    fn test_state_roundtrip() {
        for state in [
            UpstreamState::Idle,
            UpstreamState::Connecting,
            UpstreamState::Streaming,
            UpstreamState::Ended,
            UpstreamState::Failed,
        ] {
            assert_eq!(UpstreamState::from_u8(state as u8), state);
        }
    }
}
