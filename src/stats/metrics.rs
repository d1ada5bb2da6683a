//! Relay statistics
//!
//! Point-in-time snapshots assembled from the viewer registry and the
//! connector's status handle, serialized as-is by the status endpoint.

use serde::Serialize;

use crate::registry::ViewerRegistry;
use crate::upstream::UpstreamStatus;

/// Snapshot of relay health
#[derive(Debug, Clone, Serialize)]
pub struct RelayStats {
    /// Seconds since the relay started
    pub uptime_secs: u64,
    /// Upstream connection snapshot
    pub upstream: UpstreamSnapshot,
    /// Viewer snapshot
    pub viewers: ViewerSection,
}

/// Upstream side of a stats snapshot
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamSnapshot {
    /// Current connection state
    pub state: String,
    /// Completed reconnect cycles
    pub reconnect_attempts: u64,
    /// Chunks forwarded since startup
    pub chunks_forwarded: u64,
    /// Bytes forwarded since startup
    pub bytes_forwarded: u64,
}

/// Viewer side of a stats snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ViewerSection {
    /// Number of admitted viewers
    pub count: usize,
    /// Per-viewer stats
    pub list: Vec<ViewerStats>,
}

/// Delivery statistics for one viewer
#[derive(Debug, Clone, Serialize)]
pub struct ViewerStats {
    /// Viewer id
    pub id: u64,
    /// Seconds since admission
    pub connected_secs: u64,
    /// Chunks queued for this viewer
    pub chunks_delivered: u64,
    /// Bytes queued for this viewer
    pub bytes_delivered: u64,
}

impl RelayStats {
    /// Snapshot current health from the registry and connector status
    pub async fn collect(registry: &ViewerRegistry, upstream: &UpstreamStatus) -> Self {
        let list = registry.viewer_stats().await;

        Self {
            uptime_secs: upstream.uptime().as_secs(),
            upstream: UpstreamSnapshot {
                state: upstream.state().as_str().to_string(),
                reconnect_attempts: upstream.reconnect_attempts(),
                chunks_forwarded: upstream.chunks_forwarded(),
                bytes_forwarded: upstream.bytes_forwarded(),
            },
            viewers: ViewerSection {
                count: list.len(),
                list,
            },
        }
    }
}
