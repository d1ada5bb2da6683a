//! Viewer registry implementation
//!
//! The central registry that manages all admitted viewers and replicates
//! upstream chunks to each of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{mpsc, RwLock};

use crate::stats::ViewerStats;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::sink::ViewerSink;

/// Central registry for all admitted viewers
///
/// Thread-safe via `RwLock`: admission and removal take the write lock,
/// broadcast and observability reads share the read lock. A viewer is
/// present in the map exactly while it is eligible to receive chunks.
pub struct ViewerRegistry {
    /// Map of viewer id to sink
    sinks: RwLock<HashMap<u64, Arc<ViewerSink>>>,

    /// Next viewer id to allocate; ids are never reused
    next_viewer_id: AtomicU64,

    /// Configuration
    config: RegistryConfig,
}

impl ViewerRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sinks: RwLock::new(HashMap::new()),
            next_viewer_id: AtomicU64::new(1),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Admit a new viewer
    ///
    /// Returns the viewer's id and the receiving half of its chunk queue.
    /// The viewer is eligible for every chunk broadcast after this call
    /// returns. Fails only when the optional `max_viewers` limit is set
    /// and reached.
    pub async fn admit(&self) -> Result<(u64, mpsc::Receiver<Bytes>), RegistryError> {
        let mut sinks = self.sinks.write().await;

        let limit = self.config.max_viewers;
        if limit > 0 && sinks.len() >= limit {
            return Err(RegistryError::AtCapacity { limit });
        }

        let id = self.next_viewer_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.config.sink_buffer_chunks);
        sinks.insert(id, Arc::new(ViewerSink::new(id, tx)));

        tracing::info!(viewer_id = id, viewers = sinks.len(), "Viewer admitted");

        Ok((id, rx))
    }

    /// Remove a viewer
    ///
    /// Idempotent: removing an unknown or already-removed id is a no-op.
    /// Dropping the sink closes the viewer's queue, which ends its
    /// response stream.
    pub async fn remove(&self, viewer_id: u64) {
        let mut sinks = self.sinks.write().await;

        if sinks.remove(&viewer_id).is_some() {
            tracing::info!(viewer_id, viewers = sinks.len(), "Viewer removed");
        }
    }

    /// Broadcast a chunk to every admitted viewer
    ///
    /// Iterates a stable snapshot of the membership taken when the call
    /// begins. Delivery is a non-blocking queue push per viewer; a viewer
    /// whose queue is full or whose receiving half is gone is evicted,
    /// and its failure is never propagated to the caller or to other
    /// viewers.
    pub async fn broadcast(&self, chunk: Bytes) {
        let snapshot: Vec<Arc<ViewerSink>> =
            { self.sinks.read().await.values().cloned().collect() };

        if snapshot.is_empty() {
            return;
        }

        let mut failed = Vec::new();
        for sink in &snapshot {
            if let Err(reason) = sink.deliver(chunk.clone()) {
                failed.push((sink.id, reason));
            }
        }

        for (viewer_id, reason) in failed {
            tracing::warn!(viewer_id, reason = %reason, "Evicting viewer after failed delivery");
            self.remove(viewer_id).await;
        }
    }

    /// Current number of admitted viewers
    pub async fn count(&self) -> usize {
        self.sinks.read().await.len()
    }

    /// Per-viewer delivery statistics, ordered by admission
    pub async fn viewer_stats(&self) -> Vec<ViewerStats> {
        let sinks = self.sinks.read().await;

        let mut stats: Vec<ViewerStats> = sinks
            .values()
            .map(|sink| ViewerStats {
                id: sink.id,
                connected_secs: sink.admitted_at.elapsed().as_secs(),
                chunks_delivered: sink.chunks_delivered(),
                bytes_delivered: sink.bytes_delivered(),
            })
            .collect();
        stats.sort_by_key(|s| s.id);

        stats
    }
}

impl Default for ViewerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    /// Drain everything currently queued for a viewer into one buffer
    fn drain(rx: &mut mpsc::Receiver<Bytes>) -> Vec<u8> {
        let mut received = Vec::new();
        while let Ok(chunk) = rx.try_recv() {
            received.extend_from_slice(&chunk);
        }
        received
    }

    #[tokio::test]
    async fn test_admit_and_count() {
        let registry = ViewerRegistry::new();
        assert_eq!(registry.count().await, 0);

        let (id_a, _rx_a) = assert_ok!(registry.admit().await);
        let (id_b, _rx_b) = assert_ok!(registry.admit().await);

        assert_ne!(id_a, id_b);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = ViewerRegistry::new();
        let (id, _rx) = registry.admit().await.unwrap();

        registry.remove(id).await;
        registry.remove(id).await;
        registry.remove(9999).await;

        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_preserves_order() {
        let registry = ViewerRegistry::new();
        let (_id, mut rx) = registry.admit().await.unwrap();

        registry.broadcast(Bytes::from_static(b"C1")).await;
        registry.broadcast(Bytes::from_static(b"C2")).await;
        registry.broadcast(Bytes::from_static(b"C3")).await;

        assert_eq!(drain(&mut rx), b"C1C2C3");
    }

    #[tokio::test]
    async fn test_admit_then_remove_receives_nothing() {
        let registry = ViewerRegistry::new();
        let (id, mut rx) = registry.admit().await.unwrap();

        registry.remove(id).await;
        registry.broadcast(Bytes::from_static(b"chunk")).await;

        // Queue is closed and empty
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_failed_viewer_does_not_block_others() {
        let registry = ViewerRegistry::new();
        let (_id_a, mut rx_a) = registry.admit().await.unwrap();
        let (id_b, rx_b) = registry.admit().await.unwrap();
        let (_id_c, mut rx_c) = registry.admit().await.unwrap();

        // B's receiving half goes away without an explicit remove
        drop(rx_b);

        registry.broadcast(Bytes::from_static(b"X")).await;

        assert_eq!(drain(&mut rx_a), b"X");
        assert_eq!(drain(&mut rx_c), b"X");

        // B was evicted during the broadcast
        assert_eq!(registry.count().await, 2);
        let ids: Vec<u64> = registry.viewer_stats().await.iter().map(|s| s.id).collect();
        assert!(!ids.contains(&id_b));
    }

    #[tokio::test]
    async fn test_removed_viewer_gets_no_further_chunks() {
        let registry = ViewerRegistry::new();
        let (_id_a, mut rx_a) = registry.admit().await.unwrap();
        let (id_b, mut rx_b) = registry.admit().await.unwrap();
        let (_id_c, mut rx_c) = registry.admit().await.unwrap();

        registry.broadcast(Bytes::from_static(b"X")).await;
        registry.remove(id_b).await;
        registry.broadcast(Bytes::from_static(b"Y")).await;

        assert_eq!(drain(&mut rx_a), b"XY");
        assert_eq!(drain(&mut rx_c), b"XY");
        assert_eq!(drain(&mut rx_b), b"X");
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_backlogged_viewer_is_evicted() {
        let config = RegistryConfig::default().sink_buffer_chunks(2);
        let registry = ViewerRegistry::with_config(config);

        let (_slow, _rx_slow) = registry.admit().await.unwrap();
        let (_fast, mut rx_fast) = registry.admit().await.unwrap();

        // The slow viewer never drains; its 2-chunk queue overflows on
        // the third broadcast
        registry.broadcast(Bytes::from_static(b"1")).await;
        registry.broadcast(Bytes::from_static(b"2")).await;
        registry.broadcast(Bytes::from_static(b"3")).await;

        assert_eq!(registry.count().await, 1);
        assert_eq!(drain(&mut rx_fast), b"123");
    }

    #[tokio::test]
    async fn test_admit_at_capacity() {
        let config = RegistryConfig::default().max_viewers(1);
        let registry = ViewerRegistry::with_config(config);

        let (id, _rx) = registry.admit().await.unwrap();
        let result = registry.admit().await;

        assert!(matches!(
            result,
            Err(RegistryError::AtCapacity { limit: 1 })
        ));

        // Capacity frees up after a removal
        registry.remove(id).await;
        assert!(registry.admit().await.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_with_no_viewers() {
        let registry = ViewerRegistry::new();

        // Must be a quiet no-op
        registry.broadcast(Bytes::from_static(b"chunk")).await;

        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_viewer_stats() {
        let registry = ViewerRegistry::new();
        let (id_a, _rx_a) = registry.admit().await.unwrap();
        let (id_b, _rx_b) = registry.admit().await.unwrap();

        registry.broadcast(Bytes::from_static(b"abcd")).await;

        let stats = registry.viewer_stats().await;
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].id, id_a);
        assert_eq!(stats[1].id, id_b);
        assert_eq!(stats[0].chunks_delivered, 1);
        assert_eq!(stats[0].bytes_delivered, 4);
    }
}
