//! Per-viewer sink state
//!
//! A `ViewerSink` is the registry's handle on one admitted viewer: the
//! sending half of the viewer's bounded chunk queue plus delivery
//! counters. The receiving half lives with the viewer's HTTP response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Why a delivery to a sink failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The sink's bounded queue overflowed (viewer not keeping up)
    Backlogged,
    /// The viewer's receiving half is gone
    Disconnected,
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Backlogged => write!(f, "queue overflow"),
            DeliveryError::Disconnected => write!(f, "viewer disconnected"),
        }
    }
}

/// One admitted viewer's write destination
#[derive(Debug)]
pub struct ViewerSink {
    /// Unique viewer id, assigned at admission and never reused
    pub id: u64,

    /// When the viewer was admitted
    pub admitted_at: Instant,

    /// Sending half of the viewer's chunk queue
    tx: mpsc::Sender<Bytes>,

    /// Chunks queued for this viewer
    chunks_delivered: AtomicU64,

    /// Bytes queued for this viewer
    bytes_delivered: AtomicU64,
}

impl ViewerSink {
    /// Create a sink around the sending half of a viewer's queue
    pub(super) fn new(id: u64, tx: mpsc::Sender<Bytes>) -> Self {
        Self {
            id,
            admitted_at: Instant::now(),
            tx,
            chunks_delivered: AtomicU64::new(0),
            bytes_delivered: AtomicU64::new(0),
        }
    }

    /// Queue one chunk for the viewer without blocking
    pub(super) fn deliver(&self, chunk: Bytes) -> Result<(), DeliveryError> {
        let len = chunk.len() as u64;
        match self.tx.try_send(chunk) {
            Ok(()) => {
                self.chunks_delivered.fetch_add(1, Ordering::Relaxed);
                self.bytes_delivered.fetch_add(len, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DeliveryError::Backlogged),
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Disconnected),
        }
    }

    /// Chunks queued for this viewer so far
    pub fn chunks_delivered(&self) -> u64 {
        self.chunks_delivered.load(Ordering::Relaxed)
    }

    /// Bytes queued for this viewer so far
    pub fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_updates_counters() {
        let (tx, mut rx) = mpsc::channel(4);
        let sink = ViewerSink::new(1, tx);

        sink.deliver(Bytes::from_static(b"abc")).unwrap();
        sink.deliver(Bytes::from_static(b"de")).unwrap();

        assert_eq!(sink.chunks_delivered(), 2);
        assert_eq!(sink.bytes_delivered(), 5);
        assert_eq!(rx.recv().await.unwrap(), Bytes::from_static(b"abc"));
    }

    #[tokio::test]
    async fn test_deliver_full_queue_is_backlogged() {
        let (tx, _rx) = mpsc::channel(1);
        let sink = ViewerSink::new(1, tx);

        sink.deliver(Bytes::from_static(b"first")).unwrap();
        let err = sink.deliver(Bytes::from_static(b"second")).unwrap_err();

        assert_eq!(err, DeliveryError::Backlogged);
        // Counters only reflect accepted chunks
        assert_eq!(sink.chunks_delivered(), 1);
    }

    #[tokio::test]
    async fn test_deliver_after_receiver_dropped_is_disconnected() {
        let (tx, rx) = mpsc::channel(4);
        let sink = ViewerSink::new(1, tx);
        drop(rx);

        let err = sink.deliver(Bytes::from_static(b"chunk")).unwrap_err();

        assert_eq!(err, DeliveryError::Disconnected);
    }
}
