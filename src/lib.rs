//! Single-upstream, multi-viewer MJPEG stream relay.
//!
//! The relay holds one long-lived HTTP connection to a live camera source
//! (e.g. an ESP32-CAM) and fans every received chunk of bytes out to any
//! number of concurrently connected HTTP viewers, each receiving the same
//! `multipart/x-mixed-replace` byte stream.
//!
//! # Architecture
//!
//! ```text
//!   [Camera]                 Arc<ViewerRegistry>
//!      │              ┌───────────────────────────┐
//!      ▼              │ sinks: HashMap<u64,       │
//! UpstreamConnector ──┤   ViewerSink {            │
//!   run() loop        │     tx: mpsc::Sender,     │
//!   (reconnects       │   }                       │
//!    forever)         │ >                         │
//!                     └────────────┬──────────────┘
//!                                  │ broadcast(chunk)
//!                 ┌────────────────┼────────────────┐
//!                 ▼                ▼                ▼
//!            [Viewer]         [Viewer]         [Viewer]
//!            GET /relay-stream, one task per response
//! ```
//!
//! Chunk payloads are `bytes::Bytes`, so fan-out clones are reference
//! counted rather than copied. Each viewer has a bounded chunk queue and a
//! dedicated response task draining it; a slow or dead viewer is evicted
//! without ever stalling the upstream read loop or other viewers.
//!
//! # Example
//!
//! ```no_run
//! use mjpeg_relay::{Relay, RelayConfig};
//!
//! # async fn example() -> mjpeg_relay::Result<()> {
//! let relay = Relay::new(RelayConfig::new("http://10.0.0.5:81/stream"))?;
//! relay.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod relay;
pub mod server;
pub mod stats;
pub mod upstream;

pub use error::{Error, Result};
pub use registry::{RegistryConfig, ViewerRegistry};
pub use relay::{Relay, RelayConfig};
pub use server::{RelayServer, ServerConfig};
pub use upstream::{
    BackoffPolicy, UpstreamConfig, UpstreamConnector, UpstreamState, UpstreamStatus,
};
