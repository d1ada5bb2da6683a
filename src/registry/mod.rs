//! Viewer registry for broadcast fan-out
//!
//! The registry owns the set of currently admitted viewers and replicates
//! every chunk received from the upstream connector to each of them.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<ViewerRegistry>
//!                   ┌──────────────────────────┐
//!                   │ sinks: HashMap<u64,      │
//!                   │   Arc<ViewerSink {       │
//!                   │     tx: mpsc::Sender,    │
//!                   │   }>                     │
//!                   │ >                        │
//!                   └────────────┬─────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        │                       │                       │
//!        ▼                       ▼                       ▼
//!   [Connector]             [Viewer]                [Viewer]
//!   broadcast(chunk)        rx.recv()               rx.recv()
//!        │                       │                       │
//!        └──► try_send per sink ─┴──► response body ──► TCP
//! ```
//!
//! Each viewer has its own bounded `mpsc` queue. `broadcast` iterates a
//! stable snapshot of the membership and queues the chunk with a
//! non-blocking `try_send`; the viewer's own response task drains the
//! queue onto the socket. A full queue or a dropped receiver evicts that
//! one viewer and never delays any other.
//!
//! # Zero-Copy Design
//!
//! Chunks are `bytes::Bytes`, so every queued clone shares one
//! reference-counted allocation; fan-out never copies payload bytes.

pub mod config;
pub mod error;
pub mod sink;
pub mod store;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use sink::{DeliveryError, ViewerSink};
pub use store::ViewerRegistry;
