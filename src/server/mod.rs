//! Viewer-facing HTTP server
//!
//! Serves two endpoints:
//! - `GET /relay-stream`: admits a viewer into the registry and streams
//!   every subsequent chunk as a `multipart/x-mixed-replace` body
//! - `GET /status`: JSON snapshot of relay health

pub mod config;
mod handlers;
pub mod listener;

pub use config::{ServerConfig, STREAM_BOUNDARY};
pub use listener::RelayServer;
