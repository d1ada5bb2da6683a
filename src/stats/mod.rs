//! Statistics for the relay status endpoint

pub mod metrics;

pub use metrics::{RelayStats, UpstreamSnapshot, ViewerSection, ViewerStats};
