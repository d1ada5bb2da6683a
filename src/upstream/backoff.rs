//! Reconnect backoff policy
//!
//! Two-tier fixed delays: a short pause after the upstream ends a stream
//! cleanly (the camera usually comes straight back), a longer one after a
//! failure (the camera is likely down or unreachable).

use std::time::Duration;

use super::state::UpstreamState;

/// Delays applied before reconnecting to the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the upstream ends the stream cleanly
    pub after_end: Duration,

    /// Delay after a connect or read failure
    pub after_failure: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            after_end: Duration::from_secs(1),
            after_failure: Duration::from_secs(2),
        }
    }
}

impl BackoffPolicy {
    /// Create a policy with explicit delays
    pub fn new(after_end: Duration, after_failure: Duration) -> Self {
        Self {
            after_end,
            after_failure,
        }
    }

    /// Set the delay after a clean end of stream
    pub fn after_end(mut self, delay: Duration) -> Self {
        self.after_end = delay;
        self
    }

    /// Set the delay after a failure
    pub fn after_failure(mut self, delay: Duration) -> Self {
        self.after_failure = delay;
        self
    }

    /// Delay to apply given the state an attempt finished in
    pub fn delay_for(&self, state: UpstreamState) -> Duration {
        match state {
            UpstreamState::Ended => self.after_end,
            _ => self.after_failure,
        }
    }
}
