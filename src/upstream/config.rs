//! Upstream connection configuration

use std::time::Duration;

use super::backoff::BackoffPolicy;

/// Configuration for the upstream connector
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// URL of the upstream stream (e.g. `http://10.0.0.5:81/stream`)
    pub url: String,

    /// Bound on a single connection attempt, from TCP connect through
    /// response headers; exceeding it counts as a connection failure
    pub connect_timeout: Duration,

    /// Reconnect delays
    pub backoff: BackoffPolicy,
}

impl UpstreamConfig {
    /// Create a config for the given upstream URL with default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            backoff: BackoffPolicy::default(),
        }
    }

    /// Set the connection attempt timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the backoff policy
    pub fn backoff(mut self, policy: BackoffPolicy) -> Self {
        self.backoff = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = UpstreamConfig::new("http://camera.local:81/stream");

        assert_eq!(config.url, "http://camera.local:81/stream");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.backoff, BackoffPolicy::default());
    }

    #[test]
    fn test_builder_chaining() {
        let config = UpstreamConfig::new("http://camera.local:81/stream")
            .connect_timeout(Duration::from_secs(5))
            .backoff(BackoffPolicy::new(
                Duration::from_millis(200),
                Duration::from_millis(400),
            ));

        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.backoff.after_end, Duration::from_millis(200));
        assert_eq!(config.backoff.after_failure, Duration::from_millis(400));
    }
}
