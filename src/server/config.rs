//! Relay server configuration

use std::net::SocketAddr;

/// Boundary token advertised to viewers
///
/// Matches the token the ESP32-CAM firmware emits in-band, so the
/// relayed bytes parse under the advertised framing without rewriting.
pub const STREAM_BOUNDARY: &str = "123456789000000000000987654321";

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Content type sent on the stream endpoint
    ///
    /// Override when relaying a camera that uses a different boundary
    /// token.
    pub content_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3001".parse().unwrap(),
            content_type: format!("multipart/x-mixed-replace; boundary={}", STREAM_BOUNDARY),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the content type sent on the stream endpoint
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}
