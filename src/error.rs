//! Crate-level error types
//!
//! Only the fallible public surfaces are represented here: binding and
//! serving the viewer listener, and constructing the upstream HTTP client.
//! Upstream connection failures and per-viewer delivery failures are
//! handled inside the relay and never surface as fatal errors.

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// I/O error from the viewer-facing listener
    Io(std::io::Error),
    /// Failed to construct the upstream HTTP client
    Client(reqwest::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Client(e) => write!(f, "Failed to build HTTP client: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Client(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
