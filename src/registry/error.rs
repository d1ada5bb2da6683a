//! Registry error types

/// Error type for registry operations
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// The configured viewer limit has been reached
    AtCapacity {
        /// The configured limit
        limit: usize,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AtCapacity { limit } => {
                write!(f, "Viewer limit reached ({})", limit)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
