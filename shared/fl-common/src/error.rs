//! Shared Error Types

use thiserror::Error;

/// Errors for shared type parsing and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Role string not in the fixed role set.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Access level string not in the fixed level set.
    #[error("Unknown access level: {0}")]
    UnknownAccessLevel(String),
}

/// Result alias for shared type operations.
pub type Result<T> = std::result::Result<T, Error>;
