//! Error types for scene generation

use thiserror::Error;

/// A generator failed to produce a scene
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The backend reported a failure
    #[error("{0}")]
    Backend(String),

    /// The backend answered with something that is not JSON
    #[error("Generator returned malformed output: {0}")]
    Malformed(String),
}

impl GenerateError {
    pub fn backend(message: impl Into<String>) -> Self {
        GenerateError::Backend(message.into())
    }
}

/// Result type for generation
pub type Result<T> = std::result::Result<T, GenerateError>;
