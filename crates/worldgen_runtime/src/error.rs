//! Session errors

use thiserror::Error;

/// Errors surfaced by a [`WorldGenSession`](crate::WorldGenSession)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The generate-world request did not produce a scene
    #[error("World generation failed ({status}): {message}")]
    Generation { status: u16, message: String },
}

impl SessionError {
    /// The message shown to the user
    pub fn message(&self) -> &str {
        match self {
            SessionError::Generation { message, .. } => message,
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
