//! Error types for character operations

use crate::store::CharacterId;
use thiserror::Error;

/// Character store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharacterError {
    /// No character with this id
    #[error("Character not found: {0:?}")]
    NotFound(CharacterId),

    /// Movement input for a character the user does not control
    #[error("Character is not controlled: {0:?}")]
    NotControlled(CharacterId),
}

/// Result type for character operations
pub type Result<T> = std::result::Result<T, CharacterError>;
