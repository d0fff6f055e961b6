//! Error types for worldgen_core

use thiserror::Error;

/// Errors raised by the structural scene graph helpers
///
/// Validation never produces these; it resolves malformed input locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No node exists at the given full path
    #[error("No node at path '{0}'")]
    PathNotFound(String),

    /// A sibling with the same id already exists under the target parent
    #[error("Duplicate id '{id}' under '{parent}'")]
    DuplicateId {
        /// Parent path (`"<root>"` for top-level insertion)
        parent: String,
        /// Offending node id
        id: String,
    },

    /// Node ids must be non-empty
    #[error("Node id must not be empty")]
    EmptyId,

    /// Node ids must not contain the path separator
    #[error("Node id '{0}' contains the path separator")]
    SeparatorInId(String),
}

/// Result type for worldgen_core operations
pub type Result<T> = std::result::Result<T, GraphError>;
