//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference was not found.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// The ref name is invalid.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidRefName { name: String, reason: String },

    /// Symbolic indirection went deeper than the allowed bound.
    #[error("symbolic ref {name} exceeds {depth} levels of indirection")]
    ReferenceCycle { name: String, depth: usize },

    /// The ref file holds neither a digest nor a symbolic pointer.
    #[error("malformed ref {name}: {content:?}")]
    MalformedRef { name: String, content: String },

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
