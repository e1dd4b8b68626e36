//! Error types for commit traversal.

use cairn_store::StoreError;

/// Errors that can occur while walking commit history.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// A commit on the walk could not be read or is not a commit.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
