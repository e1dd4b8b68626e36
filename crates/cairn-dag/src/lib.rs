//! Commit ancestry traversal for cairn.
//!
//! Commits link to their parents by digest, forming a DAG rooted at the
//! commits without a `parent` header. [`CommitWalker`] walks that graph
//! from a starting commit and yields one [`Edge`] per child/parent link,
//! visiting every commit at most once.

pub mod error;
pub mod walk;

pub use error::{DagError, DagResult};
pub use walk::{CommitWalker, Edge};
