//! Reference management for cairn.
//!
//! References are the human-readable entry points into the object graph,
//! stored as small text files under the repository directory:
//!
//! - a **direct** ref holds a 40-character digest (`<hex>\n`);
//! - a **symbolic** ref holds the path of another ref
//!   (`ref: refs/heads/main\n`), so `HEAD` can follow the current branch.
//!
//! Resolution follows symbolic chains up to [`MAX_SYMREF_DEPTH`] hops and
//! reports a [`RefError::ReferenceCycle`] beyond that.
//!
//! # Modules
//!
//! - [`error`]: Error types for ref operations
//! - [`types`]: [`RefTarget`] and the [`RefNode`] listing tree
//! - [`traits`]: The [`RefStore`] trait defining the storage interface
//! - [`names`]: Ref name validation
//! - [`fs`]: [`FsRefStore`], refs as files under the repository directory
//! - [`memory`]: In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::{validate_ref_name, validate_tag_name};
pub use traits::{RefStore, MAX_SYMREF_DEPTH};
pub use types::{flatten, RefNode, RefTarget, RefTree};
