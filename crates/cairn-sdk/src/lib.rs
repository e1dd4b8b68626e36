//! High-level SDK for cairn repositories.
//!
//! [`Repository`] ties the loose object store, the ref store and the
//! repository config together and is the main entry point for tools
//! embedding cairn:
//!
//! - [`Repository::init`], [`Repository::open`], [`Repository::discover`]
//! - object reads and checked writes, `hash_object`, `ls_tree`
//! - revision resolution ([`RevisionResolver`]) with kind coercion
//! - history walks and tree checkout

pub mod checkout;
pub mod config;
pub mod error;
pub mod identity;
pub mod repository;
pub mod revision;

pub use checkout::checkout;
pub use config::{CoreConfig, RepoConfig, UserConfig};
pub use error::{SdkError, SdkResult};
pub use identity::identity_line;
pub use repository::{hash_payload, Repository};
pub use revision::RevisionResolver;

// Re-export key types
pub use cairn_dag::{CommitWalker, Edge};
pub use cairn_refs::{flatten, RefNode, RefTarget, RefTree};
pub use cairn_store::{Blob, Commit, EntryMode, Object, Tag, Tree, TreeEntry};
pub use cairn_types::{ObjectId, ObjectKind};
