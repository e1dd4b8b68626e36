//! Content-addressed object storage for cairn.
//!
//! Every object is an immutable record identified by the SHA-1 digest of
//! its framed bytes, laid out like git's `.git/objects/` directory.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content
//! - [`Tree`] -- ordered `(mode, name, digest)` entries
//! - [`Commit`] -- tree + parents + identity headers + message
//! - [`Tag`] -- annotated pointer at another object
//!
//! Commits and tags share the [`Kvlm`] header-and-message codec.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- zlib-compressed records sharded by digest prefix
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding

pub mod commit;
pub mod error;
pub mod kvlm;
pub mod loose;
pub mod memory;
pub mod object;
pub mod tag;
pub mod traits;
pub mod tree;

// Re-export primary types at crate root for ergonomic imports.
pub use commit::Commit;
pub use error::{StoreError, StoreResult};
pub use kvlm::Kvlm;
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Object, StoredObject};
pub use tag::Tag;
pub use traits::ObjectStore;
pub use tree::{EntryKind, EntryMode, Tree, TreeEntry};
