//! Foundation types for cairn.
//!
//! Every other cairn crate depends on `cairn-types`. It deliberately holds
//! nothing but the identifiers shared across the object store, the ref
//! store and the revision layer.
//!
//! # Key Types
//!
//! - [`ObjectId`]: 160-bit content digest naming a stored object
//! - [`ObjectKind`]: the four object kinds and their on-disk type tags

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectKind;
pub use object::ObjectId;
