//! Codec primitives for cairn.
//!
//! Provides the two pure transforms every stored object goes through:
//! digest computation over the framed record, and lossless zlib
//! compression of that record at rest.
//!
//! All operations wrap established libraries; there is no custom cryptography.

pub mod codec;
pub mod error;
pub mod hasher;

pub use codec::{compress, decompress};
pub use error::{CodecError, CodecResult};
pub use hasher::{frame, ContentHasher};
