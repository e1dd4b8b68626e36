use cairn_crypto::CodecError;
use cairn_types::{ObjectId, ObjectKind};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The stored record does not hash to the digest it is filed under.
    #[error("hash mismatch for {id}: record hashes to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// The stored bytes could not be decompressed.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    /// The record or payload violates its encoding.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The record's type tag is not one of blob, tree, commit or tag.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// An object was found but is of the wrong kind for its use.
    #[error("object {id} is a {found}, expected {expected}")]
    UnexpectedKind {
        id: ObjectId,
        expected: ObjectKind,
        found: ObjectKind,
    },

    /// A digest prefix used for lookup is not valid hex.
    #[error("invalid digest prefix: {0:?}")]
    InvalidPrefix(String),

    /// Compression failed while writing a record.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedObject(reason.into())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
