use cairn_types::{ObjectId, ObjectKind};

use crate::commit::Commit;
use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, Object, StoredObject};
use crate::tag::Tag;
use crate::tree::Tree;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same record always produces the same ID.
/// - Writes are idempotent: writing a record that is already present is a
///   no-op that still returns its ID.
/// - A failed write leaves no partial record behind.
/// - Backends store records, never interpret them. Decoding into typed
///   objects happens in the provided methods.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read a record by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read_raw(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write a record and return its content-addressed ID.
    fn write_raw(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored IDs whose hex form starts with `prefix`, sorted.
    fn ids_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>>;

    /// Read and decode an object.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Object>> {
        self.read_raw(id)?
            .map(|stored| Object::from_stored_object(&stored))
            .transpose()
    }

    /// Read and decode an object that must exist.
    fn get(&self, id: &ObjectId) -> StoreResult<Object> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Encode an object and write it.
    fn write(&self, object: &Object) -> StoreResult<ObjectId> {
        self.write_raw(&object.to_stored_object())
    }

    /// The kind of a stored object, without decoding its payload.
    fn kind_of(&self, id: &ObjectId) -> StoreResult<ObjectKind> {
        self.read_raw(id)?
            .map(|stored| stored.kind)
            .ok_or(StoreError::NotFound(*id))
    }

    fn read_blob(&self, id: &ObjectId) -> StoreResult<Blob> {
        Blob::from_stored_object(&self.require(id)?)
    }

    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        Tree::from_stored_object(&self.require(id)?)
    }

    fn read_commit(&self, id: &ObjectId) -> StoreResult<Commit> {
        Commit::from_stored_object(&self.require(id)?)
    }

    fn read_tag(&self, id: &ObjectId) -> StoreResult<Tag> {
        Tag::from_stored_object(&self.require(id)?)
    }

    #[doc(hidden)]
    fn require(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read_raw(id)?.ok_or(StoreError::NotFound(*id))
    }
}

/// Validate and normalize a hex digest prefix for [`ObjectStore::ids_with_prefix`].
pub(crate) fn normalize_prefix(prefix: &str) -> StoreResult<String> {
    if !cairn_types::object::is_hex(prefix) || prefix.len() > cairn_types::object::HEX_LEN {
        return Err(StoreError::InvalidPrefix(prefix.to_string()));
    }
    Ok(prefix.to_ascii_lowercase())
}
