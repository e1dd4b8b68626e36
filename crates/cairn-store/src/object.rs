use cairn_crypto::{frame, ContentHasher};
use cairn_types::{ObjectId, ObjectKind};

use crate::commit::Commit;
use crate::error::{StoreError, StoreResult};
use crate::tag::Tag;
use crate::tree::Tree;

/// A stored object: kind tag + encoded payload + cached size.
///
/// `StoredObject` is the unit of storage. Backends never interpret the
/// payload; decoding into a typed [`Object`] happens above them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The encoded payload, without the record header.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and payload.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::hash_object(self.kind, &self.data)
    }

    /// The full record: `<tag> SP <length> NUL <payload>`.
    pub fn to_record(&self) -> Vec<u8> {
        frame(self.kind, &self.data)
    }

    /// Parse a full (decompressed) record.
    ///
    /// The declared length must equal the payload length, and the type tag
    /// must name one of the four object kinds.
    pub fn from_record(record: &[u8]) -> StoreResult<Self> {
        let space = record
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| StoreError::malformed("record has no type tag"))?;
        let nul = record[space..]
            .iter()
            .position(|&b| b == 0)
            .map(|i| i + space)
            .ok_or_else(|| StoreError::malformed("record header is not NUL-terminated"))?;

        let declared: usize = std::str::from_utf8(&record[space + 1..nul])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| StoreError::malformed("record length is not a decimal number"))?;
        let payload = &record[nul + 1..];
        if declared != payload.len() {
            return Err(StoreError::malformed(format!(
                "bad length: header says {declared}, payload has {}",
                payload.len()
            )));
        }

        let kind = ObjectKind::from_tag(&record[..space])
            .map_err(|_| StoreError::UnknownObjectType(String::from_utf8_lossy(&record[..space]).into_owned()))?;
        Ok(Self::new(kind, payload.to_vec()))
    }

    pub(crate) fn expect_kind(&self, expected: ObjectKind) -> StoreResult<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(StoreError::UnexpectedKind {
                id: self.compute_id(),
                expected,
                found: self.kind,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Blob)?;
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// A decoded object of any kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// The kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
            Self::Tag(_) => ObjectKind::Tag,
        }
    }

    /// Encode the payload with the kind-specific encoder.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Blob(blob) => blob.data.clone(),
            Self::Tree(tree) => tree.encode(),
            Self::Commit(commit) => commit.encode(),
            Self::Tag(tag) => tag.encode(),
        }
    }

    /// Decode a payload with the decoder matching `kind`.
    pub fn decode(kind: ObjectKind, payload: &[u8]) -> StoreResult<Self> {
        Ok(match kind {
            ObjectKind::Blob => Self::Blob(Blob::new(payload.to_vec())),
            ObjectKind::Tree => Self::Tree(Tree::decode(payload)?),
            ObjectKind::Commit => Self::Commit(Commit::decode(payload)?),
            ObjectKind::Tag => Self::Tag(Tag::decode(payload)?),
        })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(self.kind(), self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        Self::decode(obj.kind, &obj.data)
    }

    /// The digest this object is stored under.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::hash_object(self.kind(), &self.encode())
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}

impl From<Tag> for Object {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new(b"hello world".to_vec());
        let stored = blob.to_stored_object();
        let decoded = Blob::from_stored_object(&stored).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let stored = StoredObject::new(ObjectKind::Tree, Vec::new());
        let err = Blob::from_stored_object(&stored).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnexpectedKind {
                expected: ObjectKind::Blob,
                found: ObjectKind::Tree,
                ..
            }
        ));
    }

    #[test]
    fn record_roundtrip() {
        let stored = StoredObject::new(ObjectKind::Blob, b"hi\n".to_vec());
        let record = stored.to_record();
        assert_eq!(record, b"blob 3\0hi\n");
        assert_eq!(StoredObject::from_record(&record).unwrap(), stored);
    }

    #[test]
    fn length_mismatch_is_malformed() {
        for record in [&b"blob 4\0hi\n"[..], b"blob 2\0hi\n", b"blob x\0hi\n"] {
            let err = StoredObject::from_record(record).unwrap_err();
            assert!(matches!(err, StoreError::MalformedObject(_)), "{record:?}");
        }
    }

    #[test]
    fn missing_header_parts_are_malformed() {
        assert!(matches!(
            StoredObject::from_record(b"blob"),
            Err(StoreError::MalformedObject(_))
        ));
        assert!(matches!(
            StoredObject::from_record(b"blob 3"),
            Err(StoreError::MalformedObject(_))
        ));
    }

    #[test]
    fn unknown_type_tag() {
        let err = StoredObject::from_record(b"snapshot 0\0").unwrap_err();
        assert!(matches!(err, StoreError::UnknownObjectType(tag) if tag == "snapshot"));
    }

    #[test]
    fn stored_object_id_deterministic() {
        let obj = StoredObject::new(ObjectKind::Blob, b"deterministic".to_vec());
        assert_eq!(obj.compute_id(), obj.compute_id());
        assert_eq!(obj.size, 13);
    }

    #[test]
    fn object_id_matches_stored_id() {
        let object = Object::from(Blob::new(b"x\n".to_vec()));
        assert_eq!(object.compute_id(), object.to_stored_object().compute_id());
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let blob = StoredObject::new(ObjectKind::Blob, Vec::new());
        let tree = StoredObject::new(ObjectKind::Tree, Vec::new());
        assert_ne!(blob.compute_id(), tree.compute_id());
    }
}
