use cairn_types::{ObjectId, ObjectKind};

use crate::commit::parse_id;
use crate::error::{StoreError, StoreResult};
use crate::kvlm::Kvlm;
use crate::object::StoredObject;

/// An annotated tag: `object`, `type`, `tag` and `tagger` headers plus a
/// message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    /// Build a tag with headers in the canonical order.
    pub fn new(object: ObjectId, kind: ObjectKind, name: &str, tagger: &str, message: &str) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.insert("object", object.to_hex());
        kvlm.insert("type", kind.as_str());
        kvlm.insert("tag", name);
        kvlm.insert("tagger", tagger);
        kvlm.set_message(message);
        Self { kvlm }
    }

    /// Wrap a decoded header block, checking that all required keys exist.
    pub fn from_kvlm(kvlm: Kvlm) -> StoreResult<Self> {
        let tag = Self { kvlm };
        tag.object()?;
        tag.target_kind()?;
        for key in ["tag", "tagger"] {
            if !tag.kvlm.contains_key(key) {
                return Err(StoreError::malformed(format!("tag has no {key}")));
            }
        }
        Ok(tag)
    }

    /// The tagged object.
    pub fn object(&self) -> StoreResult<ObjectId> {
        let raw = self
            .kvlm
            .get_str("object")
            .ok_or_else(|| StoreError::malformed("tag has no object"))?;
        parse_id(raw, "object")
    }

    /// The kind the tagged object is declared to be.
    pub fn target_kind(&self) -> StoreResult<ObjectKind> {
        let raw = self
            .kvlm
            .get_str("type")
            .ok_or_else(|| StoreError::malformed("tag has no type"))?;
        raw.parse()
            .map_err(|_| StoreError::malformed(format!("tag type {raw:?} is not an object kind")))
    }

    /// The tag's own name.
    pub fn name(&self) -> Option<&str> {
        self.kvlm.get_str("tag")
    }

    pub fn tagger(&self) -> Option<&str> {
        self.kvlm.get_str("tagger")
    }

    pub fn message(&self) -> String {
        String::from_utf8_lossy(self.kvlm.message()).into_owned()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    pub fn encode(&self) -> Vec<u8> {
        self.kvlm.encode()
    }

    pub fn decode(raw: &[u8]) -> StoreResult<Self> {
        Self::from_kvlm(Kvlm::decode(raw)?)
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tag, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Tag)?;
        Self::decode(&obj.data)
    }
}
