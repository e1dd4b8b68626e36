use cairn_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::kvlm::Kvlm;
use crate::object::StoredObject;

/// A commit: a `tree`, zero or more `parent`s, identity lines and a
/// message, all carried in a [`Kvlm`] so unknown headers survive a
/// round-trip untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    /// Build a commit with headers in the canonical order.
    pub fn new(
        tree: ObjectId,
        parents: &[ObjectId],
        author: &str,
        committer: &str,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.insert("tree", tree.to_hex());
        for parent in parents {
            kvlm.append("parent", parent.to_hex());
        }
        kvlm.insert("author", author);
        kvlm.insert("committer", committer);
        kvlm.set_message(message);
        Self { kvlm }
    }

    /// Wrap an already decoded header block, checking the `tree` and
    /// `parent` keys hold digests.
    pub fn from_kvlm(kvlm: Kvlm) -> StoreResult<Self> {
        let commit = Self { kvlm };
        commit.tree()?;
        commit.parents()?;
        Ok(commit)
    }

    /// The root tree of this commit.
    pub fn tree(&self) -> StoreResult<ObjectId> {
        let raw = self
            .kvlm
            .get_str("tree")
            .ok_or_else(|| StoreError::malformed("commit has no tree"))?;
        parse_id(raw, "tree")
    }

    /// Parent commits in header order. Empty for a root commit.
    pub fn parents(&self) -> StoreResult<Vec<ObjectId>> {
        self.kvlm
            .get_all("parent")
            .iter()
            .map(|raw| {
                let text = std::str::from_utf8(raw)
                    .map_err(|_| StoreError::malformed("parent is not UTF-8"))?;
                parse_id(text, "parent")
            })
            .collect()
    }

    /// Returns `true` if the commit has no `parent` key.
    pub fn is_root(&self) -> bool {
        !self.kvlm.contains_key("parent")
    }

    pub fn author(&self) -> Option<&str> {
        self.kvlm.get_str("author")
    }

    pub fn committer(&self) -> Option<&str> {
        self.kvlm.get_str("committer")
    }

    /// The commit message, lossily decoded.
    pub fn message(&self) -> String {
        String::from_utf8_lossy(self.kvlm.message()).into_owned()
    }

    /// Full header block, including keys this type has no accessor for.
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
        StoredObject::new(ObjectKind::Commit, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Commit)?;
        Self::decode(&obj.data)
    }
}

pub(crate) fn parse_id(raw: &str, key: &str) -> StoreResult<ObjectId> {
    ObjectId::from_hex(raw.trim())
        .map_err(|e| StoreError::malformed(format!("bad {key} digest {raw:?}: {e}")))
}
