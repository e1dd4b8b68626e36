use std::borrow::Cow;
use std::fmt;

use cairn_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// What a tree entry's mode says about the entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
    /// Submodule commit (0o160000).
    Gitlink,
}

/// File mode of a tree entry.
///
/// The mode is kept together with the digit count it was written with, so
/// that `40000` and `040000` both re-encode exactly as they were read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryMode {
    bits: u32,
    width: u8,
}

impl EntryMode {
    pub const REGULAR: Self = Self { bits: 0o100644, width: 6 };
    pub const EXECUTABLE: Self = Self { bits: 0o100755, width: 6 };
    pub const SYMLINK: Self = Self { bits: 0o120000, width: 6 };
    pub const DIRECTORY: Self = Self { bits: 0o040000, width: 5 };
    pub const GITLINK: Self = Self { bits: 0o160000, width: 6 };

    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        self.bits
    }

    /// Parse the ASCII octal mode of an encoded entry (5 or 6 digits).
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        if !(raw.len() == 5 || raw.len() == 6) || !raw.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Err(StoreError::malformed(format!(
                "invalid tree entry mode {:?}",
                String::from_utf8_lossy(raw)
            )));
        }
        let bits = raw
            .iter()
            .fold(0u32, |acc, &b| acc * 8 + u32::from(b - b'0'));
        Ok(Self {
            bits,
            width: raw.len() as u8,
        })
    }

    /// Classify the entry, or `None` for a mode git never writes.
    pub fn kind(&self) -> Option<EntryKind> {
        match self.bits & 0o170000 {
            0o040000 => Some(EntryKind::Directory),
            0o120000 => Some(EntryKind::Symlink),
            0o160000 => Some(EntryKind::Gitlink),
            0o100000 if self.bits & 0o111 != 0 => Some(EntryKind::Executable),
            0o100000 => Some(EntryKind::Regular),
            _ => None,
        }
    }

    /// Returns `true` if the entry names a subtree.
    pub fn is_tree(&self) -> bool {
        self.kind() == Some(EntryKind::Directory)
    }

    /// The object kind an entry with this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self.kind() {
            Some(EntryKind::Directory) => ObjectKind::Tree,
            Some(EntryKind::Gitlink) => ObjectKind::Commit,
            _ => ObjectKind::Blob,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$o}", self.bits, width = usize::from(self.width))
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory, gitlink).
    pub mode: EntryMode,
    /// Entry name (a single path segment), kept as the raw bytes stored.
    pub name: Vec<u8>,
    /// Digest of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<Vec<u8>>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    /// The name for display, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Git orders trees as if directory names ended with `/`.
    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.name.clone();
        if self.mode.is_tree() {
            key.push(b'/');
        }
        key
    }
}

/// Directory listing object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    /// Entries in encoding order.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries.
    ///
    /// Entries are sorted into git order for deterministic hashing.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by_cached_key(TreeEntry::sort_key);
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name.as_bytes())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as repeated `mode SP name NUL <20 raw digest bytes>`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.to_string().as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.object_id.as_bytes());
        }
        out
    }

    /// Decode a tree payload, preserving entry order exactly.
    pub fn decode(raw: &[u8]) -> StoreResult<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < raw.len() {
            let space = find(raw, b' ', pos)
                .ok_or_else(|| StoreError::malformed(format!("tree entry at {pos} has no mode")))?;
            let mode = EntryMode::parse(&raw[pos..space])?;

            let nul = find(raw, 0, space + 1).ok_or_else(|| {
                StoreError::malformed(format!("tree entry at {pos} has an unterminated name"))
            })?;
            let name = &raw[space + 1..nul];

            let end = nul + 1 + cairn_types::object::DIGEST_LEN;
            let digest = raw.get(nul + 1..end).ok_or_else(|| {
                StoreError::malformed(format!(
                    "tree entry {:?} has a truncated digest",
                    String::from_utf8_lossy(name)
                ))
            })?;
            let object_id = ObjectId::from_slice(digest)
                .map_err(|e| StoreError::malformed(e.to_string()))?;

            entries.push(TreeEntry::new(mode, name, object_id));
            pos = end;
        }

        Ok(Self { entries })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tree, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Tree)?;
        Self::decode(&obj.data)
    }
}

fn find(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}
