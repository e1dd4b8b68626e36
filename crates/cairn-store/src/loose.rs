//! Filesystem object store using the loose-object layout.
//!
//! Each record is zlib-compressed and written to
//! `<root>/<first two hex chars>/<remaining 38 hex chars>`. Shard
//! directories are created lazily on first write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cairn_crypto::{compress, decompress, ContentHasher};
use cairn_types::object::HEX_LEN;
use cairn_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::{normalize_prefix, ObjectStore};

/// Object store backed by a directory of compressed loose objects.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    root: PathBuf,
}

impl LooseObjectStore {
    /// Open a store rooted at `root` (usually `<gitdir>/objects`).
    ///
    /// The directory does not have to exist until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the record for `id` lives.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    fn shard_names(&self, prefix: &str) -> StoreResult<Vec<String>> {
        if prefix.len() >= 2 {
            return Ok(vec![prefix[..2].to_string()]);
        }
        let mut shards = Vec::new();
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(shards),
            Err(e) => return Err(e.into()),
        };
        for entry in dir {
            let name = entry?.file_name();
            if let Some(name) = name.to_str() {
                if name.len() == 2 && name.starts_with(prefix) && cairn_types::object::is_hex(name) {
                    shards.push(name.to_string());
                }
            }
        }
        Ok(shards)
    }
}

impl ObjectStore for LooseObjectStore {
    fn read_raw(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = decompress(&compressed).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: e.to_string(),
        })?;
        let computed = ContentHasher::digest(&record);
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }

        let object = StoredObject::from_record(&record)?;
        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "read object");
        Ok(Some(object))
    }

    fn write_raw(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let record = object.to_record();
        let id = ContentHasher::digest(&record);
        let path = self.object_path(&id);
        if path.exists() {
            debug!(id = %id.short_hex(), "object already present");
            return Ok(id);
        }

        let shard = path
            .parent()
            .ok_or_else(|| StoreError::Io(io::Error::other("object path has no shard directory")))?;
        fs::create_dir_all(shard)?;

        // Write-then-rename: a crash mid-write leaves only a temp file.
        let mut tmp = NamedTempFile::new_in(shard)?;
        tmp.write_all(&compress(&record)?)?;
        tmp.as_file().sync_all()?;
        if let Err(e) = tmp.persist(&path) {
            // A concurrent writer of the same record got there first.
            if !path.exists() {
                return Err(e.error.into());
            }
        }

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "wrote object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn ids_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let prefix = normalize_prefix(prefix)?;
        let mut ids = Vec::new();

        for shard in self.shard_names(&prefix)? {
            let dir = match fs::read_dir(self.root.join(&shard)) {
                Ok(dir) => dir,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            for entry in dir {
                let name = entry?.file_name();
                let Some(rest) = name.to_str() else { continue };
                if rest.len() != HEX_LEN - 2 || !cairn_types::object::is_hex(rest) {
                    continue;
                }
                let full = format!("{shard}{rest}");
                if full.starts_with(&prefix) {
                    if let Ok(id) = ObjectId::from_hex(&full) {
                        ids.push(id);
                    }
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}
