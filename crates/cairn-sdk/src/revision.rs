//! Turning user-supplied names into digests.
//!
//! A name may be `HEAD`, a full or abbreviated hex digest, or a ref name
//! (looked up as given and under `refs/tags/`, `refs/heads/` and
//! `refs/remotes/`). Every way a name can match contributes a candidate;
//! exactly one distinct digest must remain.

use std::collections::HashSet;

use cairn_refs::RefStore;
use cairn_store::{Object, ObjectStore};
use cairn_types::object::{is_hex, HEX_LEN};
use cairn_types::{ObjectId, ObjectKind};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Shortest hex string treated as an abbreviated digest.
pub const MIN_ABBREV_LEN: usize = 4;

/// Ref prefixes tried, in order, for a bare name.
const REF_SEARCH_PATHS: [&str; 4] = ["", "refs/tags/", "refs/heads/", "refs/remotes/"];

/// Resolves revision names against an object store and a ref store.
pub struct RevisionResolver<'a> {
    objects: &'a dyn ObjectStore,
    refs: &'a dyn RefStore,
}

impl<'a> RevisionResolver<'a> {
    pub fn new(objects: &'a dyn ObjectStore, refs: &'a dyn RefStore) -> Self {
        Self { objects, refs }
    }

    /// Every distinct digest `name` could refer to, in discovery order.
    pub fn candidates(&self, name: &str) -> SdkResult<Vec<ObjectId>> {
        let name = name.trim();
        let mut found = Vec::new();
        if name.is_empty() {
            return Ok(found);
        }

        if name == "HEAD" {
            push_unique(&mut found, self.refs.resolve("HEAD")?);
            return Ok(found);
        }

        if (MIN_ABBREV_LEN..=HEX_LEN).contains(&name.len()) && is_hex(name) {
            if name.len() == HEX_LEN {
                push_unique(&mut found, ObjectId::from_hex(name).ok());
            } else {
                for id in self.objects.ids_with_prefix(name)? {
                    push_unique(&mut found, Some(id));
                }
            }
        }

        for prefix in REF_SEARCH_PATHS {
            let path = format!("{prefix}{name}");
            push_unique(&mut found, self.refs.resolve(&path)?);
        }

        debug!(%name, candidates = found.len(), "resolved revision candidates");
        Ok(found)
    }

    /// Resolve `name` to exactly one digest.
    ///
    /// With `kind` set, the result is coerced toward that kind: a tag
    /// resolves to the object it tags, and a commit resolves to its tree
    /// when a tree is wanted. With `follow` unset no coercion happens and a
    /// kind mismatch is an error.
    pub fn resolve(
        &self,
        name: &str,
        kind: Option<ObjectKind>,
        follow: bool,
    ) -> SdkResult<ObjectId> {
        let mut candidates = self.candidates(name)?;
        let id = match candidates.len() {
            0 => return Err(SdkError::UnknownRevision(name.to_string())),
            1 => candidates.remove(0),
            _ => {
                return Err(SdkError::AmbiguousRevision {
                    name: name.to_string(),
                    candidates,
                })
            }
        };

        let Some(expected) = kind else {
            return Ok(id);
        };
        let not_found = || SdkError::NoObjectOfKind {
            name: name.to_string(),
            kind: expected,
        };

        let mut current = id;
        let mut seen = HashSet::new();
        while seen.insert(current) {
            let object = self.objects.get(&current)?;
            if object.kind() == expected {
                return Ok(current);
            }
            if !follow {
                return Err(not_found());
            }
            current = match object {
                Object::Tag(tag) => tag.object()?,
                Object::Commit(commit) if expected == ObjectKind::Tree => commit.tree()?,
                _ => return Err(not_found()),
            };
        }
        Err(not_found())
    }
}

fn push_unique(found: &mut Vec<ObjectId>, id: Option<ObjectId>) {
    if let Some(id) = id {
        if !found.contains(&id) {
            found.push(id);
        }
    }
}
