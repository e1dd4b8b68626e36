//! The [`RefStore`] trait defining the reference storage interface.
//!
//! Backends only implement raw reads, writes, and listing; resolution,
//! creation, and the nested listing tree are provided on top of those.

use cairn_types::ObjectId;
use tracing::warn;

use crate::error::{RefError, Result};
use crate::types::{insert_path, RefTarget, RefTree};

/// Maximum number of symbolic hops followed before giving up.
pub const MAX_SYMREF_DEPTH: usize = 5;

/// Storage backend for named references.
///
/// Names are full paths relative to the repository directory, e.g. `HEAD`,
/// `refs/heads/main`, or `refs/tags/v1`.
pub trait RefStore: Send + Sync {
    /// Read a ref without following symbolic indirection.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>>;

    /// Create or replace a ref. The update is atomic per ref.
    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()>;

    /// List every ref at or below `namespace` (e.g. `refs` or
    /// `refs/heads`), ordered by name, without following symbolic refs.
    fn list_refs(&self, namespace: &str) -> Result<Vec<(String, RefTarget)>>;

    /// Follow `name` to a digest.
    ///
    /// Returns `Ok(None)` if the ref, or any ref in its symbolic chain, does
    /// not exist. More than [`MAX_SYMREF_DEPTH`] symbolic hops is an error.
    fn resolve(&self, name: &str) -> Result<Option<ObjectId>> {
        let mut current = name.to_string();
        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read_ref(&current)? {
                None => return Ok(None),
                Some(RefTarget::Direct(id)) => return Ok(Some(id)),
                Some(RefTarget::Symbolic(next)) => current = next,
            }
        }
        Err(RefError::ReferenceCycle {
            name: name.to_string(),
            depth: MAX_SYMREF_DEPTH,
        })
    }

    /// Point `name` directly at `id`, replacing any previous content.
    fn create(&self, name: &str, id: &ObjectId) -> Result<()> {
        self.write_ref(name, &RefTarget::Direct(*id))
    }

    /// Point `name` at another ref.
    fn set_symbolic(&self, name: &str, target: &str) -> Result<()> {
        self.write_ref(name, &RefTarget::Symbolic(target.to_string()))
    }

    /// Resolve every ref under `namespace` into a nested tree keyed by the
    /// path relative to `namespace`.
    ///
    /// Refs that cannot be resolved (dangling or cyclic symbolic refs) are
    /// logged and left out.
    fn list(&self, namespace: &str) -> Result<RefTree> {
        let base = namespace.trim_end_matches('/');
        let mut tree = RefTree::new();

        for (name, _) in self.list_refs(base)? {
            let relative = name
                .strip_prefix(base)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(&name);

            let id = match self.resolve(&name) {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!(%name, "skipping dangling ref");
                    continue;
                }
                Err(err) => {
                    warn!(%name, error = %err, "skipping unresolvable ref");
                    continue;
                }
            };

            if !insert_path(&mut tree, relative, id) {
                warn!(%name, "skipping ref shadowed by a namespace");
            }
        }

        Ok(tree)
    }
}

/// Whether `name` lies at or below `namespace`, component-wise.
pub(crate) fn in_namespace(name: &str, namespace: &str) -> bool {
    namespace.is_empty()
        || name == namespace
        || name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
}
