//! In-memory reference store for testing and ephemeral use.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::names::validate_ref_name;
use crate::traits::{in_namespace, RefStore};
use crate::types::RefTarget;

/// An in-memory implementation of [`RefStore`].
///
/// Refs live in a `BTreeMap` behind a `RwLock`, so listings come out in
/// name order. Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, RefTarget>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of refs stored, symbolic ones included.
    pub fn len(&self) -> usize {
        self.refs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no refs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>> {
        Ok(self.refs.read().expect("lock poisoned").get(name).cloned())
    }

    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()> {
        validate_ref_name(name)?;
        self.refs
            .write()
            .expect("lock poisoned")
            .insert(name.to_string(), target.clone());
        Ok(())
    }

    fn list_refs(&self, namespace: &str) -> Result<Vec<(String, RefTarget)>> {
        let namespace = namespace.trim_end_matches('/');
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs
            .iter()
            .filter(|(name, _)| in_namespace(name, namespace))
            .map(|(name, target)| (name.clone(), target.clone()))
            .collect())
    }
}
