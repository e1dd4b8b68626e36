//! Core reference types.

use std::collections::BTreeMap;
use std::fmt;

use cairn_types::ObjectId;

use crate::error::{RefError, Result};

/// Prefix marking a symbolic ref's content.
pub const SYMBOLIC_PREFIX: &str = "ref: ";

/// What a reference points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefTarget {
    /// A digest.
    Direct(ObjectId),
    /// The path of another reference (e.g. `refs/heads/main`).
    Symbolic(String),
}

impl RefTarget {
    /// Parse the content of a ref file named `name`.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let line = content.trim_end_matches(['\n', '\r']);
        if let Some(target) = line.strip_prefix(SYMBOLIC_PREFIX) {
            return Ok(Self::Symbolic(target.trim().to_string()));
        }
        ObjectId::from_hex(line)
            .map(Self::Direct)
            .map_err(|_| RefError::MalformedRef {
                name: name.to_string(),
                content: content.to_string(),
            })
    }

    /// The on-disk content, including the trailing line feed.
    pub fn to_content(&self) -> String {
        format!("{self}\n")
    }

    /// Returns `true` if this is a symbolic ref.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(id) => write!(f, "{id}"),
            Self::Symbolic(target) => write!(f, "{SYMBOLIC_PREFIX}{target}"),
        }
    }
}

/// One node of a ref listing: either a resolved ref or a nested namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefNode {
    Target(ObjectId),
    Namespace(RefTree),
}

/// Ref listing mirroring the on-disk hierarchy, ordered by name.
pub type RefTree = BTreeMap<String, RefNode>;

/// Flatten a listing into `(path, digest)` pairs, joining names with `/`
/// under `prefix`.
pub fn flatten(tree: &RefTree, prefix: &str) -> Vec<(String, ObjectId)> {
    let mut out = Vec::new();
    let mut stack: Vec<(String, &RefTree)> = vec![(prefix.trim_end_matches('/').to_string(), tree)];

    // Children are pushed in reverse so the output stays in name order.
    while let Some((base, tree)) = stack.pop() {
        let mut namespaces = Vec::new();
        for (name, node) in tree {
            let path = if base.is_empty() {
                name.clone()
            } else {
                format!("{base}/{name}")
            };
            match node {
                RefNode::Target(id) => out.push((path, *id)),
                RefNode::Namespace(sub) => namespaces.push((path, sub)),
            }
        }
        stack.extend(namespaces.into_iter().rev());
    }

    out.sort_by(|(a, _), (b, _)| a.cmp(b));
    out
}

/// Insert `id` at a `/`-separated `path` inside `tree`.
pub(crate) fn insert_path(tree: &mut RefTree, path: &str, id: ObjectId) -> bool {
    let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let Some(leaf) = parts.pop() else {
        return false;
    };

    let mut current = tree;
    for part in parts {
        let node = current
            .entry(part.to_string())
            .or_insert_with(|| RefNode::Namespace(RefTree::new()));
        match node {
            RefNode::Namespace(sub) => current = sub,
            RefNode::Target(_) => return false,
        }
    }
    if current.contains_key(leaf) {
        return false;
    }
    current.insert(leaf.to_string(), RefNode::Target(id));
    true
}
