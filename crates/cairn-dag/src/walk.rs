//! Depth-first ancestry walk.
//!
//! The walk keeps an explicit stack instead of recursing, so deep
//! histories cannot overflow the call stack. Order matches a recursive
//! emission: each edge is yielded just before its parent's own edges.

use std::collections::HashSet;

use cairn_store::ObjectStore;
use cairn_types::ObjectId;
use tracing::debug;

use crate::error::DagResult;

/// One ancestry link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub child: ObjectId,
    pub parent: ObjectId,
}

struct Frame {
    commit: ObjectId,
    parents: Vec<ObjectId>,
    next: usize,
}

/// Lazy iterator over the ancestry edges reachable from a commit.
///
/// A commit reached a second time (diamond merges, or a corrupt graph that
/// loops) is not expanded again, so the walk always terminates. The first
/// read failure is yielded as an error and ends the walk.
pub struct CommitWalker<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    stack: Vec<Frame>,
    pending: Option<ObjectId>,
    visited: HashSet<ObjectId>,
    failed: bool,
}

impl<'a, S: ObjectStore + ?Sized> CommitWalker<'a, S> {
    /// Start a walk at `start`, which must name a commit.
    pub fn new(store: &'a S, start: ObjectId) -> Self {
        Self {
            store,
            stack: Vec::new(),
            pending: Some(start),
            visited: HashSet::new(),
            failed: false,
        }
    }

    /// Commits expanded so far.
    pub fn visited(&self) -> &HashSet<ObjectId> {
        &self.visited
    }

    fn expand(&mut self, id: ObjectId) -> DagResult<()> {
        let commit = self.store.read_commit(&id)?;
        let parents = commit.parents()?;
        debug!(commit = %id, parents = parents.len(), "walking commit");
        self.stack.push(Frame {
            commit: id,
            parents,
            next: 0,
        });
        Ok(())
    }
}

impl<S: ObjectStore + ?Sized> Iterator for CommitWalker<'_, S> {
    type Item = DagResult<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(id) = self.pending.take() {
                if self.visited.insert(id) {
                    if let Err(err) = self.expand(id) {
                        self.failed = true;
                        return Some(Err(err));
                    }
                }
                continue;
            }

            let frame = self.stack.last_mut()?;
            if let Some(&parent) = frame.parents.get(frame.next) {
                frame.next += 1;
                self.pending = Some(parent);
                return Some(Ok(Edge {
                    child: frame.commit,
                    parent,
                }));
            }
            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DagError;
    use cairn_store::{Blob, Commit, InMemoryObjectStore, Object, StoreError, Tree};

    const WHO: &str = "Ada <ada@example.com> 1700000000 +0000";

    fn empty_tree(store: &InMemoryObjectStore) -> ObjectId {
        store
            .write(&Object::Tree(Tree::empty()))
            .unwrap()
    }

    fn commit(store: &InMemoryObjectStore, parents: &[ObjectId], msg: &str) -> ObjectId {
        let tree = empty_tree(store);
        store
            .write(&Object::Commit(Commit::new(tree, parents, WHO, WHO, msg)))
            .unwrap()
    }

    fn edges(store: &InMemoryObjectStore, start: ObjectId) -> Vec<(ObjectId, ObjectId)> {
        CommitWalker::new(store, start)
            .map(|e| e.map(|e| (e.child, e.parent)))
            .collect::<DagResult<_>>()
            .unwrap()
    }

    #[test]
    fn root_commit_has_no_edges() {
        let store = InMemoryObjectStore::new();
        let root = commit(&store, &[], "root\n");
        assert!(edges(&store, root).is_empty());
    }

    #[test]
    fn linear_history() {
        let store = InMemoryObjectStore::new();
        let a = commit(&store, &[], "a\n");
        let b = commit(&store, &[a], "b\n");
        let c = commit(&store, &[b], "c\n");
        assert_eq!(edges(&store, c), vec![(c, b), (b, a)]);
    }

    #[test]
    fn diamond_visits_shared_ancestor_once() {
        let store = InMemoryObjectStore::new();
        let base = commit(&store, &[], "base\n");
        let shared = commit(&store, &[base], "shared\n");
        let left = commit(&store, &[shared], "left\n");
        let right = commit(&store, &[shared], "right\n");
        let merge = commit(&store, &[left, right], "merge\n");

        let mut walker = CommitWalker::new(&store, merge);
        let got: Vec<_> = walker
            .by_ref()
            .map(|e| e.map(|e| (e.child, e.parent)))
            .collect::<DagResult<_>>()
            .unwrap();

        assert_eq!(
            got,
            vec![
                (merge, left),
                (left, shared),
                (shared, base),
                (merge, right),
                (right, shared),
            ]
        );
        assert_eq!(got.iter().filter(|(child, _)| *child == shared).count(), 1);
        assert_eq!(walker.visited().len(), 5);
    }

    #[test]
    fn cyclic_graph_terminates() {
        let store = InMemoryObjectStore::new();
        let tree = empty_tree(&store);
        let fake = ObjectId::from_hash([0xab; 20]);

        let x = store
            .write(&Object::Commit(Commit::new(tree, &[fake], WHO, WHO, "x\n")))
            .unwrap();
        let y = Commit::new(tree, &[x], WHO, WHO, "y\n");
        store.insert_unchecked(fake, y.to_stored_object());

        assert_eq!(edges(&store, x), vec![(x, fake), (fake, x)]);
    }

    #[test]
    fn missing_parent_yields_error_then_stops() {
        let store = InMemoryObjectStore::new();
        let ghost = ObjectId::from_hash([7; 20]);
        let tip = commit(&store, &[ghost], "orphan\n");

        let mut walker = CommitWalker::new(&store, tip);
        assert_eq!(
            walker.next().unwrap().unwrap(),
            Edge {
                child: tip,
                parent: ghost
            }
        );
        assert!(matches!(
            walker.next(),
            Some(Err(DagError::Store(StoreError::NotFound(id)))) if id == ghost
        ));
        assert!(walker.next().is_none());
    }

    #[test]
    fn start_must_be_a_commit() {
        let store = InMemoryObjectStore::new();
        let blob = store.write(&Object::Blob(Blob::new(b"hi\n".to_vec()))).unwrap();

        let mut walker = CommitWalker::new(&store, blob);
        assert!(matches!(
            walker.next(),
            Some(Err(DagError::Store(StoreError::UnexpectedKind { .. })))
        ));
    }
}
