use std::collections::HashSet;
use std::hash::Hash;

use super::{ParentMap, Traversal, Visitor, discover};
use crate::error::Error;

/// Depth-first traversal that recurses on the call stack.
///
/// `depth` bounds the recursion: 1 accepts only the start node, `k` follows
/// paths of at most `k - 1` edges. The call stack grows with the depth, so
/// prefer [`Dfs`](super::Dfs) on large graphs.
#[derive(Debug, Clone)]
pub struct RecursiveDfs<T> {
    pub depth: i32,
    parents_enabled: bool,
    visited: HashSet<T>,
    parents: ParentMap<T>,
}

impl<T: Clone + Eq + Hash> RecursiveDfs<T> {
    pub fn new() -> Self {
        Self {
            depth: i32::MAX,
            parents_enabled: true,
            visited: HashSet::new(),
            parents: ParentMap::new(),
        }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn visited(&self) -> &HashSet<T> {
        &self.visited
    }

    fn descend<V: Visitor<T>>(&mut self, node: &T, start: &T, depth: i32, visitor: &mut V) {
        if !self.visited.insert(node.clone()) {
            return;
        }
        visitor.on_node_accepted(node);
        if depth < 2 {
            return;
        }

        let mut buf = Vec::new();
        visitor.neighbors(node, &self.parents, &mut buf);
        for n in buf {
            if !visitor.accept(&n) {
                continue;
            }
            discover(
                &mut self.parents,
                self.parents_enabled,
                visitor,
                &n,
                node,
                start,
            );
            self.descend(&n, start, depth - 1, visitor);
        }
    }
}

impl<T: Clone + Eq + Hash> Default for RecursiveDfs<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> Traversal<T> for RecursiveDfs<T> {
    fn traverse<V: Visitor<T>>(&mut self, start: T, visitor: &mut V) -> Result<(), Error> {
        if !visitor.accept(&start) {
            return Err(Error::InvalidStart);
        }
        self.clear();
        let depth = self.depth;
        self.descend(&start, &start, depth, visitor);
        Ok(())
    }

    fn clear(&mut self) {
        self.visited.clear();
        self.parents.clear();
    }

    fn parents(&self) -> &ParentMap<T> {
        &self.parents
    }

    fn set_parents_enabled(&mut self, enabled: bool) {
        self.parents_enabled = enabled;
    }
}
