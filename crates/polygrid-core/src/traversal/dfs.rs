use std::collections::HashSet;
use std::hash::Hash;

use super::{ParentMap, Traversal, Visitor, discover};
use crate::error::Error;

/// Iterative depth-first traversal over an explicit stack.
///
/// A node is marked visited when it is popped. Neighbours that are already
/// visited are not pushed again, but they still go through the parent
/// tie-break and the neighbour callback.
#[derive(Debug, Clone)]
pub struct Dfs<T> {
    parents_enabled: bool,
    stack: Vec<T>,
    visited: HashSet<T>,
    parents: ParentMap<T>,
    buf: Vec<T>,
}

impl<T: Clone + Eq + Hash> Dfs<T> {
    pub fn new() -> Self {
        Self {
            parents_enabled: true,
            stack: Vec::new(),
            visited: HashSet::new(),
            parents: ParentMap::new(),
            buf: Vec::new(),
        }
    }

    pub fn without_parents(mut self) -> Self {
        self.parents_enabled = false;
        self
    }

    pub fn visited(&self) -> &HashSet<T> {
        &self.visited
    }
}

impl<T: Clone + Eq + Hash> Default for Dfs<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> Traversal<T> for Dfs<T> {
    fn traverse<V: Visitor<T>>(&mut self, start: T, visitor: &mut V) -> Result<(), Error> {
        if !visitor.accept(&start) {
            return Err(Error::InvalidStart);
        }

        self.clear();
        self.stack.push(start.clone());
        let mut buf = std::mem::take(&mut self.buf);

        while let Some(current) = self.stack.pop() {
            // Pushed more than once before its first pop.
            if !self.visited.insert(current.clone()) {
                continue;
            }
            visitor.on_node_accepted(&current);

            buf.clear();
            visitor.neighbors(&current, &self.parents, &mut buf);
            for n in buf.drain(..) {
                if !visitor.accept(&n) {
                    continue;
                }
                discover(
                    &mut self.parents,
                    self.parents_enabled,
                    visitor,
                    &n,
                    &current,
                    &start,
                );
                if !self.visited.contains(&n) {
                    self.stack.push(n);
                }
            }
        }

        self.buf = buf;
        Ok(())
    }

    fn clear(&mut self) {
        self.stack.clear();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::tests::{Cell, grid};

    struct Counting<F> {
        inner: F,
        accepted: Vec<Cell>,
    }

    impl<F: FnMut(&Cell, &mut Vec<Cell>)> Visitor<Cell> for Counting<F> {
        fn neighbors(&mut self, node: &Cell, _: &ParentMap<Cell>, out: &mut Vec<Cell>) {
            (self.inner)(node, out)
        }
        fn on_node_accepted(&mut self, node: &Cell) {
            self.accepted.push(*node);
        }
    }

    #[test]
    fn visits_every_node_once() {
        let mut v = Counting {
            inner: grid(4, 4, true),
            accepted: Vec::new(),
        };
        let mut dfs = Dfs::new();
        dfs.traverse((1, 1), &mut v).unwrap();
        assert_eq!(v.accepted.len(), 16);
        assert_eq!(dfs.visited().len(), 16);
        assert_eq!(v.accepted[0], (1, 1));
    }

    #[test]
    fn goes_deep_first() {
        let mut v = Counting {
            inner: grid(5, 1, false),
            accepted: Vec::new(),
        };
        let mut dfs = Dfs::new();
        dfs.traverse((2, 0), &mut v).unwrap();
        // The right neighbour is pushed last, so it is explored first.
        assert_eq!(v.accepted, vec![(2, 0), (3, 0), (4, 0), (1, 0), (0, 0)]);
    }

    #[test]
    fn rediscovery_can_change_parent() {
        struct Latest<F>(F);
        impl<F: FnMut(&Cell, &mut Vec<Cell>)> Visitor<Cell> for Latest<F> {
            fn neighbors(&mut self, node: &Cell, _: &ParentMap<Cell>, out: &mut Vec<Cell>) {
                (self.0)(node, out)
            }
            fn choose_parent(&mut self, _: &Cell, new: &Cell, _: &Cell, _: &ParentMap<Cell>) -> Cell {
                *new
            }
        }
        let mut dfs = Dfs::new();
        let mut v = Latest(grid(3, 1, false));
        dfs.traverse((0, 0), &mut v).unwrap();
        // (1,0) is found from (0,0) and again from (2,0).
        assert_eq!(dfs.parents().get(&(1, 0)), Some(&(2, 0)));
        // The start node may end up with a parent too.
        assert_eq!(dfs.parents().get(&(0, 0)), Some(&(1, 0)));
    }

    #[test]
    fn rejected_start_errors() {
        let mut dfs = Dfs::new();
        struct Nothing;
        impl Visitor<Cell> for Nothing {
            fn neighbors(&mut self, _: &Cell, _: &ParentMap<Cell>, _: &mut Vec<Cell>) {}
            fn accept(&mut self, _: &Cell) -> bool {
                false
            }
        }
        assert_eq!(dfs.traverse((0, 0), &mut Nothing), Err(Error::InvalidStart));
    }
}
