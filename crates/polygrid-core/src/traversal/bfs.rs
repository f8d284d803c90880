use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use super::{ParentMap, Traversal, Visitor, discover};
use crate::error::Error;

/// Breadth-first traversal with optional layer limit.
///
/// `max_depth` counts layers: values below 1 traverse everything, 1 visits
/// only the start node, `k` visits the start node and its first `k - 1`
/// neighbour layers.
#[derive(Debug, Clone)]
pub struct Bfs<T> {
    pub max_depth: i32,
    parents_enabled: bool,
    queue: VecDeque<T>,
    visited: HashSet<T>,
    parents: ParentMap<T>,
    buf: Vec<T>,
}

impl<T: Clone + Eq + Hash> Bfs<T> {
    /// Unbounded traversal with parent tracking.
    pub fn new() -> Self {
        Self {
            max_depth: -1,
            parents_enabled: true,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            parents: ParentMap::new(),
            buf: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: i32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn without_parents(mut self) -> Self {
        self.parents_enabled = false;
        self
    }

    /// Nodes accepted by the last run.
    pub fn visited(&self) -> &HashSet<T> {
        &self.visited
    }
}

impl<T: Clone + Eq + Hash> Default for Bfs<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> Traversal<T> for Bfs<T> {
    fn traverse<V: Visitor<T>>(&mut self, start: T, visitor: &mut V) -> Result<(), Error> {
        if !visitor.accept(&start) {
            return Err(Error::InvalidStart);
        }

        self.clear();
        self.visited.insert(start.clone());
        self.queue.push_back(start.clone());

        // Layers left to expand; negative means unbounded.
        let mut depth = self.max_depth.saturating_sub(1);
        let mut layer_left = 1usize;
        let mut next_layer = 0usize;
        let mut buf = std::mem::take(&mut self.buf);

        while let Some(current) = self.queue.pop_front() {
            visitor.on_node_accepted(&current);

            if depth != 0 {
                buf.clear();
                visitor.neighbors(&current, &self.parents, &mut buf);
                for n in buf.drain(..) {
                    if n == start || !visitor.accept(&n) {
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
                    if self.visited.insert(n.clone()) {
                        self.queue.push_back(n);
                        next_layer += 1;
                    }
                }
            }

            if depth > 0 {
                layer_left -= 1;
                if layer_left == 0 {
                    depth -= 1;
                    layer_left = next_layer;
                    next_layer = 0;
                }
            }
        }

        self.buf = buf;
        Ok(())
    }

    fn clear(&mut self) {
        self.queue.clear();
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
    use crate::traversal::UNREACHABLE;

    fn accepted(bfs: &mut Bfs<Cell>, start: Cell, w: i32, h: i32, diagonal: bool) -> Vec<Cell> {
        let mut v = grid(w, h, diagonal);
        bfs.traverse(start, &mut v).unwrap();
        let mut out: Vec<Cell> = bfs.visited().iter().copied().collect();
        out.sort();
        out
    }

    #[test]
    fn depth_one_is_start_only() {
        let mut bfs = Bfs::new().with_max_depth(1);
        assert_eq!(accepted(&mut bfs, (2, 2), 5, 5, true), vec![(2, 2)]);
    }

    #[test]
    fn depth_two_is_first_ring() {
        let mut bfs = Bfs::new().with_max_depth(2);
        let four = accepted(&mut bfs, (2, 2), 5, 5, false);
        assert_eq!(four, vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]);
        let eight = accepted(&mut bfs, (2, 2), 5, 5, true);
        assert_eq!(eight.len(), 9);
    }

    #[test]
    fn depth_k_matches_hop_count() {
        for k in 1..6 {
            let mut bfs = Bfs::new().with_max_depth(k);
            let got = accepted(&mut bfs, (0, 0), 7, 7, false);
            let mut want: Vec<Cell> = (0..7)
                .flat_map(|y| (0..7).map(move |x| (x, y)))
                .filter(|&(x, y)| x + y <= k - 1)
                .collect();
            want.sort();
            assert_eq!(got, want, "max_depth {k}");
        }
    }

    #[test]
    fn unbounded_reaches_everything() {
        let mut bfs = Bfs::new().with_max_depth(0);
        assert_eq!(accepted(&mut bfs, (0, 0), 5, 5, false).len(), 25);
        bfs.max_depth = -3;
        assert_eq!(accepted(&mut bfs, (4, 4), 5, 5, true).len(), 25);
    }

    #[test]
    fn callbacks_fire_in_layers() {
        struct Recorder {
            inner: Box<dyn FnMut(&Cell, &mut Vec<Cell>)>,
            accepted: Vec<Cell>,
            found: usize,
        }
        impl Visitor<Cell> for Recorder {
            fn neighbors(&mut self, node: &Cell, _: &ParentMap<Cell>, out: &mut Vec<Cell>) {
                (self.inner)(node, out)
            }
            fn on_neighbor_found(&mut self, _: &Cell, _: &ParentMap<Cell>) {
                self.found += 1;
            }
            fn on_node_accepted(&mut self, node: &Cell) {
                self.accepted.push(*node);
            }
        }

        let mut rec = Recorder {
            inner: Box::new(grid(3, 1, false)),
            accepted: Vec::new(),
            found: 0,
        };
        let mut bfs = Bfs::new();
        bfs.traverse((0, 0), &mut rec).unwrap();
        assert_eq!(rec.accepted, vec![(0, 0), (1, 0), (2, 0)]);
        // (0,0)->(1,0), (1,0)->(2,0); the edge back to the start is skipped
        // and (2,0)->(1,0) is a rediscovery.
        assert_eq!(rec.found, 3);
    }

    #[test]
    fn rejected_start_errors() {
        struct Walls;
        impl Visitor<Cell> for Walls {
            fn neighbors(&mut self, _: &Cell, _: &ParentMap<Cell>, _: &mut Vec<Cell>) {}
            fn accept(&mut self, node: &Cell) -> bool {
                node.0 != 0
            }
        }
        let mut bfs = Bfs::new();
        assert_eq!(bfs.traverse((0, 3), &mut Walls), Err(Error::InvalidStart));
        assert!(bfs.traverse((1, 3), &mut Walls).is_ok());
    }

    #[test]
    fn parents_form_a_bfs_tree() {
        let mut bfs = Bfs::new();
        let mut v = grid(5, 5, false);
        bfs.traverse((0, 0), &mut v).unwrap();
        let parents = bfs.parents();
        assert!(!parents.contains(&(0, 0)));
        assert_eq!(parents.len(), 24);
        assert_eq!(parents.distance(&(4, 4), &(0, 0), |_, _| 1), 8);
        assert_eq!(parents.distance(&(4, 4), &(9, 9), |_, _| 1), UNREACHABLE);
    }

    #[test]
    fn disabled_parents_stay_empty_and_runs_do_not_leak() {
        let mut bfs = Bfs::new().without_parents();
        let mut v = grid(4, 4, true);
        bfs.traverse((0, 0), &mut v).unwrap();
        assert!(bfs.parents().is_empty());
        bfs.set_parents_enabled(true);
        bfs.max_depth = 2;
        bfs.traverse((3, 3), &mut v).unwrap();
        assert_eq!(bfs.visited().len(), 4);
        assert_eq!(bfs.parents().len(), 3);
    }
}
