//! Reachability trees: every walkable tile's route to one target.

use polygrid_core::{ParentMap, Traversal, UNREACHABLE, Visitor};

use crate::finder::PathFinder;
use crate::traits::Topology;

/// Parent/cost tree rooted at one tile.
///
/// Following [`ReachTree::parent`] from any reached tile leads back to the
/// root along an approximately shortest route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachTree {
    root: usize,
    parent: Vec<Option<usize>>,
    cost: Vec<i32>,
}

impl ReachTree {
    pub fn root(&self) -> usize {
        self.root
    }

    /// Next tile towards the root. `None` for the root and unreached tiles.
    pub fn parent(&self, tile: usize) -> Option<usize> {
        self.parent.get(tile).copied().flatten()
    }

    /// Accumulated cost to the root, or [`UNREACHABLE`].
    pub fn cost(&self, tile: usize) -> i32 {
        self.cost.get(tile).copied().unwrap_or(UNREACHABLE)
    }

    pub fn contains(&self, tile: usize) -> bool {
        self.cost(tile) != UNREACHABLE
    }

    /// Number of tiles in the tree, root included.
    pub fn reached(&self) -> usize {
        self.cost.iter().filter(|&&c| c != UNREACHABLE).count()
    }

    /// Tiles from `tile` to the root, both included.
    pub fn path_to_root(&self, tile: usize) -> Option<Vec<usize>> {
        if !self.contains(tile) {
            return None;
        }
        let mut out = vec![tile];
        let mut current = tile;
        while current != self.root {
            if out.len() > self.parent.len() {
                return None;
            }
            current = self.parent(current)?;
            out.push(current);
        }
        Some(out)
    }
}

struct Reach<'a, T: ?Sized> {
    topo: &'a T,
    cost: &'a mut [i32],
}

impl<T: Topology + ?Sized> Visitor<usize> for Reach<'_, T> {
    fn neighbors(&mut self, node: &usize, _: &ParentMap<usize>, out: &mut Vec<usize>) {
        self.topo.neighbors(*node, out);
    }

    fn accept(&mut self, node: &usize) -> bool {
        self.topo.is_walkable(*node)
    }

    /// Keep whichever parent sits closer to the root.
    fn choose_parent(&mut self, old: &usize, new: &usize, _: &usize, _: &ParentMap<usize>) -> usize {
        if self.cost[*new] < self.cost[*old] {
            *new
        } else {
            *old
        }
    }

    fn on_neighbor_found(&mut self, node: &usize, parents: &ParentMap<usize>) {
        if let Some(&p) = parents.get(node) {
            self.cost[*node] = self.cost[p].saturating_add(self.topo.edge_distance(p, *node));
        }
    }
}

impl PathFinder {
    /// Build the reachability tree of every walkable tile that can reach
    /// `target`.
    ///
    /// Fails with [`Error::InvalidStart`](polygrid_core::Error::InvalidStart)
    /// when `target` is not walkable.
    pub fn reachability<T: Topology + ?Sized>(
        &mut self,
        topo: &T,
        target: usize,
    ) -> Result<ReachTree, polygrid_core::Error> {
        let count = topo.tile_count();
        let mut cost = vec![UNREACHABLE; count];
        if let Some(c) = cost.get_mut(target) {
            *c = 0;
        }

        let mut visitor = Reach {
            topo,
            cost: &mut cost,
        };
        self.reach.traverse(target, &mut visitor)?;

        let mut parent = vec![None; count];
        for (&node, &p) in self.reach.parents().iter() {
            parent[node] = Some(p);
        }
        log::debug!(
            "reachability from tile {target}: {} of {count} tiles",
            self.reach.visited().len()
        );
        Ok(ReachTree {
            root: target,
            parent,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use polygrid_core::{Error, Vec3};
    use polygrid_grid::{Grid, GridConfig, Shape};

    use super::*;
    use crate::distance::diagonal_distance;

    fn square(w: i32, h: i32, edge_only: bool) -> Grid {
        let mut config = GridConfig::default();
        config.shape = Shape::Square {
            width: w,
            height: h,
        };
        config.edge_neighbors_only = edge_only;
        Grid::generate(config).unwrap()
    }

    #[test]
    fn open_grid_costs_match_the_diagonal_rule() {
        let g = square(6, 5, false);
        let mut finder = PathFinder::new();
        let tree = finder.reachability(&g, 0).unwrap();
        assert_eq!(tree.root(), 0);
        assert_eq!(tree.reached(), 30);
        for y in 0..5 {
            for x in 0..6 {
                let t = (y * 6 + x) as usize;
                assert_eq!(tree.cost(t), diagonal_distance(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn paths_lead_back_to_the_root() {
        let g = square(7, 7, true);
        let mut finder = PathFinder::new();
        let tree = finder.reachability(&g, 24).unwrap();
        assert_eq!(tree.parent(24), None);
        for t in 0..g.len() {
            let path = tree.path_to_root(t).unwrap();
            assert_eq!(path[0], t);
            assert_eq!(*path.last().unwrap(), 24);
            for pair in path.windows(2) {
                assert!(g.neighbors(pair[0]).contains(&pair[1]));
            }
            // 4-connected: cost is ten per step.
            assert_eq!(tree.cost(t), 10 * (path.len() as i32 - 1));
        }
    }

    #[test]
    fn walls_cut_the_tree() {
        let w = 5;
        let mut g = square(w, 5, false);
        for y in 0..5 {
            g.set_walkable((y * w + 2) as usize, false);
        }
        let mut finder = PathFinder::new();
        let tree = finder.reachability(&g, 0).unwrap();
        assert_eq!(tree.reached(), 10);
        assert!(!tree.contains(4));
        assert!(!tree.contains(2));
        assert_eq!(tree.cost(4), UNREACHABLE);
        assert_eq!(tree.path_to_root(4), None);
    }

    /// Four tiles in a diamond; the direct edge to tile 1 is expensive.
    struct Diamond;

    impl Topology for Diamond {
        fn tile_count(&self) -> usize {
            4
        }
        fn position(&self, tile: usize) -> Vec3 {
            Vec3::flat(tile as f32, 0.0)
        }
        fn is_walkable(&self, _: usize) -> bool {
            true
        }
        fn neighbors(&self, tile: usize, buf: &mut Vec<usize>) {
            let list: &[usize] = match tile {
                0 => &[1, 2],
                1 => &[0, 3],
                2 => &[0, 3],
                _ => &[1, 2],
            };
            buf.extend_from_slice(list);
        }
        fn edge_distance(&self, a: usize, b: usize) -> i32 {
            match (a.min(b), a.max(b)) {
                (0, 1) => 50,
                _ => 10,
            }
        }
        fn tile_at(&self, _: Vec3) -> Option<usize> {
            None
        }
    }

    #[test]
    fn rediscovery_switches_to_the_cheaper_parent() {
        let topo = Diamond;
        let tree = PathFinder::new().reachability(&topo, 0).unwrap();
        // Tile 3 is first reached through 1 (cost 60), then through 2.
        assert_eq!(tree.parent(3), Some(2));
        assert_eq!(tree.cost(3), 20);
        let mut buf = Vec::new();
        topo.neighbors(3, &mut buf);
        let best = buf
            .iter()
            .map(|&n| tree.cost(n) + topo.edge_distance(n, 3))
            .min()
            .unwrap();
        assert_eq!(tree.cost(3), best);
        assert_eq!(tree.path_to_root(3), Some(vec![3, 2, 0]));
    }

    #[test]
    fn unwalkable_root_is_rejected() {
        let mut g = square(3, 3, false);
        g.set_walkable(4, false);
        let mut finder = PathFinder::new();
        assert_eq!(finder.reachability(&g, 4), Err(Error::InvalidStart));
    }

    #[test]
    fn finder_is_reusable_between_kinds_of_search() {
        let g = Grid::generate(GridConfig::with_shape(Shape::Triangle { layers: 4 })).unwrap();
        let mut finder = PathFinder::new();
        let tree = finder.reachability(&g, 0).unwrap();
        assert_eq!(tree.reached(), g.len());
        let far = g.len() - 1;
        let path = finder.find_path(&g, far, 0).unwrap();
        assert_eq!((path[0], path[path.len() - 1]), (far, 0));
        let again = finder.reachability(&g, far).unwrap();
        assert_eq!(again.root(), far);
        assert_eq!(again.reached(), g.len());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use polygrid_grid::{Grid, GridConfig, Shape};

    use super::*;
    use crate::service::ServiceConfig;

    #[test]
    fn tree_json_round_trip() {
        let mut g = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 3 })).unwrap();
        g.set_walkable(3, false);
        let tree = PathFinder::new().reachability(&g, 0).unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let back: ReachTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.cost(3), UNREACHABLE);
    }

    #[test]
    fn service_config_from_json() {
        let config: ServiceConfig = serde_json::from_str(r#"{"queue_capacity":8}"#).unwrap();
        assert_eq!(config.queue_capacity, 8);
    }
}
