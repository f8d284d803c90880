use crate::finder::{NO_PARENT, PathFinder};
use crate::traits::Topology;

impl PathFinder {
    /// Shortest walkable path from `start` to `target` using A*.
    ///
    /// Returns the tiles in travel order, both endpoints included, or `None`
    /// when the open set runs dry first. The search only succeeds once the
    /// target is popped, not when it is first reached. The start tile itself
    /// is not checked for walkability.
    pub fn find_path<T: Topology + ?Sized>(
        &mut self,
        topo: &T,
        start: usize,
        target: usize,
    ) -> Option<Vec<usize>> {
        let count = topo.tile_count();
        if start >= count || target >= count {
            return None;
        }
        if start == target {
            return Some(vec![start]);
        }

        let cur_gen = self.begin(count);
        {
            let node = &mut self.nodes[start];
            node.touch(cur_gen);
            node.g = 0;
            node.h = topo.edge_distance(start, target);
        }
        self.open.add(&mut self.nodes, start);

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = loop {
            let Ok(current) = self.open.remove_first(&mut self.nodes) else {
                break false;
            };
            self.nodes[current].closed = true;
            if current == target {
                break true;
            }

            let current_g = self.nodes[current].g;
            nbuf.clear();
            topo.neighbors(current, &mut nbuf);

            for &n in nbuf.iter() {
                if !topo.is_walkable(n) {
                    continue;
                }
                let node = &mut self.nodes[n];
                node.touch(cur_gen);
                if node.closed {
                    continue;
                }

                let tentative = current_g.saturating_add(topo.edge_distance(current, n));
                let queued = self.open.contains(&self.nodes, n);
                if queued && tentative >= self.nodes[n].g {
                    continue;
                }

                let node = &mut self.nodes[n];
                node.g = tentative;
                node.h = topo.edge_distance(n, target);
                node.parent = current;
                if queued {
                    self.open.update_item(&mut self.nodes, n);
                } else {
                    self.open.add(&mut self.nodes, n);
                }
            }
        };

        self.nbuf = nbuf;

        if !found {
            log::debug!("no path from tile {start} to tile {target}");
            return None;
        }
        Some(self.retrace(start, target))
    }

    fn retrace(&self, start: usize, target: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = target;
        while current != NO_PARENT {
            path.push(current);
            if current == start {
                break;
            }
            current = self.nodes[current].parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use polygrid_grid::{Grid, GridConfig, Shape};
    use rand::prelude::*;

    use super::*;
    use crate::distance::diagonal_distance;

    fn square(w: i32, h: i32) -> Grid {
        let mut config = GridConfig::default();
        config.shape = Shape::Square {
            width: w,
            height: h,
        };
        Grid::generate(config).unwrap()
    }

    fn at(w: i32, x: i32, y: i32) -> usize {
        (y * w + x) as usize
    }

    fn steps_cost(g: &Grid, path: &[usize]) -> i32 {
        path.windows(2).map(|p| g.edge_distance(p[0], p[1])).sum()
    }

    #[test]
    fn diagonal_path_has_minimal_steps() {
        let g = square(8, 8);
        let mut finder = PathFinder::new();
        let path = finder.find_path(&g, at(8, 0, 0), at(8, 3, 4)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], at(8, 0, 0));
        assert_eq!(path[4], at(8, 3, 4));
        assert_eq!(steps_cost(&g, &path), diagonal_distance(3, 4));
    }

    #[test]
    fn same_tile_is_a_one_tile_path() {
        let g = square(4, 4);
        let mut finder = PathFinder::new();
        assert_eq!(finder.find_path(&g, 5, 5), Some(vec![5]));
        assert_eq!(finder.find_path(&g, 5, 16), None);
    }

    #[test]
    fn wall_forces_a_detour() {
        let w = 10;
        let mut g = square(w, 10);
        // Vertical wall at x = 5 with a gap at the bottom row.
        for y in 0..9 {
            g.set_walkable(at(w, 5, y), false);
        }
        let mut finder = PathFinder::new();
        let path = finder.find_path(&g, at(w, 2, 2), at(w, 8, 2)).unwrap();
        assert!(path.iter().all(|&t| g.is_walkable(t)));
        assert!(path.contains(&at(w, 5, 9)));
        assert!(path.len() > 7);
        for pair in path.windows(2) {
            assert!(g.neighbors(pair[0]).contains(&pair[1]));
        }
    }

    #[test]
    fn sealed_target_has_no_path() {
        let w = 6;
        let mut g = square(w, 6);
        for y in 0..6 {
            g.set_walkable(at(w, 3, y), false);
        }
        let mut finder = PathFinder::new();
        assert_eq!(finder.find_path(&g, at(w, 0, 0), at(w, 5, 5)), None);
        // The finder is reusable after a failed search.
        assert!(finder.find_path(&g, at(w, 0, 0), at(w, 2, 5)).is_some());
    }

    #[test]
    fn hex_paths_follow_neighbors() {
        let g = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 4 })).unwrap();
        let mut finder = PathFinder::new();
        let far = g.len() - 1;
        let path = finder.find_path(&g, 0, far).unwrap();
        // The outermost ring of a 4-layer hex grid is three steps out.
        assert!(path.len() >= 4);
        assert_eq!((path[0], path[path.len() - 1]), (0, far));
        for pair in path.windows(2) {
            assert!(g.neighbors(pair[0]).contains(&pair[1]));
        }
    }

    #[test]
    fn random_obstacles_never_end_up_on_the_path() {
        let w = 20;
        let mut rng = StdRng::seed_from_u64(7);
        let mut finder = PathFinder::new();
        for _ in 0..20 {
            let mut g = square(w, w);
            for t in 0..g.len() {
                if rng.random_bool(0.25) {
                    g.set_walkable(t, false);
                }
            }
            let (a, b) = (at(w, 0, 0), at(w, w - 1, w - 1));
            g.set_walkable(a, true);
            g.set_walkable(b, true);
            if let Some(path) = finder.find_path(&g, a, b) {
                assert!(path.iter().all(|&t| g.is_walkable(t)));
                assert!(steps_cost(&g, &path) >= diagonal_distance(w - 1, w - 1));
            }
        }
    }
}
