//! Consistency checks over a generated or loaded grid.

use polygrid_core::geom::point_strictly_in_convex_polygon;

use crate::grid::Grid;

/// How far inside a tile a foreign corner must be to count as overlap.
const OVERLAP_MARGIN: f32 = 1e-3;

/// Problems found by [`Grid::validate`]. Pairs are `(tile, other)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Neighbour indices that point past the end of the tile list.
    pub out_of_range: Vec<(usize, usize)>,
    /// `tile` lists `other` but not the other way around.
    pub asymmetric: Vec<(usize, usize)>,
    /// Tiles that are not neighbours yet a corner of `tile` lies inside
    /// `other`.
    pub overlapping: Vec<(usize, usize)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.out_of_range.is_empty() && self.asymmetric.is_empty() && self.overlapping.is_empty()
    }
}

impl Grid {
    /// Check neighbour lists and tile shapes. O(n²) in the tile count.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let n = self.tiles.len();

        for (i, tile) in self.tiles.iter().enumerate() {
            for &j in &tile.neighbors {
                if j >= n {
                    report.out_of_range.push((i, j));
                } else if !self.tiles[j].neighbors.contains(&i) {
                    report.asymmetric.push((i, j));
                }
            }
        }

        let corners: Vec<_> = (0..n).map(|i| self.tile_corners(i)).collect();
        for i in 0..n {
            for j in 0..n {
                if i == j || self.tiles[i].neighbors.contains(&j) {
                    continue;
                }
                let center = self.tiles[j].position;
                let local = self.local_corners(j);
                if corners[i]
                    .iter()
                    .any(|&p| point_strictly_in_convex_polygon(p - center, local, OVERLAP_MARGIN))
                {
                    report.overlapping.push((i, j));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, Shape};
    use polygrid_core::Vec3;

    #[test]
    fn generated_grids_are_valid() {
        for shape in [
            Shape::Square {
                width: 5,
                height: 4,
            },
            Shape::Hex { layers: 3 },
            Shape::Triangle { layers: 4 },
        ] {
            let g = Grid::generate(GridConfig::with_shape(shape.clone())).unwrap();
            assert!(g.validate().is_valid(), "{shape:?}");
        }
        let mut config = GridConfig::with_shape(Shape::Triangle { layers: 4 });
        config.edge_neighbors_only = true;
        assert!(Grid::generate(config).unwrap().validate().is_valid());
    }

    #[test]
    fn broken_links_are_reported() {
        let mut g = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 2 })).unwrap();
        g.tile_mut(0).neighbors.push(99);
        let n = g.neighbors(1)[0];
        g.tile_mut(1).neighbors.retain(|&j| j != n);
        let report = g.validate();
        assert_eq!(report.out_of_range, vec![(0, 99)]);
        assert_eq!(report.asymmetric, vec![(n, 1)]);
        assert!(!report.is_valid());
    }

    #[test]
    fn overlapping_tiles_are_reported() {
        let mut g = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 2 })).unwrap();
        let far = g.len() - 1;
        let n = g.neighbors(0).iter().copied().find(|&j| j != far).unwrap();
        let on_top = g.tile(0).position + Vec3::flat(0.1, 0.0);
        g.tile_mut(far).position = on_top;
        // Neighbours may touch, so unlink the pair first.
        g.tile_mut(0).neighbors.retain(|&j| j != far);
        g.tile_mut(far).neighbors.retain(|&j| j != 0);
        let report = g.validate();
        assert!(report.overlapping.contains(&(0, far)));
        assert!(report.overlapping.contains(&(far, 0)));
        assert!(!report.overlapping.contains(&(0, n)));
    }
}
