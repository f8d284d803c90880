//! Plain records for saving and loading generated grids.
//!
//! The records are storage-agnostic: enable the `serde` feature to push them
//! through any serde format.

use polygrid_core::spatial::DEFAULT_ACCURACY;
use polygrid_core::{Quat, Vec3};

use crate::config::Shape;
use crate::error::GridError;
use crate::grid::Grid;
use crate::tile::{Tile, TileObject};

/// A saved grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRecord {
    /// Type tag of the grid that produced the record.
    pub grid_type: String,
    pub tile_radius: f32,
    pub create_tile_objects: bool,
    pub tiles: Vec<TileRecord>,
}

/// A saved tile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRecord {
    pub walkable: bool,
    pub position: Vec3,
    pub neighbors: Vec<usize>,
    pub vertices: Option<Vec<Vec3>>,
    pub object_rotation: Quat,
    pub object_scale: Vec3,
}

impl From<&Tile> for TileRecord {
    fn from(tile: &Tile) -> Self {
        let object = tile.object.unwrap_or_default();
        Self {
            walkable: tile.walkable,
            position: tile.position,
            neighbors: tile.neighbors.clone(),
            vertices: tile.vertices.clone(),
            object_rotation: object.rotation,
            object_scale: object.scale,
        }
    }
}

impl Grid {
    /// Snapshot the grid. Fails on an empty grid.
    pub fn to_record(&self) -> Result<GridRecord, GridError> {
        if self.tiles.is_empty() {
            return Err(GridError::EmptySerialization);
        }
        log::debug!("saving {} with {} tiles", self.type_tag(), self.tiles.len());
        Ok(GridRecord {
            grid_type: self.type_tag().to_string(),
            tile_radius: self.radius,
            create_tile_objects: self.config.create_tile_objects,
            tiles: self.tiles.iter().map(TileRecord::from).collect(),
        })
    }

    /// Replace the grid's tiles with a saved record.
    ///
    /// The grid is left untouched when the record is rejected: another grid
    /// type, no tiles, a bad radius or a neighbour index past the end.
    /// Otherwise neighbour lists are taken as stored.
    pub fn load_record(&mut self, record: &GridRecord) -> Result<(), GridError> {
        if record.grid_type != self.type_tag() {
            return Err(GridError::TypeMismatch {
                expected: self.type_tag().to_string(),
                found: record.grid_type.clone(),
            });
        }
        if record.tiles.is_empty() {
            return Err(GridError::EmptySerialization);
        }
        if !(record.tile_radius.is_finite() && record.tile_radius > 0.0) {
            return Err(GridError::InvalidRadius(record.tile_radius));
        }
        let count = record.tiles.len();
        for (tile, r) in record.tiles.iter().enumerate() {
            if let Some(&neighbor) = r.neighbors.iter().find(|&&j| j >= count) {
                return Err(GridError::InvalidNeighbor { tile, neighbor });
            }
        }

        self.clear();
        self.config.create_tile_objects = record.create_tile_objects;
        self.config.radius = record.tile_radius;
        self.radius = record.tile_radius;
        self.template = self.config.shape.corner_template(self.radius);

        self.tiles = record
            .tiles
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut tile = Tile::new(i, r.position);
                tile.walkable = r.walkable;
                tile.neighbors = r.neighbors.clone();
                tile.vertices = r.vertices.clone();
                if record.create_tile_objects {
                    tile.object = Some(TileObject {
                        rotation: r.object_rotation,
                        scale: r.object_scale,
                    });
                }
                tile
            })
            .collect();

        if let Shape::Square { width, height } = &mut self.config.shape {
            // Rows are stored one after another; the first row is every tile
            // level with tile 0.
            let z = self.tiles[0].position.z;
            let columns = self
                .tiles
                .iter()
                .filter(|t| (t.position.z - z).abs() <= DEFAULT_ACCURACY)
                .count()
                .max(1);
            *width = columns as i32;
            *height = (self.tiles.len() / columns) as i32;
        }

        self.rebuild_index();
        log::debug!(
            "loaded {} with {} tiles",
            record.grid_type,
            self.tiles.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use std::collections::BTreeSet;

    fn assert_same_tiles(a: &Grid, b: &Grid) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.tiles().iter().zip(b.tiles()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.walkable, y.walkable);
            let nx: BTreeSet<_> = x.neighbors.iter().collect();
            let ny: BTreeSet<_> = y.neighbors.iter().collect();
            assert_eq!(nx, ny);
        }
    }

    #[test]
    fn square_round_trip_recovers_size() {
        let mut config = GridConfig::default();
        config.shape = Shape::Square {
            width: 7,
            height: 3,
        };
        let mut g = Grid::generate(config).unwrap();
        g.set_walkable(5, false);
        let before = g.clone();
        let record = g.to_record().unwrap();

        g.clear();
        g.config.shape = Shape::Square {
            width: 1,
            height: 1,
        };
        g.load_record(&record).unwrap();
        assert_eq!(g.dimensions(), Some((7, 3)));
        assert_same_tiles(&before, &g);
        assert_eq!(g.tile_index_at(before.world_position(12)), Some(12));
    }

    #[test]
    fn triangle_round_trip_keeps_orientation() {
        let config = GridConfig::with_shape(Shape::Triangle { layers: 4 });
        let mut g = Grid::generate(config).unwrap();
        g.set_walkable(2, false);
        let before = g.clone();
        let record = g.to_record().unwrap();
        assert_eq!(record.grid_type, "TriangleGrid");

        g.clear();
        g.load_record(&record).unwrap();
        assert_same_tiles(&before, &g);
        for i in 0..g.len() {
            assert_eq!(g.tile(i).vertices, before.tile(i).vertices);
            assert_eq!(g.tile(i).object, before.tile(i).object);
        }
        assert_eq!(g.tile_index_at(before.tile(3).position), Some(3));
    }

    #[test]
    fn single_column_round_trip() {
        let mut config = GridConfig::default();
        config.shape = Shape::Square {
            width: 1,
            height: 5,
        };
        let mut g = Grid::generate(config).unwrap();
        let before = g.clone();
        let record = g.to_record().unwrap();

        g.clear();
        g.load_record(&record).unwrap();
        assert_eq!(g.dimensions(), Some((1, 5)));
        assert_same_tiles(&before, &g);
        for i in 0..g.len() {
            let p = before.world_position(i);
            assert_eq!(g.tile_index_at(p), Some(i));
            assert_eq!(g.tile_index_at(p), before.tile_index_at(p));
        }
        assert_eq!(g.edge_distance(0, 1), before.edge_distance(0, 1));
    }

    #[test]
    fn out_of_range_neighbor_is_rejected() {
        let hex = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 2 })).unwrap();
        let mut record = hex.to_record().unwrap();
        record.tiles[3].neighbors.push(42);

        let mut g = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 3 })).unwrap();
        assert_eq!(
            g.load_record(&record),
            Err(GridError::InvalidNeighbor {
                tile: 3,
                neighbor: 42,
            })
        );
        assert_eq!(g.len(), 19);
        assert!(g.validate().is_valid());
    }

    #[test]
    fn empty_grid_cannot_be_saved() {
        let g = Grid::new(GridConfig::default()).unwrap();
        assert_eq!(g.to_record(), Err(GridError::EmptySerialization));
    }

    #[test]
    fn type_mismatch_leaves_grid_untouched() {
        let hex = Grid::generate(GridConfig::with_shape(Shape::Hex { layers: 2 })).unwrap();
        let record = hex.to_record().unwrap();

        let mut square = Grid::generate(GridConfig::default()).unwrap();
        let err = square.load_record(&record).unwrap_err();
        assert_eq!(
            err,
            GridError::TypeMismatch {
                expected: "SquareGrid".into(),
                found: "HexGrid".into(),
            }
        );
        assert_eq!(square.len(), 100);
        assert_eq!(square.dimensions(), Some((10, 10)));
    }

    #[test]
    fn objects_follow_the_record_flag() {
        let mut g = Grid::generate(GridConfig::default()).unwrap();
        let mut record = g.to_record().unwrap();
        record.create_tile_objects = false;
        record.tile_radius = 1.0;
        g.load_record(&record).unwrap();
        assert!(g.tiles().iter().all(|t| t.object.is_none()));
        assert_eq!(g.radius(), 1.0);
        assert!(!g.config().create_tile_objects);
    }
}
