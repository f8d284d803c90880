//! Grid configuration.

use polygrid_core::Vec3;

use crate::error::GridError;

/// sin(60°), rounded the way generated templates have always used it.
const SIN_60: f32 = 0.866025;

/// Tiling shape and its size parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// `width x height` axis-aligned squares.
    Square { width: i32, height: i32 },
    /// Flat-topped hexagons grown in `layers` rings around the origin.
    Hex { layers: i32 },
    /// Alternating up and down triangles grown in `layers` rings.
    Triangle { layers: i32 },
    /// Any convex tile. `corners` are used as given, relative to the tile
    /// centre. Set `symmetric` to `false` when neighbouring tiles are
    /// mirror images of each other.
    Polygon {
        corners: Vec<Vec3>,
        layers: i32,
        symmetric: bool,
    },
}

impl Shape {
    /// Tag stored in persistence records.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Square { .. } => "SquareGrid",
            Self::Hex { .. } => "HexGrid",
            Self::Triangle { .. } => "TriangleGrid",
            Self::Polygon { .. } => "PolygonGrid",
        }
    }

    /// Whether every tile has the same, unflipped corners.
    pub fn is_symmetric(&self) -> bool {
        match self {
            Self::Square { .. } | Self::Hex { .. } => true,
            Self::Triangle { .. } => false,
            Self::Polygon { symmetric, .. } => *symmetric,
        }
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self, Self::Square { .. })
    }

    /// Flood-fill layer count; `None` for rectangular grids.
    pub fn layers(&self) -> Option<i32> {
        match self {
            Self::Square { .. } => None,
            Self::Hex { layers } | Self::Triangle { layers } | Self::Polygon { layers, .. } => {
                Some(*layers)
            }
        }
    }

    /// Canonical corners of a tile centred on the origin.
    pub fn corner_template(&self, radius: f32) -> Vec<Vec3> {
        let r = radius;
        match self {
            Self::Square { .. } => vec![
                Vec3::flat(-r, -r),
                Vec3::flat(r, -r),
                Vec3::flat(r, r),
                Vec3::flat(-r, r),
            ],
            Self::Hex { .. } => {
                let (x, z) = (r * 0.5, r * SIN_60);
                vec![
                    Vec3::flat(r, 0.0),
                    Vec3::flat(x, z),
                    Vec3::flat(-x, z),
                    Vec3::flat(-r, 0.0),
                    Vec3::flat(-x, -z),
                    Vec3::flat(x, -z),
                ]
            }
            Self::Triangle { .. } => {
                let (x, z) = (r * SIN_60, -r * 0.5);
                vec![Vec3::flat(0.0, r), Vec3::flat(-x, z), Vec3::flat(x, z)]
            }
            Self::Polygon { corners, .. } => corners.clone(),
        }
    }
}

/// Everything needed to generate a grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub shape: Shape,
    /// Tile radius. Sets tile spacing and the lookup tolerance.
    pub radius: f32,
    /// Only tiles sharing a full edge are neighbours.
    pub edge_neighbors_only: bool,
    /// Give every tile a [`TileObject`](crate::TileObject).
    pub create_tile_objects: bool,
    /// World position of the grid's local origin.
    pub origin: Vec3,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Square {
                width: 10,
                height: 10,
            },
            radius: 0.5,
            edge_neighbors_only: false,
            create_tile_objects: true,
            origin: Vec3::ZERO,
        }
    }
}

impl GridConfig {
    /// Default settings with a different shape. Hex grids get edge
    /// adjacency, the only mode they support.
    pub fn with_shape(shape: Shape) -> Self {
        let edge_neighbors_only = matches!(shape, Shape::Hex { .. });
        Self {
            shape,
            edge_neighbors_only,
            ..Self::default()
        }
    }

    /// Reject configurations that cannot produce a grid.
    pub fn check(&self) -> Result<(), GridError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GridError::InvalidRadius(self.radius));
        }
        match &self.shape {
            Shape::Square { width, height } => {
                if *width < 1 || *height < 1 {
                    return Err(GridError::InvalidDimensions {
                        width: *width,
                        height: *height,
                    });
                }
            }
            Shape::Hex { .. } if !self.edge_neighbors_only => {
                return Err(GridError::CornerAdjacencyUnsupported);
            }
            Shape::Polygon { corners, .. } if corners.len() < 3 => {
                return Err(GridError::InvalidTemplate(corners.len()));
            }
            _ => {}
        }
        match self.shape.layers() {
            Some(n) if n < 1 => Err(GridError::InvalidLayers(n)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_by_ten_square() {
        let c = GridConfig::default();
        assert_eq!(
            c.shape,
            Shape::Square {
                width: 10,
                height: 10
            }
        );
        assert_eq!(c.radius, 0.5);
        assert!(!c.edge_neighbors_only);
        assert!(c.check().is_ok());
    }

    #[test]
    fn check_rejects_bad_configs() {
        let mut c = GridConfig::with_shape(Shape::Hex { layers: 0 });
        assert_eq!(c.check(), Err(GridError::InvalidLayers(0)));
        c.shape = Shape::Hex { layers: 3 };
        c.edge_neighbors_only = false;
        assert_eq!(c.check(), Err(GridError::CornerAdjacencyUnsupported));

        let mut c = GridConfig::default();
        c.radius = -1.0;
        assert_eq!(c.check(), Err(GridError::InvalidRadius(-1.0)));
        c.radius = 1.0;
        c.shape = Shape::Square {
            width: 0,
            height: 4,
        };
        assert!(matches!(c.check(), Err(GridError::InvalidDimensions { .. })));
        c.shape = Shape::Polygon {
            corners: vec![Vec3::ZERO, Vec3::ONE],
            layers: 2,
            symmetric: true,
        };
        assert_eq!(c.check(), Err(GridError::InvalidTemplate(2)));
    }

    #[test]
    fn templates_scale_with_radius() {
        let hex = Shape::Hex { layers: 1 }.corner_template(2.0);
        assert_eq!(hex.len(), 6);
        assert_eq!(hex[0], Vec3::flat(2.0, 0.0));
        assert!((hex[1].z - 1.73205).abs() < 1e-4);

        let tri = Shape::Triangle { layers: 1 }.corner_template(1.0);
        assert_eq!(tri[0], Vec3::flat(0.0, 1.0));
        assert_eq!(tri[1], Vec3::flat(-SIN_60, -0.5));

        assert_eq!(Shape::Triangle { layers: 1 }.type_tag(), "TriangleGrid");
        assert!(!Shape::Triangle { layers: 1 }.is_symmetric());
    }
}
