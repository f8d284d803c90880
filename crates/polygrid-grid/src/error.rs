use std::fmt;

/// Errors raised while building, loading or saving a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A record made by one grid type was loaded into another.
    TypeMismatch { expected: String, found: String },
    /// There are no tiles to save, or the record to load has none.
    EmptySerialization,
    /// Flood-fill grids need at least one layer.
    InvalidLayers(i32),
    /// Rectangular grids need a positive width and height.
    InvalidDimensions { width: i32, height: i32 },
    /// The tile radius must be positive and finite.
    InvalidRadius(f32),
    /// Hex tiles never touch at a single corner.
    CornerAdjacencyUnsupported,
    /// A polygon template needs at least three corners.
    InvalidTemplate(usize),
    /// A loaded tile lists a neighbour index past the end of the tile list.
    InvalidNeighbor { tile: usize, neighbor: usize },
    /// The generation traversal failed.
    Traversal(polygrid_core::Error),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "cannot load {found} data into a {expected}")
            }
            Self::EmptySerialization => f.write_str("grid has no tiles to serialize"),
            Self::InvalidLayers(n) => write!(f, "layer count must be at least 1, got {n}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid size {width}x{height}")
            }
            Self::InvalidRadius(r) => write!(f, "invalid tile radius {r}"),
            Self::CornerAdjacencyUnsupported => {
                f.write_str("hex grids only support edge adjacency")
            }
            Self::InvalidTemplate(n) => {
                write!(f, "corner template needs at least 3 corners, got {n}")
            }
            Self::InvalidNeighbor { tile, neighbor } => {
                write!(f, "tile {tile} lists missing neighbour {neighbor}")
            }
            Self::Traversal(e) => write!(f, "generation traversal failed: {e}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<polygrid_core::Error> for GridError {
    fn from(e: polygrid_core::Error) -> Self {
        Self::Traversal(e)
    }
}
