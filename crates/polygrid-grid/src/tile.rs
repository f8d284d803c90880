use polygrid_core::{Quat, Vec3};

/// Placement of the host object drawn for a tile.
///
/// The grid never reads these values. Orientation resolution is the only
/// writer; everything else passes them through.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileObject {
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for TileObject {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl TileObject {
    /// Object for a tile mirrored from `parent`: turned half a circle about
    /// Y and flipped along X.
    pub fn mirrored_from(parent: &TileObject) -> Self {
        Self {
            rotation: Quat::from_yaw_degrees(parent.rotation.yaw_degrees() + 180.0),
            scale: Vec3::new(-parent.scale.x, 1.0, 1.0),
        }
    }
}

/// One cell of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Consulted by pathfinding.
    pub walkable: bool,
    /// Position relative to the grid origin.
    pub position: Vec3,
    /// Indices of adjacent tiles.
    pub neighbors: Vec<usize>,
    /// Corners relative to `position` when they differ from the grid's
    /// template.
    pub vertices: Option<Vec<Vec3>>,
    pub object: Option<TileObject>,
    index: usize,
}

impl Tile {
    pub(crate) fn new(index: usize, position: Vec3) -> Self {
        Self {
            walkable: true,
            position,
            neighbors: Vec::new(),
            vertices: None,
            object: None,
            index,
        }
    }

    /// Position in the grid's tile list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}
