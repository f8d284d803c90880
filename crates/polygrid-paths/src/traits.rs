use polygrid_core::Vec3;
use polygrid_grid::Grid;

/// What the search algorithms need from a grid.
///
/// Tile ids are dense indices in `0..tile_count()`. Passing any other id is
/// a contract violation and may panic.
pub trait Topology {
    fn tile_count(&self) -> usize;

    /// World position of a tile centre.
    fn position(&self, tile: usize) -> Vec3;

    fn is_walkable(&self, tile: usize) -> bool;

    /// Append the neighbours of `tile` into `buf`. The caller clears `buf`
    /// before calling.
    fn neighbors(&self, tile: usize, buf: &mut Vec<usize>);

    /// Cost of moving from `a` to `b`. Also used as the A* heuristic, so it
    /// must be meaningful for tiles that are not adjacent.
    fn edge_distance(&self, a: usize, b: usize) -> i32;

    /// Tile containing a world point.
    fn tile_at(&self, point: Vec3) -> Option<usize>;
}

impl Topology for Grid {
    fn tile_count(&self) -> usize {
        self.len()
    }

    fn position(&self, tile: usize) -> Vec3 {
        self.world_position(tile)
    }

    fn is_walkable(&self, tile: usize) -> bool {
        Grid::is_walkable(self, tile)
    }

    fn neighbors(&self, tile: usize, buf: &mut Vec<usize>) {
        buf.extend_from_slice(Grid::neighbors(self, tile));
    }

    fn edge_distance(&self, a: usize, b: usize) -> i32 {
        Grid::edge_distance(self, a, b)
    }

    fn tile_at(&self, point: Vec3) -> Option<usize> {
        self.tile_index_at(point)
    }
}
