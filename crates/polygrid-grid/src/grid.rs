//! The [`Grid`] type and its queries.
//!
//! A grid is created from a [`GridConfig`], filled by one generation pass
//! (see `generate.rs`) and then queried. Tile indices stay valid until the
//! next [`Grid::regenerate`], [`Grid::clear`] or [`Grid::load_record`].

use polygrid_core::geom::point_in_convex_polygon;
use polygrid_core::{Bfs, ParentMap, SpatialIndex2D, Traversal, UNREACHABLE, Vec3, Visitor};

use crate::config::{GridConfig, Shape};
use crate::error::GridError;
use crate::metric::{approx_straight_distance, diagonal_distance, straight_distance};
use crate::tile::Tile;

/// A generated grid of polygon tiles.
#[derive(Debug, Clone)]
pub struct Grid {
    pub(crate) config: GridConfig,
    /// Radius the current tiles were generated or loaded with.
    pub(crate) radius: f32,
    pub(crate) template: Vec<Vec3>,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) index: SpatialIndex2D<usize>,
}

impl Grid {
    /// An empty grid. Call [`regenerate`](Self::regenerate) or
    /// [`load_record`](Self::load_record) to fill it.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.check()?;
        let radius = config.radius;
        let template = config.shape.corner_template(radius);
        Ok(Self {
            config,
            radius,
            template,
            tiles: Vec::new(),
            index: SpatialIndex2D::default(),
        })
    }

    /// Build a grid and run the full generation pass.
    pub fn generate(config: GridConfig) -> Result<Self, GridError> {
        let mut grid = Self::new(config)?;
        grid.regenerate()?;
        Ok(grid)
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.index.clear();
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn shape(&self) -> &Shape {
        &self.config.shape
    }

    /// Tag identifying this grid type in persistence records.
    pub fn type_tag(&self) -> &'static str {
        self.config.shape.type_tag()
    }

    /// Radius of the current tiles.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.config.origin
    }

    /// Move the grid. Tile positions are local and do not change.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.config.origin = origin;
    }

    #[inline]
    pub fn edge_neighbors_only(&self) -> bool {
        self.config.edge_neighbors_only
    }

    /// Shared corner template, relative to a tile centre.
    pub fn corner_template(&self) -> &[Vec3] {
        &self.template
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Panics if `index` is out of range.
    #[inline]
    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    #[inline]
    pub fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles[index]
    }

    #[inline]
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.tiles[index].neighbors
    }

    #[inline]
    pub fn is_walkable(&self, index: usize) -> bool {
        self.tiles[index].walkable
    }

    pub fn set_walkable(&mut self, index: usize, walkable: bool) {
        self.tiles[index].walkable = walkable;
    }

    /// Tile centre in world space.
    pub fn world_position(&self, index: usize) -> Vec3 {
        self.config.origin + self.tiles[index].position
    }

    /// `(columns, rows)` of a rectangular grid.
    pub fn dimensions(&self) -> Option<(i32, i32)> {
        match self.config.shape {
            Shape::Square { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Corners of a tile relative to its centre.
    pub fn local_corners(&self, index: usize) -> &[Vec3] {
        self.tiles[index]
            .vertices
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(self.template.as_slice())
    }

    /// Corners of a tile in grid-local space.
    pub fn tile_corners(&self, index: usize) -> Vec<Vec3> {
        let center = self.tiles[index].position;
        self.local_corners(index)
            .iter()
            .map(|&c| c + center)
            .collect()
    }

    /// Whether the grid-local point `p` lies inside tile `index`.
    pub fn tile_contains(&self, index: usize, p: Vec3) -> bool {
        point_in_convex_polygon(p - self.tiles[index].position, self.local_corners(index))
    }

    /// Tile at an exact grid-local position.
    pub(crate) fn tile_at_position(&self, p: Vec3) -> Option<usize> {
        self.index.get(p.x, p.z).copied()
    }

    // -----------------------------------------------------------------------
    // Rectangular helpers
    // -----------------------------------------------------------------------

    fn cell_of(&self, index: usize, columns: i32) -> (i32, i32) {
        let i = index as i32;
        (i % columns, i / columns)
    }

    /// Neighbours of a rectangular tile from row and column arithmetic.
    pub(crate) fn rect_neighbors(&self, index: usize, columns: i32, rows: i32) -> Vec<usize> {
        let (x, y) = self.cell_of(index, columns);
        let at = |x: i32, y: i32| (y * columns + x) as usize;
        let mut out = Vec::with_capacity(8);
        if self.config.edge_neighbors_only {
            if x > 0 {
                out.push(at(x - 1, y));
            }
            if x + 1 < columns {
                out.push(at(x + 1, y));
            }
            if y > 0 {
                out.push(at(x, y - 1));
            }
            if y + 1 < rows {
                out.push(at(x, y + 1));
            }
        } else {
            for ny in (y - 1).max(0)..(y + 2).min(rows) {
                for nx in (x - 1).max(0)..(x + 2).min(columns) {
                    if nx != x || ny != y {
                        out.push(at(nx, ny));
                    }
                }
            }
        }
        out
    }

    /// Half extent of a rectangular grid.
    pub(crate) fn rect_max(&self, columns: i32, rows: i32) -> Vec3 {
        let d = self.diameter();
        Vec3::flat(d * columns as f32 * 0.5, d * rows as f32 * 0.5)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Tile containing the world point `point`, if any.
    pub fn tile_index_at(&self, point: Vec3) -> Option<usize> {
        if self.tiles.is_empty() {
            return None;
        }
        let local = point - self.config.origin;

        if let Some((columns, rows)) = self.dimensions() {
            let max = self.rect_max(columns, rows);
            let min = -max;
            let x = ((local.x - min.x) / (max.x - min.x) * columns as f32).floor();
            let y = ((local.z - min.z) / (max.z - min.z) * rows as f32).floor();
            if x < 0.0 || y < 0.0 || x >= columns as f32 || y >= rows as f32 {
                return None;
            }
            let index = (y as i32 * columns + x as i32) as usize;
            return (index < self.tiles.len()).then_some(index);
        }

        let lookup = self.index.with_accuracy(self.radius * self.radius);
        let found = *lookup.nearest(local.x, local.z)?;
        if self.tile_contains(found, local) {
            return Some(found);
        }
        self.tiles[found]
            .neighbors
            .iter()
            .copied()
            .find(|&n| self.tile_contains(n, local))
    }

    /// Cost of stepping from tile `a` to adjacent tile `b`.
    pub fn edge_distance(&self, a: usize, b: usize) -> i32 {
        match self.dimensions() {
            Some((columns, _)) => {
                let (ax, ay) = self.cell_of(a, columns);
                let (bx, by) = self.cell_of(b, columns);
                diagonal_distance(ax - bx, ay - by)
            }
            None => straight_distance(self.tiles[a].position, self.tiles[b].position),
        }
    }

    /// Cost of the shortest route between two tiles, ignoring walkability.
    ///
    /// Rectangular grids answer in closed form. Other grids grow a
    /// breadth-first tree from `b`, preferring on rediscovery the parent
    /// whose route back to `b` is cheaper under
    /// [`approx_straight_distance`], then sum [`straight_distance`] along
    /// the tree from `a`. Returns [`UNREACHABLE`] when `a` cannot reach `b`.
    pub fn distance(&self, a: usize, b: usize) -> i32 {
        if self.dimensions().is_some() {
            return self.edge_distance(a, b);
        }

        let mut tree = DistanceTree { grid: self };
        let mut bfs = Bfs::new();
        if bfs.traverse(b, &mut tree).is_err() {
            return UNREACHABLE;
        }
        bfs.parents().distance(&a, &b, |&x, &y| {
            straight_distance(self.tiles[x].position, self.tiles[y].position)
        })
    }

    /// Set every tile's walkable flag from a blocking test.
    ///
    /// `is_blocked` receives the tile's world position and a probe radius
    /// of `radius * radius_multiplier`. Returns the number of blocked tiles.
    pub fn classify_walkable(
        &mut self,
        radius_multiplier: f32,
        mut is_blocked: impl FnMut(Vec3, f32) -> bool,
    ) -> usize {
        let probe = self.radius * radius_multiplier;
        let origin = self.config.origin;
        let mut blocked = 0;
        for tile in &mut self.tiles {
            tile.walkable = !is_blocked(origin + tile.position, probe);
            if !tile.walkable {
                blocked += 1;
            }
        }
        blocked
    }
}

/// Visitor for [`Grid::distance`].
struct DistanceTree<'a> {
    grid: &'a Grid,
}

impl Visitor<usize> for DistanceTree<'_> {
    fn neighbors(&mut self, node: &usize, _: &ParentMap<usize>, out: &mut Vec<usize>) {
        out.extend_from_slice(&self.grid.tiles[*node].neighbors);
    }

    fn choose_parent(
        &mut self,
        old: &usize,
        new: &usize,
        start: &usize,
        parents: &ParentMap<usize>,
    ) -> usize {
        let tiles = &self.grid.tiles;
        parents.closer_to_start(old, new, start, |&x, &y| {
            approx_straight_distance(tiles[x].position, tiles[y].position)
        })
    }
}
