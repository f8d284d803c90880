//! Generation pass: tile positions, orientation and adjacency.
//!
//! Rectangular grids enumerate rows and columns. Every other shape floods
//! outwards from the origin: the neighbour candidates of a tile centre are
//! the centre moved by twice each edge midpoint, and a breadth-first
//! traversal limited to the layer count walks that candidate graph while a
//! [`SpatialIndex2D`] keeps the first copy of each position.
//!
//! Non-symmetric tilings alternate orientation ring by ring, so candidate
//! steps flip sign on odd rings, and a second pass gives every tile its
//! actual corner set before adjacency is derived from shared corners.

use std::time::Instant;

use polygrid_core::geom::CORNER_EPSILON;
use polygrid_core::spatial::DEFAULT_ACCURACY;
use polygrid_core::{Bfs, ParentMap, Snap, SpatialIndex2D, Traversal, Vec3, Visitor};

use crate::config::Shape;
use crate::error::GridError;
use crate::grid::Grid;
use crate::tile::{Tile, TileObject};

/// Dedup tolerance of symmetric flood fills, relative to the radius.
const SYMMETRIC_DEDUP: f32 = 0.1;

impl Grid {
    /// Throw away all tiles and run generation again from the stored
    /// configuration.
    pub fn regenerate(&mut self) -> Result<(), GridError> {
        self.config.check()?;
        let started = Instant::now();

        self.clear();
        self.radius = self.config.radius;
        self.template = self.config.shape.corner_template(self.radius);

        let positions = match self.config.shape {
            Shape::Square { width, height } => self.rect_positions(width, height),
            ref shape => {
                let layers = shape.layers().unwrap_or(1);
                flood_fill(&self.template, layers, shape.is_symmetric(), self.radius)?
            }
        };

        let with_objects = self.config.create_tile_objects;
        self.tiles = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let mut tile = Tile::new(i, p);
                if with_objects {
                    tile.object = Some(TileObject::default());
                }
                tile
            })
            .collect();
        self.rebuild_index();

        if !self.config.shape.is_symmetric() {
            self.resolve_orientation()?;
        }
        self.reassign_neighbors();

        log::info!(
            "generated {} with {} tiles in {:.2?}",
            self.type_tag(),
            self.tiles.len(),
            started.elapsed()
        );
        Ok(())
    }

    fn rect_positions(&self, width: i32, height: i32) -> Vec<Vec3> {
        let (r, d) = (self.radius, self.diameter());
        let min = -self.rect_max(width, height);
        let mut out = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                out.push(min + Vec3::flat(x as f32 * d + r, y as f32 * d + r));
            }
        }
        out
    }

    /// Index every tile position. The first tile at a position wins.
    pub(crate) fn rebuild_index(&mut self) {
        self.index = SpatialIndex2D::new(DEFAULT_ACCURACY);
        for tile in &self.tiles {
            self.index
                .insert(tile.position.x, tile.position.z, tile.index());
        }
    }

    /// Give every tile reachable from the origin its actual corners: the
    /// origin tile takes the template, every other tile the negated
    /// corners of the tile it was reached from.
    fn resolve_orientation(&mut self) -> Result<(), GridError> {
        if self.tiles.is_empty() {
            return Ok(());
        }
        let first = self
            .tiles
            .iter()
            .position(|t| t.position.sqr_magnitude() < CORNER_EPSILON)
            .unwrap_or(0);
        self.tiles[first].vertices = Some(self.template.clone());

        let mut orient = Orient {
            tiles: &mut self.tiles,
            index: &self.index,
        };
        Bfs::new().traverse(first, &mut orient)?;
        Ok(())
    }

    /// Rebuild every tile's neighbour list.
    pub fn reassign_neighbors(&mut self) {
        let lists: Vec<Vec<usize>> = match self.dimensions() {
            Some((columns, rows)) => (0..self.tiles.len())
                .map(|i| self.rect_neighbors(i, columns, rows))
                .collect(),
            None => self.derive_neighbors(),
        };

        let mut links = 0;
        for (tile, list) in self.tiles.iter_mut().zip(lists) {
            links += list.len();
            tile.neighbors = list;
        }
        log::debug!(
            "{}: {links} neighbour links over {} tiles",
            self.type_tag(),
            self.tiles.len()
        );
    }

    /// Neighbours from shared corners, looking only at tiles a few candidate
    /// steps away.
    fn derive_neighbors(&self) -> Vec<Vec<usize>> {
        let depth = if self.config.edge_neighbors_only { 2 } else { 5 };
        let mut bfs = Bfs::new().with_max_depth(depth).without_parents();
        let mut candidates = Candidates {
            grid: self,
            found: Vec::new(),
        };

        let mut out = Vec::with_capacity(self.tiles.len());
        for (i, tile) in self.tiles.iter().enumerate() {
            candidates.found.clear();
            let mut list = Vec::new();
            if bfs.traverse(Snap(tile.position), &mut candidates).is_ok() {
                for &p in &candidates.found {
                    let Some(j) = self.tile_at_position(p) else {
                        continue;
                    };
                    if j != i && !list.contains(&j) && self.is_neighbors(i, j) {
                        list.push(j);
                    }
                }
            }
            out.push(list);
        }
        out
    }

    /// Whether two tiles touch: at least two shared corners with edge
    /// adjacency, at least one otherwise.
    pub fn is_neighbors(&self, a: usize, b: usize) -> bool {
        let ca = self.tile_corners(a);
        let cb = self.tile_corners(b);
        let shared = ca
            .iter()
            .map(|&p| {
                cb.iter()
                    .filter(|&&q| (p - q).sqr_magnitude() < CORNER_EPSILON)
                    .count()
            })
            .sum::<usize>();
        if self.config.edge_neighbors_only {
            shared > 1
        } else {
            shared > 0
        }
    }
}

/// Flood-fill tile positions around the origin.
fn flood_fill(
    template: &[Vec3],
    layers: i32,
    symmetric: bool,
    radius: f32,
) -> Result<Vec<Vec3>, GridError> {
    let n = template.len();
    let steps = (0..n).map(|i| template[i] + template[(i + 1) % n]).collect();
    let accuracy = if symmetric {
        radius * SYMMETRIC_DEDUP
    } else {
        DEFAULT_ACCURACY
    };

    let origin = Snap(Vec3::ZERO);
    let mut fill = FloodFill {
        steps,
        alternate: !symmetric,
        origin,
        seen: SpatialIndex2D::new(accuracy),
        positions: Vec::new(),
    };
    let mut bfs = Bfs::new().with_max_depth(layers);
    if symmetric {
        bfs = bfs.without_parents();
    }
    bfs.traverse(origin, &mut fill)?;
    Ok(fill.positions)
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

struct FloodFill {
    /// Twice each edge midpoint of the unflipped template.
    steps: Vec<Vec3>,
    /// Flip the steps on odd rings.
    alternate: bool,
    origin: Snap,
    seen: SpatialIndex2D<()>,
    positions: Vec<Vec3>,
}

impl Visitor<Snap> for FloodFill {
    fn neighbors(&mut self, node: &Snap, parents: &ParentMap<Snap>, out: &mut Vec<Snap>) {
        let odd = self.alternate && parents.distance(node, &self.origin, |_, _| 1) % 2 != 0;
        let sign = if odd { -1.0 } else { 1.0 };
        out.extend(self.steps.iter().map(|&s| Snap(node.0 + s * sign)));
    }

    fn on_node_accepted(&mut self, node: &Snap) {
        let p = node.pos();
        if self.seen.add(p.x, p.z) {
            self.positions.push(p);
        }
    }
}

/// Walks tiles across their own edges, mirroring each newly reached tile.
struct Orient<'a> {
    tiles: &'a mut [Tile],
    index: &'a SpatialIndex2D<usize>,
}

impl Visitor<usize> for Orient<'_> {
    fn neighbors(&mut self, node: &usize, _: &ParentMap<usize>, out: &mut Vec<usize>) {
        let tile = &self.tiles[*node];
        let Some(v) = tile.vertices.as_deref() else {
            return;
        };
        for i in 0..v.len() {
            let p = tile.position + v[i] + v[(i + 1) % v.len()];
            if let Some(&j) = self.index.get(p.x, p.z) {
                out.push(j);
            }
        }
    }

    fn on_neighbor_found(&mut self, node: &usize, parents: &ParentMap<usize>) {
        if self.tiles[*node]
            .vertices
            .as_ref()
            .is_some_and(|v| !v.is_empty())
        {
            return;
        }
        let Some(&parent) = parents.get(node) else {
            return;
        };
        let parent = &self.tiles[parent];
        let flipped: Option<Vec<Vec3>> = parent
            .vertices
            .as_ref()
            .map(|v| v.iter().map(|&c| -c).collect());
        let object = parent.object.as_ref().map(TileObject::mirrored_from);

        let tile = &mut self.tiles[*node];
        tile.vertices = flipped;
        if tile.object.is_some() {
            tile.object = object;
        }
    }
}

/// Candidate positions around a tile, restricted to existing tiles.
struct Candidates<'a> {
    grid: &'a Grid,
    found: Vec<Vec3>,
}

impl Visitor<Snap> for Candidates<'_> {
    fn neighbors(&mut self, node: &Snap, _: &ParentMap<Snap>, out: &mut Vec<Snap>) {
        let center = node.pos();
        let corners = match self.grid.tile_at_position(center) {
            Some(i) => self.grid.local_corners(i),
            None => self.grid.corner_template(),
        };
        let n = corners.len();
        out.extend((0..n).map(|i| Snap(center + corners[i] + corners[(i + 1) % n])));
    }

    fn accept(&mut self, node: &Snap) -> bool {
        let p = node.pos();
        self.grid.index.contains(p.x, p.z)
    }

    fn on_node_accepted(&mut self, node: &Snap) {
        self.found.push(node.pos());
    }
}
