//! Shared helpers for the terminal demos: obstacle scattering and ASCII
//! rendering of square grids.

use polygrid_grid::{Grid, GridConfig, GridError, Shape};
use polygrid_paths::ReachTree;
use rand::prelude::*;

pub const WIDTH: i32 = 48;
pub const HEIGHT: i32 = 18;

const FLOOR: char = '.';
const WALL: char = '#';
const PATH: char = '*';
const WAYPOINT: char = 'o';
const START: char = 'S';
const TARGET: char = 'T';

/// A square grid of `WIDTH x HEIGHT` unit tiles with 8-neighbour adjacency.
pub fn square_grid() -> Result<Grid, GridError> {
    let mut config = GridConfig::default();
    config.shape = Shape::Square {
        width: WIDTH,
        height: HEIGHT,
    };
    config.create_tile_objects = false;
    Grid::generate(config)
}

/// Block roughly `density` of the tiles, leaving the tiles in `keep` open.
///
/// Returns the number of blocked tiles.
pub fn scatter_obstacles<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    density: f64,
    keep: &[usize],
) -> usize {
    let mut blocked = 0;
    for tile in 0..grid.len() {
        let wall = !keep.contains(&tile) && rng.random_bool(density);
        grid.set_walkable(tile, !wall);
        blocked += usize::from(wall);
    }
    blocked
}

/// Draw a square grid top row first, with an optional path overlay.
pub fn render(grid: &Grid, path: &[usize], waypoints: &[usize]) -> String {
    let Some((w, h)) = grid.dimensions() else {
        return String::new();
    };
    let mut cells: Vec<char> = grid
        .tiles()
        .iter()
        .map(|t| if t.walkable { FLOOR } else { WALL })
        .collect();
    for &t in path {
        cells[t] = PATH;
    }
    for &t in waypoints {
        cells[t] = WAYPOINT;
    }
    if let (Some(&first), Some(&last)) = (path.first(), path.last()) {
        cells[first] = START;
        cells[last] = TARGET;
    }
    rows(&cells, w, h)
}

/// Draw the cost of every tile in a reachability tree as a digit band.
///
/// `0` is the root's band, `9` the farthest. Unreached floor stays `.`.
pub fn render_costs(grid: &Grid, tree: &ReachTree) -> String {
    let Some((w, h)) = grid.dimensions() else {
        return String::new();
    };
    let max = (0..grid.len())
        .filter(|&t| tree.contains(t))
        .map(|t| tree.cost(t))
        .max()
        .unwrap_or(0)
        .max(1);
    let cells: Vec<char> = (0..grid.len())
        .map(|t| {
            if !grid.is_walkable(t) {
                WALL
            } else if tree.contains(t) {
                let band = (tree.cost(t) as i64 * 9 / max as i64) as u32;
                char::from_digit(band, 10).unwrap_or('9')
            } else {
                FLOOR
            }
        })
        .collect();
    rows(&cells, w, h)
}

fn rows(cells: &[char], w: i32, h: i32) -> String {
    let w = w as usize;
    let mut out = String::with_capacity(cells.len() + h as usize);
    for y in (0..h as usize).rev() {
        out.extend(&cells[y * w..(y + 1) * w]);
        out.push('\n');
    }
    out
}
