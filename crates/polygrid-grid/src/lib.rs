//! **polygrid-grid**: polygon tilings and their topology.
//!
//! A [`Grid`] is generated from a [`GridConfig`]. Square grids are laid out
//! row by row; hexagon, triangle and custom polygon grids are flood-filled
//! outwards from the origin in layers. Generation also derives each tile's
//! neighbours from shared corners and, for tilings whose neighbours are
//! mirror images, each tile's actual corner set.
//!
//! Once built, a grid answers point lookups, tile-to-tile costs and
//! distances, and can be saved to and restored from a [`GridRecord`].

pub mod config;
pub mod error;
mod generate;
pub mod grid;
pub mod metric;
pub mod persist;
pub mod tile;
pub mod validate;

pub use config::{GridConfig, Shape};
pub use error::GridError;
pub use grid::Grid;
pub use persist::{GridRecord, TileRecord};
pub use tile::{Tile, TileObject};
pub use validate::ValidationReport;
