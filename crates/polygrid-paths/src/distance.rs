//! Edge cost formulas shared by every grid shape.
//!
//! [`Topology::edge_distance`](crate::Topology::edge_distance) implementations
//! pick one of these: square grids use [`diagonal_distance`] on column and
//! row offsets, polygon grids use [`straight_distance`].

pub use polygrid_grid::metric::{approx_straight_distance, diagonal_distance, straight_distance};
