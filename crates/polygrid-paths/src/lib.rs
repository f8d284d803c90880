//! Pathfinding over polygon grids.
//!
//! - **A\*** shortest path between two tiles ([`PathFinder::find_path`])
//! - **Reachability trees** rooting every walkable tile at one target
//!   ([`PathFinder::reachability`])
//! - **Path simplification** into direction-change waypoints
//!   ([`simplify_path`])
//! - **Background searches** with callbacks delivered on the caller's tick
//!   ([`PathService`])
//!
//! The algorithms only see a grid through the [`Topology`] trait, which
//! [`polygrid_grid::Grid`] implements. [`PathFinder`] keeps all per-search
//! scratch, so tiles never carry search state and repeated queries reuse the
//! same buffers.

mod astar;
pub mod distance;
mod error;
mod finder;
mod reach;
pub mod service;
mod simplify;
mod traits;

pub use error::PathError;
pub use finder::PathFinder;
pub use polygrid_core::UNREACHABLE;
pub use reach::ReachTree;
pub use service::{
    Callback, FoundPath, Outcome, PathResponse, PathService, Query, Requester, ServiceConfig,
};
pub use simplify::simplify_path;
pub use traits::Topology;
