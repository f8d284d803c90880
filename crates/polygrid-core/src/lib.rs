//! **polygrid-core**: building blocks shared by the polygrid crates.
//!
//! This crate holds the pieces that know nothing about a particular tiling:
//! vector math on the XZ plane, a tolerance-aware two-level spatial index, a
//! self-indexing binary heap for open sets, and a traversal framework with
//! breadth-first and depth-first strategies.

pub mod error;
pub mod geom;
pub mod heap;
pub mod spatial;
pub mod traversal;

pub use error::Error;
pub use geom::{Quat, Snap, Vec3};
pub use heap::{BinaryMaxHeap, HeapItem, NO_SLOT};
pub use spatial::SpatialIndex2D;
pub use traversal::{Bfs, Dfs, ParentMap, RecursiveDfs, Traversal, UNREACHABLE, Visitor};
