use std::cmp::Ordering;

use polygrid_core::{Bfs, BinaryMaxHeap, HeapItem, NO_SLOT};

/// Parent value of a node that has none.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// SearchNode
// ---------------------------------------------------------------------------

/// Per-tile scratch of one A* search.
///
/// Nodes are only meaningful when `generation` matches the finder's current
/// generation; anything else is left over from an earlier search.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) parent: usize,
    pub(crate) heap_slot: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl SearchNode {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g.saturating_add(self.h)
    }

    /// Reset a stale node for the current search.
    pub(crate) fn touch(&mut self, generation: u32) {
        if self.generation != generation {
            *self = Self {
                generation,
                ..Self::default()
            };
        }
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: NO_PARENT,
            heap_slot: NO_SLOT,
            generation: 0,
            closed: false,
        }
    }
}

impl HeapItem for SearchNode {
    fn heap_slot(&self) -> usize {
        self.heap_slot
    }

    fn set_heap_slot(&mut self, slot: usize) {
        self.heap_slot = slot;
    }

    /// Lower total cost first, then lower heuristic.
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other.f().cmp(&self.f()).then(other.h.cmp(&self.h))
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Reusable search state for one grid at a time.
///
/// `PathFinder` owns the node array, open set and traversal buffers, so
/// repeated searches allocate nothing once the arrays have grown to the
/// grid size. Tiles themselves never carry search state.
#[derive(Debug, Default)]
pub struct PathFinder {
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) open: BinaryMaxHeap,
    pub(crate) reach: Bfs<usize>,
    pub(crate) nbuf: Vec<usize>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search over `tiles` tiles, invalidating every node.
    pub(crate) fn begin(&mut self, tiles: usize) -> u32 {
        if self.nodes.len() < tiles {
            self.nodes.resize_with(tiles, SearchNode::default);
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: generation 0 is what fresh nodes carry.
            for n in &mut self.nodes {
                n.generation = u32::MAX;
            }
            self.generation = 1;
        }
        self.open.clear();
        self.generation
    }
}
