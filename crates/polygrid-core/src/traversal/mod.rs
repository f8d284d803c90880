//! Graph traversals with pluggable policies.
//!
//! A traversal strategy ([`Bfs`], [`Dfs`], [`RecursiveDfs`]) owns the
//! per-call state: frontier, visited set and parent map. Everything about
//! the graph itself comes from a [`Visitor`]: how to enumerate neighbours,
//! which nodes are accepted, which parent wins when a node is reached twice,
//! and what to do when nodes are found or accepted.
//!
//! | Role | Visitor method | Default |
//! |---|---|---|
//! | neighbour generation | [`Visitor::neighbors`] | required |
//! | acceptance predicate | [`Visitor::accept`] | accept all |
//! | parent tie-break | [`Visitor::choose_parent`] | keep the old parent |
//! | neighbour callback | [`Visitor::on_neighbor_found`] | no-op |
//! | acceptance callback | [`Visitor::on_node_accepted`] | no-op |
//!
//! Any `FnMut(&T, &mut Vec<T>)` closure is a visitor with all defaults.

mod bfs;
mod dfs;
mod recursive;

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Error;

pub use bfs::Bfs;
pub use dfs::Dfs;
pub use recursive::RecursiveDfs;

/// Distance reported when a parent chain never reaches its target.
pub const UNREACHABLE: i32 = i32::MAX;

/// Policies plugged into a traversal.
pub trait Visitor<T: Clone + Eq + Hash> {
    /// Append the neighbours of `node` to `out`. `out` is empty on entry.
    fn neighbors(&mut self, node: &T, parents: &ParentMap<T>, out: &mut Vec<T>);

    /// Whether `node` may take part in the traversal.
    fn accept(&mut self, _node: &T) -> bool {
        true
    }

    /// Pick the parent of a node reached again through `new`.
    fn choose_parent(&mut self, old: &T, _new: &T, _start: &T, _parents: &ParentMap<T>) -> T {
        old.clone()
    }

    /// Called every time an accepted neighbour is reached, after its parent
    /// has been recorded.
    fn on_neighbor_found(&mut self, _node: &T, _parents: &ParentMap<T>) {}

    /// Called once for every node the traversal accepts.
    fn on_node_accepted(&mut self, _node: &T) {}
}

impl<T, F> Visitor<T> for F
where
    T: Clone + Eq + Hash,
    F: FnMut(&T, &mut Vec<T>),
{
    fn neighbors(&mut self, node: &T, _parents: &ParentMap<T>, out: &mut Vec<T>) {
        self(node, out)
    }
}

/// Shared contract of all traversal strategies.
pub trait Traversal<T: Clone + Eq + Hash> {
    /// Traverse everything reachable from `start`.
    ///
    /// Fails with [`Error::InvalidStart`] if the visitor rejects `start`.
    /// State from any previous run is cleared first.
    fn traverse<V: Visitor<T>>(&mut self, start: T, visitor: &mut V) -> Result<(), Error>;

    /// Drop all per-call state.
    fn clear(&mut self);

    /// Parents recorded by the last run.
    fn parents(&self) -> &ParentMap<T>;

    /// Turn parent tracking on or off for later runs.
    fn set_parents_enabled(&mut self, enabled: bool);
}

// ---------------------------------------------------------------------------
// ParentMap
// ---------------------------------------------------------------------------

/// Discovered node -> chosen predecessor.
#[derive(Debug, Clone)]
pub struct ParentMap<T> {
    map: HashMap<T, T>,
}

impl<T> Default for ParentMap<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> ParentMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, node: &T) -> Option<&T> {
        self.map.get(node)
    }

    #[inline]
    pub fn contains(&self, node: &T) -> bool {
        self.map.contains_key(node)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &T)> {
        self.map.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    pub(crate) fn insert(&mut self, node: T, parent: T) {
        self.map.insert(node, parent);
    }

    /// Sum `edge` along the parent chain from `start` up to `target`.
    ///
    /// Returns [`UNREACHABLE`] if the chain breaks or loops before reaching
    /// `target`.
    pub fn distance(&self, start: &T, target: &T, edge: impl Fn(&T, &T) -> i32) -> i32 {
        let mut total: i32 = 0;
        let mut steps = 0usize;
        let mut current = start;
        while current != target {
            if (steps > 0 && current == start) || steps > self.map.len() {
                return UNREACHABLE;
            }
            let Some(parent) = self.map.get(current) else {
                return UNREACHABLE;
            };
            total = total.saturating_add(edge(current, parent));
            current = parent;
            steps += 1;
        }
        total
    }

    /// Nodes from `from` up to `root`, both included, or `None` if the chain
    /// breaks or loops.
    pub fn chain(&self, from: &T, root: &T) -> Option<Vec<T>> {
        let mut out = vec![from.clone()];
        let mut current = from;
        while current != root {
            if out.len() > self.map.len() + 1 {
                return None;
            }
            current = self.map.get(current)?;
            out.push(current.clone());
        }
        Some(out)
    }

    /// Tie-break that keeps whichever parent has the shorter retraced
    /// distance to `start`. Ties keep `old`.
    pub fn closer_to_start(&self, old: &T, new: &T, start: &T, edge: impl Fn(&T, &T) -> i32) -> T {
        if self.distance(old, start, &edge) > self.distance(new, start, &edge) {
            new.clone()
        } else {
            old.clone()
        }
    }
}

/// Record `current` as a parent of `node` (through the tie-break when a
/// parent already exists) and fire the neighbour callback.
fn discover<T, V>(
    parents: &mut ParentMap<T>,
    enabled: bool,
    visitor: &mut V,
    node: &T,
    current: &T,
    start: &T,
) where
    T: Clone + Eq + Hash,
    V: Visitor<T>,
{
    if enabled {
        let chosen = match parents.get(node) {
            Some(old) => visitor.choose_parent(old, current, start, parents),
            None => current.clone(),
        };
        parents.insert(node.clone(), chosen);
    }
    visitor.on_neighbor_found(node, parents);
}
