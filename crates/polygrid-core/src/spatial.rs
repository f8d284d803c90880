//! Two-level binary search tree over `(x, z)` coordinates.
//!
//! The outer tree is keyed on `x`; every outer node owns an inner tree keyed
//! on `z`. Keys compare equal when they differ by at most the index
//! accuracy, which absorbs the rounding noise of generated positions.
//! Neither tree is balanced: generation inserts in flood-fill order, which is
//! far from sorted.
//!
//! Nodes live in two arenas and link to each other by index.

use std::cmp::Ordering;

/// Default accuracy used for exact-position deduplication.
pub const DEFAULT_ACCURACY: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
struct Link {
    key: f32,
    left: Option<usize>,
    right: Option<usize>,
}

impl Link {
    const fn leaf(key: f32) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }

    fn attach(&mut self, side: Ordering, child: usize) {
        match side {
            Ordering::Greater => self.right = Some(child),
            _ => self.left = Some(child),
        }
    }
}

#[derive(Debug, Clone)]
struct ColumnNode {
    link: Link,
    cells_root: usize,
}

#[derive(Debug, Clone)]
struct CellNode<T> {
    link: Link,
    value: T,
}

/// Tolerant float comparison.
#[inline]
fn compare(a: f32, b: f32, accuracy: f32) -> Ordering {
    if (a - b).abs() <= accuracy {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Walk down from `at` and return the node where the search for `key`
/// stops: either an equal node or the last node on the path.
fn descend<N>(
    nodes: &[N],
    mut at: usize,
    key: f32,
    accuracy: f32,
    link: impl Fn(&N) -> &Link,
) -> usize {
    loop {
        let l = link(&nodes[at]);
        let next = match compare(key, l.key, accuracy) {
            Ordering::Greater => l.right,
            Ordering::Less => l.left,
            Ordering::Equal => None,
        };
        match next {
            Some(n) => at = n,
            None => return at,
        }
    }
}

// ---------------------------------------------------------------------------
// SpatialIndex2D
// ---------------------------------------------------------------------------

/// Tolerance-aware `(x, z) -> T` index.
#[derive(Debug, Clone)]
pub struct SpatialIndex2D<T> {
    accuracy: f32,
    root: Option<usize>,
    columns: Vec<ColumnNode>,
    cells: Vec<CellNode<T>>,
}

impl<T> SpatialIndex2D<T> {
    /// Create an empty index with the given accuracy.
    pub fn new(accuracy: f32) -> Self {
        Self {
            accuracy,
            root: None,
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Current comparison accuracy.
    #[inline]
    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Change the comparison accuracy for all later operations.
    #[inline]
    pub fn set_accuracy(&mut self, accuracy: f32) {
        self.accuracy = accuracy;
    }

    /// Number of stored coordinate pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove every entry. The accuracy is kept.
    pub fn clear(&mut self) {
        self.root = None;
        self.columns.clear();
        self.cells.clear();
    }

    /// Insert `value` at `(x, z)` unless an entry already matches both
    /// coordinates within the accuracy. Returns `true` if inserted.
    pub fn insert(&mut self, x: f32, z: f32, value: T) -> bool {
        let acc = self.accuracy;
        let Some(root) = self.root else {
            self.push_column(x, z, value);
            self.root = Some(0);
            return true;
        };

        let ci = descend(&self.columns, root, x, acc, |c| &c.link);
        match compare(x, self.columns[ci].link.key, acc) {
            Ordering::Equal => {
                let cells_root = self.columns[ci].cells_root;
                let cj = descend(&self.cells, cells_root, z, acc, |c| &c.link);
                let side = compare(z, self.cells[cj].link.key, acc);
                if side == Ordering::Equal {
                    return false;
                }
                let new = self.cells.len();
                self.cells.push(CellNode {
                    link: Link::leaf(z),
                    value,
                });
                self.cells[cj].link.attach(side, new);
            }
            side => {
                let new = self.push_column(x, z, value);
                self.columns[ci].link.attach(side, new);
            }
        }
        true
    }

    fn push_column(&mut self, x: f32, z: f32, value: T) -> usize {
        let cells_root = self.cells.len();
        self.cells.push(CellNode {
            link: Link::leaf(z),
            value,
        });
        self.columns.push(ColumnNode {
            link: Link::leaf(x),
            cells_root,
        });
        self.columns.len() - 1
    }

    /// Read-only view that compares with a different accuracy.
    ///
    /// This is how approximate point lookups widen the tolerance: the
    /// index's own accuracy is never touched, so there is nothing to
    /// restore afterwards.
    #[inline]
    pub fn with_accuracy(&self, accuracy: f32) -> Lookup<'_, T> {
        Lookup {
            index: self,
            accuracy,
        }
    }

    #[inline]
    fn lookup(&self) -> Lookup<'_, T> {
        self.with_accuracy(self.accuracy)
    }

    /// Whether `(x, z)` matches a stored entry.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.lookup().contains(x, z)
    }

    /// Value stored at `(x, z)`, if any.
    pub fn get(&self, x: f32, z: f32) -> Option<&T> {
        self.lookup().get(x, z)
    }

    /// Value where the two-level search for `(x, z)` stops, whether or not
    /// it matches.
    pub fn nearest(&self, x: f32, z: f32) -> Option<&T> {
        self.lookup().nearest(x, z)
    }

    /// Outer-tree node closest to `x` under the search order.
    pub fn search(&self, x: f32) -> Option<Column<'_, T>> {
        self.lookup().search(x)
    }
}

impl SpatialIndex2D<()> {
    /// Insert a bare coordinate pair. Returns `false` if already present.
    pub fn add(&mut self, x: f32, z: f32) -> bool {
        self.insert(x, z, ())
    }
}

impl<T> Default for SpatialIndex2D<T> {
    fn default() -> Self {
        Self::new(DEFAULT_ACCURACY)
    }
}

// ---------------------------------------------------------------------------
// Lookup / Column
// ---------------------------------------------------------------------------

/// Borrowed view of a [`SpatialIndex2D`] with its own accuracy.
#[derive(Debug)]
pub struct Lookup<'a, T> {
    index: &'a SpatialIndex2D<T>,
    accuracy: f32,
}

impl<'a, T> Lookup<'a, T> {
    #[inline]
    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Outer-tree node where the search for `x` stops.
    pub fn search(&self, x: f32) -> Option<Column<'a, T>> {
        let root = self.index.root?;
        let at = descend(&self.index.columns, root, x, self.accuracy, |c| &c.link);
        Some(Column {
            index: self.index,
            at,
            accuracy: self.accuracy,
        })
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.get(x, z).is_some()
    }

    pub fn get(&self, x: f32, z: f32) -> Option<&'a T> {
        let column = self.search(x)?;
        if compare(x, column.key(), self.accuracy) != Ordering::Equal {
            return None;
        }
        column.get(z)
    }

    pub fn nearest(&self, x: f32, z: f32) -> Option<&'a T> {
        self.search(x).map(|column| column.search(z).1)
    }
}

/// One outer-tree node and the inner tree it owns.
#[derive(Debug)]
pub struct Column<'a, T> {
    index: &'a SpatialIndex2D<T>,
    at: usize,
    accuracy: f32,
}

impl<'a, T> Column<'a, T> {
    /// The stored `x` key.
    #[inline]
    pub fn key(&self) -> f32 {
        self.index.columns[self.at].link.key
    }

    /// Inner-tree node where the search for `z` stops, as `(z key, value)`.
    pub fn search(&self, z: f32) -> (f32, &'a T) {
        let root = self.index.columns[self.at].cells_root;
        let at = descend(&self.index.cells, root, z, self.accuracy, |c| &c.link);
        let cell = &self.index.cells[at];
        (cell.link.key, &cell.value)
    }

    /// Value stored under `z` in this column, if any.
    pub fn get(&self, z: f32) -> Option<&'a T> {
        let (key, value) = self.search(z);
        (compare(z, key, self.accuracy) == Ordering::Equal).then_some(value)
    }
}
