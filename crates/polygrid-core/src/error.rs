use std::fmt;

/// Errors raised by the core data structures and traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The traversal start node was rejected by the acceptance predicate.
    InvalidStart,
    /// `remove_first` was called on an empty heap.
    EmptyHeap,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStart => f.write_str("traversal start node is not accepted"),
            Self::EmptyHeap => f.write_str("no items in the heap"),
        }
    }
}

impl std::error::Error for Error {}
