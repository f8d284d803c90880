use std::fmt;

use polygrid_core::Vec3;

/// Errors delivered by the path service.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// No tile contains the requested point.
    NoTile { point: Vec3 },
    /// The reachability traversal rejected its root.
    Traversal(polygrid_core::Error),
    /// The request queue is at capacity.
    QueueFull,
    /// The worker thread is gone.
    Disconnected,
    /// The grid lock was poisoned by a panicking writer.
    GridUnavailable,
    /// The search panicked; carries the panic message.
    SearchPanicked(String),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTile { point } => write!(f, "no tile at {point}"),
            Self::Traversal(e) => write!(f, "reachability failed: {e}"),
            Self::QueueFull => f.write_str("path request queue is full"),
            Self::Disconnected => f.write_str("path worker is not running"),
            Self::GridUnavailable => f.write_str("grid lock is poisoned"),
            Self::SearchPanicked(msg) => write!(f, "search panicked: {msg}"),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<polygrid_core::Error> for PathError {
    fn from(e: polygrid_core::Error) -> Self {
        Self::Traversal(e)
    }
}
