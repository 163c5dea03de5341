//! Error types for visibility queries.
//!
//! None of these reach an end user: [`VisibilityCache::query`] folds every
//! one of them into a `false` answer. [`VisibilityCache::try_query`] keeps
//! the reason for callers that care.
//!
//! [`VisibilityCache::query`]: crate::VisibilityCache::query
//! [`VisibilityCache::try_query`]: crate::VisibilityCache::try_query

use coord_2d::{Coord, Size};

/// A recompute could not produce a grid because the domain state it
/// derives from does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotReady {
    /// No map has been configured.
    #[error("no map is available")]
    NoMap,

    /// Some other required piece of domain state is missing.
    #[error("domain state not initialized: {0}")]
    Uninitialized(String),
}

/// Why a visibility query could not be answered with `true`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisibilityError {
    /// The recompute collaborator reported that no grid can exist yet.
    #[error(transparent)]
    NotReady(#[from] NotReady),

    /// The coordinate lies outside the installed grid.
    #[error("coordinate {coord:?} outside visibility grid of size {size:?}")]
    OutOfBounds {
        /// The queried coordinate.
        coord: Coord,
        /// Dimensions of the grid it was checked against.
        size: Size,
    },
}
