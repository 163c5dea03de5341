//! Lazily recomputed, invalidation-driven visibility for 2D maps.
//!
//! [`VisibilityCache`] answers "can this tile be seen?" from a cached
//! [`VisibilityGrid`], recomputing it on demand after [`invalidate`] has been
//! called. It is shared between threads by reference. The grid itself comes
//! from a [`Recompute`] implementation; [`LineOfSight`] is the stock one,
//! rasterizing each [`Observer`]'s shadowcast field of view.
//!
//! [`invalidate`]: VisibilityCache::invalidate

mod cache;
mod config;
mod error;
mod grid;
mod line_of_sight;
mod shadowcast;
mod shadowcast_octants;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use line_of_sight::*;
pub use shadowcast::*;

pub use coord_2d::{Coord, Size};
