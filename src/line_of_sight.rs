use crate::cache::Recompute;
use crate::error::NotReady;
use crate::grid::{InputGrid, VisibilityGrid};
use crate::shadowcast::ShadowcastContext;
use coord_2d::Coord;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Anything that sees: a unit, a settlement, a watchtower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Observer {
    pub coord: Coord,
    /// Cells strictly closer than this (euclidean) are in range.
    pub radius: u32,
}

impl Observer {
    pub fn new(coord: Coord, radius: u32) -> Self {
        Self { coord, radius }
    }
}

/// A domain snapshot that line of sight can be derived from.
pub trait Sighted {
    type Map: InputGrid;
    /// `None` until a map exists.
    fn map(&self) -> Option<&Self::Map>;
    fn observers(&self) -> Vec<Observer>;
}

/// Recomputes visibility as the union of every observer's shadowcast field
/// of view over the domain's map.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOfSight;

impl<D: Sighted + ?Sized> Recompute<D> for LineOfSight {
    fn recompute(&self, domain: &D) -> Result<VisibilityGrid, NotReady> {
        let map = domain.map().ok_or(NotReady::NoMap)?;
        let mut grid = VisibilityGrid::new(map.size());
        let mut ctx = ShadowcastContext::new();
        for observer in domain.observers() {
            ctx.for_each(observer.coord, map, observer.radius, |coord| {
                grid.set(coord, true);
            });
        }
        Ok(grid)
    }
}
