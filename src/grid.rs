use coord_2d::{Coord, Size};
use num_traits::Zero;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Source of opacity information for line of sight.
pub trait InputGrid {
    type Opacity;
    type Visibility: Copy
        + Zero
        + PartialOrd<Self::Opacity>
        + PartialOrd<Self::Visibility>
        + Sub<Self::Opacity, Output = Self::Visibility>;
    fn size(&self) -> Size;
    fn get_opacity(&self, coord: Coord) -> Option<Self::Opacity>;
    fn initial_visibility() -> Self::Visibility;
}

pub(crate) fn in_bounds(coord: Coord, size: Size) -> bool {
    coord.x >= 0
        && coord.y >= 0
        && (coord.x as u32) < size.width()
        && (coord.y as u32) < size.height()
}

/// Which cells of a map are currently visible. Replaced wholesale on
/// recompute; never edited once a cache has installed it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct VisibilityGrid {
    size: Size,
    cells: Vec<bool>,
}

impl VisibilityGrid {
    /// A grid of `size` with every cell hidden.
    pub fn new(size: Size) -> Self {
        let count = size.width() as usize * size.height() as usize;
        Self {
            size,
            cells: vec![false; count],
        }
    }

    pub fn from_fn<F: FnMut(Coord) -> bool>(size: Size, mut f: F) -> Self {
        let mut cells = Vec::with_capacity(size.width() as usize * size.height() as usize);
        for y in 0..size.height() {
            for x in 0..size.width() {
                cells.push(f(Coord::new(x as i32, y as i32)));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if in_bounds(coord, self.size) {
            Some(coord.y as usize * self.size.width() as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// `None` when `coord` lies outside the grid.
    pub fn get(&self, coord: Coord) -> Option<bool> {
        self.index(coord).and_then(|index| self.cells.get(index).copied())
    }

    pub fn is_visible(&self, coord: Coord) -> bool {
        self.get(coord).unwrap_or(false)
    }

    /// Returns false and leaves the grid untouched if `coord` is out of bounds.
    pub fn set(&mut self, coord: Coord, visible: bool) -> bool {
        match self.index(coord).and_then(|index| self.cells.get_mut(index)) {
            Some(cell) => {
                *cell = visible;
                true
            }
            None => false,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|&&visible| visible).count()
    }

    /// Visible coordinates in row-major order.
    pub fn iter_visible(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = self.size.width() as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &visible)| visible)
            .map(move |(index, _)| Coord::new((index % width) as i32, (index / width) as i32))
    }
}
