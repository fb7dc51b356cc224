//! Discrete grid coordinates.
//!
//! The city is a bounded `width × height` lattice with no wraparound.  Cells
//! are addressed by signed coordinates so that a target computed off the edge
//! of the map is representable (and rejected by the grid) rather than
//! silently wrapping.

use std::fmt;

/// A cell on the city grid.  Immutable value type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sum of absolute axis offsets.  Used for dispatch distance and the
    /// jump-to-target test in movement.
    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Largest absolute axis offset: the number of diagonal unit steps
    /// between two cells.
    #[inline]
    pub fn chebyshev(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// `true` if the cell lies inside `[0, width) × [0, height)`.
    #[inline]
    pub fn within(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
