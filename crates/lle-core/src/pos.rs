//! Grid coordinates.
//!
//! `Position` is a (row, col) pair of non-negative integers.  Bounds against
//! a particular grid are checked by the grid itself; this type only guards
//! against underflow when a negative delta is applied.

/// A cell coordinate: `i` is the row (0 at the top), `j` the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    #[inline]
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Apply a `(di, dj)` delta, returning `None` if either coordinate would
    /// go negative.  Upper bounds are the grid's concern.
    #[inline]
    pub fn checked_shift(self, (di, dj): (i32, i32)) -> Option<Position> {
        let i = self.i.checked_add_signed(di as isize)?;
        let j = self.j.checked_add_signed(dj as isize)?;
        Some(Position { i, j })
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub fn manhattan(self, other: Position) -> usize {
        self.i.abs_diff(other.i) + self.j.abs_diff(other.j)
    }
}

impl From<(usize, usize)> for Position {
    #[inline]
    fn from((i, j): (usize, usize)) -> Self {
        Position { i, j }
    }
}

impl From<Position> for (usize, usize) {
    #[inline]
    fn from(pos: Position) -> Self {
        (pos.i, pos.j)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}
