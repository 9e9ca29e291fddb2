//! Static tile kinds.
//!
//! A cell holds exactly one base tile; beam overlays are tracked separately
//! by the world's beam engine, since several beams may cross one cell.

use crate::LaserId;

/// The base tile of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    Floor,
    Wall,
    /// Floor carrying a gem.  Whether the gem is still there is dynamic
    /// state owned by the world, not the grid.
    Gem,
    Exit,
    /// Walkable but lethal on entry.
    Void,
    /// A laser emitter.  Direction, colour and the enabled flag live on the
    /// world's `LaserSource` record; the grid only needs opacity.
    LaserSource(LaserId),
}

impl Tile {
    /// Walls and sources block movement; everything else is enterable.
    /// Void is walkable — stepping on it is legal, surviving it is not.
    #[inline]
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Wall | Tile::LaserSource(_))
    }

    /// Tiles that stop a beam: walls and sources (enabled or not).
    #[inline]
    pub fn blocks_beam(self) -> bool {
        matches!(self, Tile::Wall | Tile::LaserSource(_))
    }
}
