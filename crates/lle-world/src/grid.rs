//! Static 2D topology.
//!
//! The grid is immutable after construction: dynamic state (agents, gem
//! collection, beam on/off) lives on the world.  Storage is a dense
//! row-major `Vec<Tile>`.

use lle_core::{Position, Tile};
use lle_parse::WorldConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    height: usize,
    width: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub(crate) fn from_config(config: &WorldConfig) -> Self {
        Grid {
            height: config.height,
            width: config.width,
            tiles: config.tiles.clone(),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.i < self.height && pos.j < self.width
    }

    /// The tile at `pos`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.in_bounds(pos)
            .then(|| self.tiles[pos.i * self.width + pos.j])
    }

    /// The tile at `pos`.
    ///
    /// # Panics
    ///
    /// If `pos` is out of bounds; use [`get`][Grid::get] for checked access.
    #[inline]
    pub fn at(&self, pos: Position) -> Tile {
        self.tiles[pos.i * self.width + pos.j]
    }

    /// In bounds and enterable.  Void counts as walkable.
    #[inline]
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Tile::is_walkable)
    }

    fn positions_where<'a, F: Fn(Tile) -> bool + 'a>(
        &'a self,
        predicate: F,
    ) -> impl Iterator<Item = Position> + 'a {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |&(_, &tile)| predicate(tile))
            .map(|(k, _)| Position::new(k / self.width, k % self.width))
    }

    pub fn wall_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions_where(|t| t == Tile::Wall)
    }

    pub fn exit_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions_where(|t| t == Tile::Exit)
    }

    pub fn void_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions_where(|t| t == Tile::Void)
    }

    pub fn source_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions_where(|t| matches!(t, Tile::LaserSource(_)))
    }
}
