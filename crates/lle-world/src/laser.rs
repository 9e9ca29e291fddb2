//! Laser sources and the beam engine.
//!
//! Each source owns two things:
//!
//! - a **static path**: the cells its beam traverses until a wall, another
//!   source (enabled or not), or the grid boundary.  Computed once at world
//!   construction; colour changes never alter it.
//! - a **lit mask** over that path, recomputed from scratch after every
//!   transition.  A path cell is lit iff the source is enabled and no live
//!   agent of the beam's colour stands strictly closer to the source.  The
//!   blocking agent's own cell stays lit; cells beyond it go dark.
//!
//! Two collinear opposing sources each propagate independently and halt at
//! the first obstruction; they meet without cancelling.

use lle_core::{AgentId, Direction, LaserId, Position};
use lle_parse::SourceConfig;

use crate::grid::Grid;

// ── LaserSource ───────────────────────────────────────────────────────────────

/// A fixed beam emitter.  Position, id and direction are immutable; colour
/// and the enabled flag can change at runtime (laser randomisation, beam
/// toggling).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserSource {
    laser_id: LaserId,
    pos: Position,
    direction: Direction,
    colour: AgentId,
    enabled: bool,
}

impl LaserSource {
    pub(crate) fn from_config(config: &SourceConfig) -> Self {
        LaserSource {
            laser_id: config.laser_id,
            pos: config.pos,
            direction: config.direction,
            colour: config.colour,
            enabled: true,
        }
    }

    #[inline]
    pub fn laser_id(&self) -> LaserId {
        self.laser_id
    }

    #[inline]
    pub fn pos(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn colour(&self) -> AgentId {
        self.colour
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_colour(&mut self, colour: AgentId) {
        self.colour = colour;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

// ── Beam ──────────────────────────────────────────────────────────────────────

/// One source's beam: static path plus per-cell lit mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    laser_id: LaserId,
    path: Vec<Position>,
    lit: Vec<bool>,
}

impl Beam {
    /// Walk from the cell next to `source` in its direction until a wall,
    /// another source, or the boundary.  Exits, gems and void are
    /// transparent.
    pub(crate) fn trace(grid: &Grid, source: &LaserSource) -> Self {
        let mut path = Vec::new();
        let mut cursor = source.pos();
        let delta = source.direction().delta();

        while let Some(next) = cursor.checked_shift(delta) {
            match grid.get(next) {
                Some(tile) if !tile.blocks_beam() => {
                    path.push(next);
                    cursor = next;
                }
                _ => break,
            }
        }

        let lit = vec![false; path.len()];
        Beam {
            laser_id: source.laser_id(),
            path,
            lit,
        }
    }

    #[inline]
    pub fn laser_id(&self) -> LaserId {
        self.laser_id
    }

    /// The full static path, nearest-to-source first.
    #[inline]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Currently lit cells.
    pub fn lit_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.path
            .iter()
            .zip(&self.lit)
            .filter(|&(_, &lit)| lit)
            .map(|(&pos, _)| pos)
    }

    pub fn is_lit(&self, pos: Position) -> bool {
        self.path
            .iter()
            .zip(&self.lit)
            .any(|(&cell, &lit)| lit && cell == pos)
    }

    /// Recompute the lit mask.  `blocker_at(cell)` reports whether a live
    /// agent of the beam's colour stands on `cell`.
    pub(crate) fn relight(&mut self, enabled: bool, mut blocker_at: impl FnMut(Position) -> bool) {
        let mut open = enabled;
        for (k, &cell) in self.path.iter().enumerate() {
            self.lit[k] = open;
            if open && blocker_at(cell) {
                open = false;
            }
        }
    }
}
