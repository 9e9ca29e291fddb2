//! The parsed, validated map schema.
//!
//! Both map formats lower into a [`WorldConfig`]; `lle-world` consumes it
//! without ever seeing raw map text again.

use lle_core::{AgentId, Direction, LaserId, Position, Tile};

use crate::error::{ParseError, ParseResult};

// ── StartSet ──────────────────────────────────────────────────────────────────

/// One agent's set of candidate start cells.
///
/// Built from points and rectangles; kept flattened, deduplicated and in
/// insertion order so sampling is reproducible.  A singleton set means the
/// agent always starts on the same cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StartSet {
    positions: Vec<Position>,
}

impl StartSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = Position>) -> Self {
        let mut set = Self::new();
        for p in points {
            set.push(p);
        }
        set
    }

    /// Add a candidate cell; duplicates are ignored.
    pub fn push(&mut self, pos: Position) {
        if !self.positions.contains(&pos) {
            self.positions.push(pos);
        }
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ── SourceConfig ──────────────────────────────────────────────────────────────

/// A laser source as declared by the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SourceConfig {
    /// Parse-assigned, globally unique (row-major declaration order).
    pub laser_id: LaserId,
    pub pos: Position,
    pub direction: Direction,
    /// Initial colour.  May exceed the agent count: such a beam cannot be
    /// blocked by anyone.
    pub colour: AgentId,
}

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Everything `lle-world` needs to build a [`World`](../lle_world/struct.World.html):
/// static topology, laser sources, collectables and per-agent start sets.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Row-major, `height * width` entries.
    pub tiles: Vec<Tile>,
    pub sources: Vec<SourceConfig>,
    /// Gem cells, row-major declaration order.
    pub gems: Vec<Position>,
    /// Exit cells, row-major declaration order.
    pub exits: Vec<Position>,
    /// One start set per agent, indexed by agent id.
    pub start_sets: Vec<StartSet>,
    /// The original map text, kept verbatim for serialisation and display.
    pub source: String,
}

impl WorldConfig {
    #[inline]
    pub fn n_agents(&self) -> usize {
        self.start_sets.len()
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.i < self.height && pos.j < self.width
    }

    /// The tile at `pos`.
    ///
    /// # Panics
    ///
    /// If `pos` is out of bounds.
    #[inline]
    pub fn at(&self, pos: Position) -> Tile {
        self.tiles[pos.i * self.width + pos.j]
    }

    /// Structural checks shared by both formats: at least one agent, every
    /// agent has a start, enough exits, no start on void.
    pub fn validate(&self) -> ParseResult<()> {
        if self.start_sets.is_empty() {
            return Err(ParseError::NoAgents);
        }
        for (agent, starts) in self.start_sets.iter().enumerate() {
            if starts.is_empty() {
                return Err(ParseError::AgentWithoutStart(agent));
            }
            for &pos in starts.positions() {
                if self.at(pos) == Tile::Void {
                    return Err(ParseError::StartOnVoid { agent, pos });
                }
            }
        }
        if self.exits.len() < self.n_agents() {
            return Err(ParseError::NotEnoughExits {
                exits: self.exits.len(),
                agents: self.n_agents(),
            });
        }
        Ok(())
    }
}
