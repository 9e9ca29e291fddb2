//! `WorldState` — the canonical persisted-state value.
//!
//! Structural equality and hashing make states usable as search keys
//! (planners hash millions of them).  `as_array`/`from_array` give the flat
//! float encoding used by the state observation generators.

use lle_core::Position;

use crate::error::{InvalidWorldState, WorldResult};

/// A snapshot of everything dynamic: positions, gem collection, liveness.
///
/// The layout of [`as_array`][WorldState::as_array] is
/// `[i0, j0, i1, j1, …, gems…, alive…]` — fixed width for a given world.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WorldState {
    pub agents_positions: Vec<Position>,
    pub gems_collected: Vec<bool>,
    pub agents_alive: Vec<bool>,
}

impl WorldState {
    /// State with all agents alive.
    pub fn new(agents_positions: Vec<Position>, gems_collected: Vec<bool>) -> Self {
        let agents_alive = vec![true; agents_positions.len()];
        WorldState {
            agents_positions,
            gems_collected,
            agents_alive,
        }
    }

    pub fn with_alive(
        agents_positions: Vec<Position>,
        gems_collected: Vec<bool>,
        agents_alive: Vec<bool>,
    ) -> Self {
        WorldState {
            agents_positions,
            gems_collected,
            agents_alive,
        }
    }

    #[inline]
    pub fn n_agents(&self) -> usize {
        self.agents_positions.len()
    }

    #[inline]
    pub fn n_gems(&self) -> usize {
        self.gems_collected.len()
    }

    /// Length of the flat encoding for a world of this size.
    #[inline]
    pub const fn array_len(n_agents: usize, n_gems: usize) -> usize {
        2 * n_agents + n_gems + n_agents
    }

    /// Flat float encoding: positions, then gem flags, then alive flags.
    pub fn as_array(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(Self::array_len(self.n_agents(), self.n_gems()));
        for pos in &self.agents_positions {
            out.push(pos.i as f32);
            out.push(pos.j as f32);
        }
        out.extend(self.gems_collected.iter().map(|&c| if c { 1.0 } else { 0.0 }));
        out.extend(self.agents_alive.iter().map(|&a| if a { 1.0 } else { 0.0 }));
        out
    }

    /// Inverse of [`as_array`][WorldState::as_array].  Positions are rounded
    /// to the nearest cell; flags use a 0.5 threshold.
    pub fn from_array(data: &[f32], n_agents: usize, n_gems: usize) -> WorldResult<WorldState> {
        let expected = Self::array_len(n_agents, n_gems);
        if data.len() != expected {
            return Err(InvalidWorldState::WrongLength {
                what: "array elements",
                expected,
                got: data.len(),
            }
            .into());
        }

        let mut agents_positions = Vec::with_capacity(n_agents);
        for a in 0..n_agents {
            let i = data[2 * a].round().max(0.0) as usize;
            let j = data[2 * a + 1].round().max(0.0) as usize;
            agents_positions.push(Position::new(i, j));
        }
        let gems_collected = data[2 * n_agents..2 * n_agents + n_gems]
            .iter()
            .map(|&v| v >= 0.5)
            .collect();
        let agents_alive = data[2 * n_agents + n_gems..]
            .iter()
            .map(|&v| v >= 0.5)
            .collect();

        Ok(WorldState {
            agents_positions,
            gems_collected,
            agents_alive,
        })
    }
}
