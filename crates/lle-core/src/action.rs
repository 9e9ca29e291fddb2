//! Agent actions.
//!
//! Action indices are stable and part of the public interface: policies
//! trained against index `k` must keep meaning the same move across
//! versions.  Keep the discriminants explicit.

use std::str::FromStr;

use crate::direction::Direction;
use crate::error::CoreError;

/// One agent's move for a single step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Action {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    Stay = 4,
}

impl Action {
    /// Number of actions.
    pub const N: usize = 5;

    /// All actions in index order.
    pub const ALL: [Action; Action::N] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stay,
    ];

    /// The `(di, dj)` displacement; `Stay` is (0, 0).
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (-1, 0),
            Action::South => (1, 0),
            Action::East => (0, 1),
            Action::West => (0, -1),
            Action::Stay => (0, 0),
        }
    }

    /// Stable index of this action.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`][Action::index].
    pub fn from_index(index: usize) -> Result<Action, CoreError> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(CoreError::ActionIndex(index))
    }

    /// The direction this action moves in, if it moves at all.
    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::North => Some(Direction::North),
            Action::South => Some(Direction::South),
            Action::East => Some(Direction::East),
            Action::West => Some(Direction::West),
            Action::Stay => None,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Action::North,
            Direction::South => Action::South,
            Direction::East => Action::East,
            Direction::West => Action::West,
        }
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Action::North),
            "south" => Ok(Action::South),
            "east" => Ok(Action::East),
            "west" => Ok(Action::West),
            "stay" => Ok(Action::Stay),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stay => "Stay",
        };
        write!(f, "{name}")
    }
}
