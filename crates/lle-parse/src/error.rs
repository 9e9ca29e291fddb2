//! Parse-stage error type.
//!
//! Everything that can go wrong between raw map text and a validated
//! [`WorldConfig`][crate::WorldConfig] lives here, including the
//! lethal-start check that `lle-world` performs once beams are known.

use lle_core::{AgentId, CoreError, LaserId, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("the map is empty")]
    EmptyMap,

    #[error("row {row} has {got} tiles but previous rows have {expected}")]
    InconsistentRowLength {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("unknown token {token:?} at row {row}, column {col}")]
    UnknownToken {
        token: String,
        row: usize,
        col: usize,
    },

    #[error("the map declares no agent")]
    NoAgents,

    #[error("agent {0} has no start position")]
    AgentWithoutStart(usize),

    #[error("not enough exits: {exits} exit(s) for {agents} agent(s)")]
    NotEnoughExits { exits: usize, agents: usize },

    #[error("start position {pos} of agent {agent} is a void tile")]
    StartOnVoid { agent: usize, pos: Position },

    #[error(
        "start position {pos} of agent {agent} lies on the beam of {laser} (colour {colour})"
    )]
    LethalStartPosition {
        agent: usize,
        pos: Position,
        laser: LaserId,
        colour: AgentId,
    },

    #[error("position {pos} is out of bounds for a {height}x{width} map")]
    OutOfBounds {
        pos: Position,
        height: usize,
        width: usize,
    },

    #[error("cannot place {what} at {pos}: the cell is not floor")]
    OccupiedCell { what: &'static str, pos: Position },

    #[error("world_string is {got_height}x{got_width} but the table declares {height}x{width}")]
    DimensionMismatch {
        height: usize,
        width: usize,
        got_height: usize,
        got_width: usize,
    },

    #[error("invalid level {0}: levels range from 1 to {max}", max = crate::N_LEVELS)]
    InvalidLevel(usize),

    #[error("invalid TOML map: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Shorthand result type for `lle-parse`.
pub type ParseResult<T> = Result<T, ParseError>;
