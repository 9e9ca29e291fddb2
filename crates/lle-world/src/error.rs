//! World-stage error types.
//!
//! The two rejection kinds the engine can produce — an illegal joint action
//! and an unrepresentable forced state — get their own enums so callers can
//! match on the reason without string inspection.  Parse errors pass through
//! unchanged.

use lle_core::{Action, AgentId, Position};
use lle_parse::ParseError;
use thiserror::Error;

/// Why a joint action was refused.  The step is atomic: whenever one of
/// these is returned, the world is bit-for-bit unchanged.
#[derive(Debug, Error)]
pub enum InvalidAction {
    #[error("expected {expected} actions, got {got}")]
    WrongNumberOfActions { expected: usize, got: usize },

    #[error("the world is terminal; reset it before stepping")]
    WorldIsDone,

    #[error("agent {agent} cannot do {action} from {pos}")]
    Unavailable {
        agent: AgentId,
        action: Action,
        pos: Position,
    },

    #[error("agents {a} and {b} would swap positions")]
    SwapConflict { a: AgentId, b: AgentId },

    #[error("agents {a} and {b} would both end up at {pos}")]
    VertexConflict {
        a: AgentId,
        b: AgentId,
        pos: Position,
    },
}

/// Why a forced state was refused by `set_state`.
#[derive(Debug, Error)]
pub enum InvalidWorldState {
    #[error("state has {got} {what}, world has {expected}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("agent {agent} placed out of bounds at {pos}")]
    OutOfBounds { agent: AgentId, pos: Position },

    #[error("agent {agent} placed on a non-walkable cell at {pos}")]
    NotWalkable { agent: AgentId, pos: Position },

    #[error("agents {a} and {b} both placed at {pos}")]
    Overlap {
        a: AgentId,
        b: AgentId,
        pos: Position,
    },

    #[error("agent {agent} placed on a lethal beam at {pos}")]
    LethalPlacement { agent: AgentId, pos: Position },
}

/// Top-level error type for `lle-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),

    #[error("invalid world state: {0}")]
    InvalidWorldState(#[from] InvalidWorldState),

    #[error("position {pos} is out of bounds for a {height}x{width} world")]
    OutOfBounds {
        pos: Position,
        height: usize,
        width: usize,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Shorthand result type for `lle-world`.
pub type WorldResult<T> = Result<T, WorldError>;
