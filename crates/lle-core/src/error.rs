//! Core error type.
//!
//! Sub-crates define their own error enums (`ParseError`, `WorldError`,
//! `EnvError`) and convert `CoreError` into them via `From` impls where it
//! can surface.

use thiserror::Error;

/// Errors from the foundational types themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown direction {0:?} (expected one of N, S, E, W)")]
    UnknownDirection(String),

    #[error("unknown action {0:?}")]
    UnknownAction(String),

    #[error("action index {0} out of range (max {max})", max = crate::Action::N - 1)]
    ActionIndex(usize),
}

/// Shorthand result type for `lle-core`.
pub type CoreResult<T> = Result<T, CoreError>;
