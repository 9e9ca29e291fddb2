//! Adapter-stage error type.
//!
//! Step-time failures are world errors and pass through unchanged (the step
//! is atomic); everything else here is a configuration mistake caught at
//! build time.

use lle_core::Position;
use lle_obs::UnknownGeneratorKind;
use lle_parse::ParseError;
use lle_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("the respawn death strategy is declared but not implemented; use \"end\"")]
    RespawnNotImplemented,

    #[error("unknown death strategy {0:?} (expected \"end\" or \"respawn\")")]
    UnknownDeathStrategy(String),

    #[error(
        "cannot switch objective after reward shaping: call single_objective() or \
         multi_objective() before pbrs()"
    )]
    ObjectiveAfterShaping,

    #[error("unknown extras generator {0:?}")]
    UnknownExtras(String),

    #[error("no laser source at {0}")]
    NoSuchLaser(Position),

    #[error("the configured state generator cannot decode feature vectors")]
    StateNotDecodable,

    #[error(transparent)]
    UnknownGenerator(#[from] UnknownGeneratorKind),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Shorthand result type for `lle-env`.
pub type EnvResult<T> = Result<T, EnvError>;
