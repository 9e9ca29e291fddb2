//! `lle-env` — the RL-ready face of the Laser Learning Environment.
//!
//! # Composition
//!
//! ```text
//! EnvBuilder ──build()──► Environment
//!                           ├─ World            (owned)
//!                           ├─ Generator ×2     (observation + state)
//!                           ├─ RewardStrategy   (single / multi / shaped)
//!                           └─ ExtrasGenerator  (none / laser subgoals / multi)
//! ```
//!
//! Each `step` forwards the joint action to the world, folds the emitted
//! events into a reward vector, and materialises fresh observation, state
//! and extras tensors.  `done` is raised when an agent dies or everyone
//! has arrived.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lle_core::Action;
//! use lle_env::EnvBuilder;
//!
//! let mut env = EnvBuilder::from_str("S0 G X")?.build()?;
//! env.reset();
//! let step = env.step(&[Action::East])?;   // reward [1.0]: the gem
//! ```

pub mod builder;
pub mod env;
pub mod error;
pub mod extras;
pub mod pbrs;
pub mod reward;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{EnvBuilder, ExtrasSpec};
pub use env::{DeathStrategy, Environment, Observation, Step, StepInfo};
pub use error::{EnvError, EnvResult};
pub use extras::{ExtrasGenerator, LaserSubgoal, NoExtras};
pub use pbrs::PotentialShaped;
pub use reward::{
    MultiObjective, REWARD_DEATH, REWARD_DONE, REWARD_EXIT, REWARD_GEM, RW_DEATH_IDX, RW_DONE_IDX,
    RW_EXIT_IDX, RW_GEM_IDX, RewardStrategy, SingleObjective,
};
