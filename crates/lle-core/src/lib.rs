//! `lle-core` — foundational types for the Laser Learning Environment.
//!
//! This crate is a dependency of every other `lle-*` crate.  It intentionally
//! has no `lle-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `LaserId`                                   |
//! | [`pos`]       | `Position` (row, col) and delta arithmetic             |
//! | [`direction`] | `Direction` enum (N/S/E/W)                             |
//! | [`action`]    | `Action` enum with stable indices                      |
//! | [`tile`]      | `Tile` kinds and walkability                           |
//! | [`rng`]       | `WorldRng` (seedable, derivable)                       |
//! | [`tensor`]    | Dense row-major `f32` tensors for observations         |
//! | [`error`]     | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.          |

pub mod action;
pub mod direction;
pub mod error;
pub mod ids;
pub mod pos;
pub mod rng;
pub mod tensor;
pub mod tile;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::Action;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, LaserId};
pub use pos::Position;
pub use rng::WorldRng;
pub use tensor::Tensor;
pub use tile::Tile;
