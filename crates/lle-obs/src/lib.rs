//! `lle-obs` — feature generators for the Laser Learning Environment.
//!
//! Every generator is a variant of one [`Generator`] enum with a uniform
//! interface: `shape()` (per-agent) and `observe(&World)` returning a
//! [`Tensor`](lle_core::Tensor) of shape `(n_agents, *shape)`.  Generators
//! only ever read the world; none of them can fail at runtime.
//!
//! | Kind                   | Per-agent shape                 |
//! |------------------------|---------------------------------|
//! | `Layered`              | (2·n_agents + 4, H, W)          |
//! | `LayeredPadded(k)`     | (2·(n_agents+k) + 4, H, W)      |
//! | `Flattened`            | ((2·n_agents + 4)·H·W,)         |
//! | `Partial(k)`           | (2·n_agents + 3, k, k)          |
//! | `State`                | (3·n_agents + n_gems,)          |
//! | `NormalizedState`      | (3·n_agents + n_gems,)          |
//! | `RgbImage`             | (3, 160, 120)                   |
//! | `AgentZeroPerspective` | (2·n_agents + 4, H, W)          |

pub mod generator;
pub mod layered;
pub mod partial;
pub mod render;
pub mod state;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use generator::{Generator, GeneratorKind, UnknownGeneratorKind};
pub use layered::{LayeredGenerator, PerspectiveGenerator};
pub use partial::PartialGenerator;
pub use render::{BlockRenderer, Renderer, RgbBuffer, RgbImageGenerator};
pub use state::StateGenerator;
