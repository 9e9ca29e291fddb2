//! `lle-world` — the world engine of the Laser Learning Environment.
//!
//! A deterministic, cooperative multi-agent gridworld: agents move on a 2D
//! grid of walls, gems, exits, void and coloured laser beams.  A beam kills
//! any agent of a different colour standing on a lit cell; an agent of the
//! beam's own colour blocks it, which is the central coordination mechanic.
//!
//! # Module map
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`grid`]  | Static topology                                           |
//! | [`laser`] | `LaserSource`, `Beam`, beam tracing and relighting        |
//! | [`agent`] | `Agent` flags, `Gem`                                      |
//! | [`event`] | `WorldEvent`                                              |
//! | [`state`] | `WorldState` value type and its flat float encoding       |
//! | [`world`] | The `World` state machine                                 |
//! | [`error`] | `WorldError` and the rejection kinds                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lle_core::Action;
//! use lle_world::World;
//!
//! let mut world = World::from_str("S0 G X")?;
//! world.reset();
//! let events = world.step(&[Action::East])?;   // collects the gem
//! ```

pub mod agent;
pub mod error;
pub mod event;
pub mod grid;
pub mod laser;
pub mod state;
pub mod world;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, Gem};
pub use error::{InvalidAction, InvalidWorldState, WorldError, WorldResult};
pub use event::WorldEvent;
pub use grid::Grid;
pub use laser::{Beam, LaserSource};
pub use state::WorldState;
pub use world::World;
