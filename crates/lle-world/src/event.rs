//! Discrete facts emitted by a transition.

use lle_core::{AgentId, Position};

/// Something that happened during `step` or `set_state`.
///
/// Events come out in a fixed order: tile effects in ascending agent id
/// (gem pickups, exits, void deaths), then laser deaths in ascending agent
/// id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    GemCollected { agent: AgentId, pos: Position },
    AgentExited { agent: AgentId },
    AgentDied { agent: AgentId },
}

impl WorldEvent {
    /// The agent this event concerns.
    #[inline]
    pub fn agent(&self) -> AgentId {
        match *self {
            WorldEvent::GemCollected { agent, .. }
            | WorldEvent::AgentExited { agent }
            | WorldEvent::AgentDied { agent } => agent,
        }
    }

    #[inline]
    pub fn is_death(&self) -> bool {
        matches!(self, WorldEvent::AgentDied { .. })
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        matches!(self, WorldEvent::AgentExited { .. })
    }
}
