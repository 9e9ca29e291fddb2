//! Agent liveness and arrival state.
//!
//! Positions live on the world in a parallel `Vec<Position>` indexed by
//! `AgentId`, so observation code can borrow all positions at once without
//! touching agent flags.

use lle_core::AgentId;

/// One agent's dynamic flags.  Dead implies not alive; arrived agents are
/// frozen on their exit tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    alive: bool,
    arrived: bool,
}

impl Agent {
    pub(crate) fn new(id: AgentId) -> Self {
        Agent {
            id,
            alive: true,
            arrived: false,
        }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    #[inline]
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub(crate) fn die(&mut self) {
        self.alive = false;
    }

    pub(crate) fn arrive(&mut self) {
        self.arrived = true;
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub(crate) fn set_arrived(&mut self, arrived: bool) {
        self.arrived = arrived;
    }
}

/// A collectable.  Reset to uncollected on `World::reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gem {
    pos: lle_core::Position,
    collected: bool,
}

impl Gem {
    pub(crate) fn new(pos: lle_core::Position) -> Self {
        Gem {
            pos,
            collected: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> lle_core::Position {
        self.pos
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub(crate) fn collect(&mut self) {
        self.collected = true;
    }

    pub(crate) fn set_collected(&mut self, collected: bool) {
        self.collected = collected;
    }
}
