//! Reward strategies.
//!
//! Strategies fold a step's events into a reward vector and keep the
//! arrival/death counters the episode-level bookkeeping needs.  They take a
//! read-only world handle at call time (only the shaped wrapper actually
//! reads it) and never fail.

use lle_world::{World, WorldEvent};

use crate::pbrs::PotentialShaped;

pub const REWARD_GEM: f32 = 1.0;
pub const REWARD_EXIT: f32 = 1.0;
pub const REWARD_DONE: f32 = 1.0;
pub const REWARD_DEATH: f32 = -1.0;

/// Component indices of the multi-objective reward vector.
pub const RW_GEM_IDX: usize = 0;
pub const RW_EXIT_IDX: usize = 1;
pub const RW_DEATH_IDX: usize = 2;
pub const RW_DONE_IDX: usize = 3;

// ── SingleObjective ───────────────────────────────────────────────────────────

/// Scalar reward: gems + exits + deaths, plus a completion bonus once every
/// agent has arrived.  Any death this step drops the gem/exit contributions
/// — the output is exactly the death sum.
pub struct SingleObjective {
    n_agents: usize,
    n_arrived: usize,
    n_deads: usize,
}

impl SingleObjective {
    pub fn new(n_agents: usize) -> Self {
        SingleObjective {
            n_agents,
            n_arrived: 0,
            n_deads: 0,
        }
    }

    pub fn reset(&mut self) {
        self.n_arrived = 0;
        self.n_deads = 0;
    }

    pub fn compute(&mut self, events: &[WorldEvent]) -> Vec<f32> {
        let mut reward = 0.0;
        let mut death_reward = 0.0;
        for event in events {
            match event {
                WorldEvent::AgentDied { .. } => {
                    death_reward += REWARD_DEATH;
                    self.n_deads += 1;
                }
                WorldEvent::GemCollected { .. } => reward += REWARD_GEM,
                WorldEvent::AgentExited { .. } => {
                    reward += REWARD_EXIT;
                    self.n_arrived += 1;
                }
            }
        }
        if death_reward != 0.0 {
            reward = death_reward;
        } else if self.n_arrived == self.n_agents {
            reward += REWARD_DONE;
        }
        vec![reward]
    }
}

// ── MultiObjective ────────────────────────────────────────────────────────────

/// Four-component reward `[gem, exit, death, done]`.  Death dominates: when
/// any agent dies this step, every non-death component is zeroed.
pub struct MultiObjective {
    n_agents: usize,
    n_arrived: usize,
    n_deads: usize,
}

impl MultiObjective {
    pub const N_OBJECTIVES: usize = 4;

    pub fn new(n_agents: usize) -> Self {
        MultiObjective {
            n_agents,
            n_arrived: 0,
            n_deads: 0,
        }
    }

    pub fn reset(&mut self) {
        self.n_arrived = 0;
        self.n_deads = 0;
    }

    pub fn compute(&mut self, events: &[WorldEvent]) -> Vec<f32> {
        let mut reward = vec![0.0; Self::N_OBJECTIVES];
        for event in events {
            match event {
                WorldEvent::AgentDied { .. } => {
                    reward[RW_DEATH_IDX] += REWARD_DEATH;
                    self.n_deads += 1;
                }
                WorldEvent::GemCollected { .. } => reward[RW_GEM_IDX] += REWARD_GEM,
                WorldEvent::AgentExited { .. } => {
                    reward[RW_EXIT_IDX] += REWARD_EXIT;
                    self.n_arrived += 1;
                }
            }
        }
        if reward[RW_DEATH_IDX] != 0.0 {
            let death = reward[RW_DEATH_IDX];
            reward.fill(0.0);
            reward[RW_DEATH_IDX] = death;
        } else if self.n_arrived == self.n_agents {
            reward[RW_DONE_IDX] += REWARD_DONE;
        }
        reward
    }
}

// ── RewardStrategy ────────────────────────────────────────────────────────────

/// The strategy the adapter holds: plain single, plain multi, or either of
/// them wrapped in potential-based shaping.
pub enum RewardStrategy {
    Single(SingleObjective),
    Multi(MultiObjective),
    Shaped(PotentialShaped),
}

impl RewardStrategy {
    /// Length of the reward vector this strategy produces.
    pub fn n_objectives(&self) -> usize {
        match self {
            RewardStrategy::Single(_) => 1,
            RewardStrategy::Multi(_) => MultiObjective::N_OBJECTIVES,
            RewardStrategy::Shaped(s) => s.n_objectives(),
        }
    }

    pub fn n_arrived(&self) -> usize {
        match self {
            RewardStrategy::Single(s) => s.n_arrived,
            RewardStrategy::Multi(s) => s.n_arrived,
            RewardStrategy::Shaped(s) => s.inner().n_arrived(),
        }
    }

    pub fn n_deads(&self) -> usize {
        match self {
            RewardStrategy::Single(s) => s.n_deads,
            RewardStrategy::Multi(s) => s.n_deads,
            RewardStrategy::Shaped(s) => s.inner().n_deads(),
        }
    }

    /// Clear counters and re-derive any potential from the current world.
    pub fn reset(&mut self, world: &World) {
        match self {
            RewardStrategy::Single(s) => s.reset(),
            RewardStrategy::Multi(s) => s.reset(),
            RewardStrategy::Shaped(s) => s.reset(world),
        }
    }

    /// Fold one step's events into a reward vector.
    pub fn compute(&mut self, world: &World, events: &[WorldEvent]) -> Vec<f32> {
        match self {
            RewardStrategy::Single(s) => s.compute(events),
            RewardStrategy::Multi(s) => s.compute(events),
            RewardStrategy::Shaped(s) => s.compute(world, events),
        }
    }
}
