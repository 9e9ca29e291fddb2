//! Potential-based reward shaping over laser subgoals.
//!
//! Φ(s) = v · #unreached (agent, source) pairs, where a pair is sticky:
//! once an agent has stood on any cell of a source's static beam path since
//! the last reset, it stays reached.  The per-step shaping term
//! γ·Φ(s_{t−1}) − Φ(s_t) telescopes, so it nudges agents through lasers
//! without changing the optimal policy.

use lle_core::{LaserId, Position};
use lle_world::{World, WorldEvent};
use rustc_hash::FxHashSet;

use crate::reward::RewardStrategy;

pub struct PotentialShaped {
    inner: Box<RewardStrategy>,
    gamma: f32,
    reward_value: f32,
    /// Tracked sources with their static beam cells.
    targets: Vec<(LaserId, FxHashSet<Position>)>,
    /// `reached[agent * targets.len() + source]`, sticky until reset.
    reached: Vec<bool>,
    n_agents: usize,
    /// Φ(s_{t−1}).
    phi: f32,
}

impl PotentialShaped {
    /// Wrap `inner`, rewarding the lasers in `lasers` (all of the world's
    /// sources when `None`).
    pub fn new(
        inner: RewardStrategy,
        world: &World,
        gamma: f32,
        reward_value: f32,
        lasers: Option<&[LaserId]>,
    ) -> Self {
        let ids: Vec<LaserId> = match lasers {
            Some(ids) => ids.to_vec(),
            None => world.sources().iter().map(|s| s.laser_id()).collect(),
        };
        let targets: Vec<(LaserId, FxHashSet<Position>)> = ids
            .iter()
            .map(|&id| (id, world.beam_path(id).iter().copied().collect()))
            .collect();

        let n_agents = world.n_agents();
        let reached = vec![false; n_agents * targets.len()];
        let phi = reward_value * reached.len() as f32;

        PotentialShaped {
            inner: Box::new(inner),
            gamma,
            reward_value,
            targets,
            reached,
            n_agents,
            phi,
        }
    }

    pub fn inner(&self) -> &RewardStrategy {
        &self.inner
    }

    #[inline]
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    #[inline]
    pub fn reward_value(&self) -> f32 {
        self.reward_value
    }

    /// One extra appended component for the multi-objective case.
    pub fn n_objectives(&self) -> usize {
        match *self.inner {
            RewardStrategy::Single(_) => 1,
            _ => self.inner.n_objectives() + 1,
        }
    }

    pub fn reset(&mut self, world: &World) {
        self.inner.reset(world);
        self.reached.fill(false);
        self.phi = self.reward_value * self.reached.len() as f32;
    }

    fn mark_reached(&mut self, world: &World) {
        for (a, &pos) in world.agents_positions().iter().enumerate() {
            for (t, (_, cells)) in self.targets.iter().enumerate() {
                if cells.contains(&pos) {
                    self.reached[a * self.targets.len() + t] = true;
                }
            }
        }
    }

    fn potential(&self) -> f32 {
        let unreached = self.reached.iter().filter(|&&r| !r).count();
        self.reward_value * unreached as f32
    }

    /// Inner reward plus the shaping term: added to the scalar for a
    /// single-objective inner, appended as an extra component otherwise.
    pub fn compute(&mut self, world: &World, events: &[WorldEvent]) -> Vec<f32> {
        let mut reward = self.inner.compute(world, events);

        self.mark_reached(world);
        let phi_now = self.potential();
        let shaping = self.gamma * self.phi - phi_now;
        self.phi = phi_now;

        match *self.inner {
            RewardStrategy::Single(_) => reward[0] += shaping,
            _ => reward.push(shaping),
        }
        reward
    }
}
