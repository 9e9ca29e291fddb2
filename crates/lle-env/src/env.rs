//! The RL environment adapter.
//!
//! Composes a world with an observation generator, a state generator, a
//! reward strategy and an extras generator into the usual
//! reset/step/seed/set_state surface.  The adapter owns the world; every
//! other component borrows it per call.

use tracing::debug;

use lle_core::{Action, AgentId, Tensor, WorldRng};
use lle_obs::Generator;
use lle_world::{World, WorldState};

use crate::error::{EnvError, EnvResult};
use crate::extras::ExtrasGenerator;
use crate::reward::RewardStrategy;

/// Seed-mixing offset for the adapter's own RNG stream (laser
/// randomisation), kept apart from the world's start sampling.
pub(crate) const ADAPTER_RNG_OFFSET: u64 = 1;

/// Draws attempted when laser randomisation would strand an agent on a
/// newly lethal beam before giving up and restoring the parsed colours.
const MAX_COLOUR_DRAWS: usize = 100;

// ── Step products ─────────────────────────────────────────────────────────────

/// What each agent gets to see.
pub struct Observation {
    /// `(n_agents, *shape)` features from the observation generator.
    pub data: Tensor,
    /// `(n_agents, extras_size)` auxiliary features.
    pub extras: Tensor,
    /// Per-agent legal actions, already filtered by the walkable-lasers
    /// policy.
    pub available_actions: Vec<Vec<Action>>,
}

/// Episode bookkeeping returned beside the reward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInfo {
    pub gems_collected: usize,
    pub exit_rate: f32,
}

/// The full product of one transition.
pub struct Step {
    pub observation: Observation,
    pub state: Vec<f32>,
    pub reward: Vec<f32>,
    pub done: bool,
    pub info: StepInfo,
}

// ── How an episode reacts to death ────────────────────────────────────────────

/// Respawn is declared for forward compatibility and rejected at build
/// time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeathStrategy {
    #[default]
    End,
    Respawn,
}

impl std::str::FromStr for DeathStrategy {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end" => Ok(DeathStrategy::End),
            "respawn" => Ok(DeathStrategy::Respawn),
            other => Err(EnvError::UnknownDeathStrategy(other.to_string())),
        }
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// An RL-ready environment.  Build one with
/// [`EnvBuilder`](crate::EnvBuilder).
pub struct Environment {
    pub(crate) name: String,
    pub(crate) world: World,
    pub(crate) observation: Generator,
    pub(crate) state: Generator,
    pub(crate) reward: RewardStrategy,
    pub(crate) extras: ExtrasGenerator,
    pub(crate) walkable_lasers: bool,
    pub(crate) randomize_lasers: bool,
    /// Colours as parsed, restored when a random draw cannot be made safe.
    pub(crate) parsed_colours: Vec<AgentId>,
    pub(crate) rng: WorldRng,
    pub(crate) done: bool,
}

impl Environment {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn n_agents(&self) -> usize {
        self.world.n_agents()
    }

    #[inline]
    pub fn n_actions(&self) -> usize {
        Action::N
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Per-agent observation shape.
    pub fn observation_shape(&self) -> Vec<usize> {
        self.observation.shape()
    }

    /// Flat state shape.
    pub fn state_shape(&self) -> Vec<usize> {
        self.state.shape()
    }

    /// Length of the reward vector.
    pub fn reward_size(&self) -> usize {
        self.reward.n_objectives()
    }

    /// Extras width per agent.
    pub fn extras_size(&self) -> usize {
        self.extras.size()
    }

    // ── Observation surface ───────────────────────────────────────────────

    /// World availability, minus moves into a lit foreign beam when
    /// `walkable_lasers` is off.
    pub fn available_actions(&self) -> Vec<Vec<Action>> {
        let available = self.world.available_actions();
        if self.walkable_lasers {
            return available;
        }
        available
            .into_iter()
            .enumerate()
            .map(|(a, actions)| {
                let from = self.world.agents_positions()[a];
                actions
                    .into_iter()
                    .filter(|&action| {
                        let target = from
                            .checked_shift(action.delta())
                            .unwrap_or(from);
                        !self.world.is_lethal_for(target, AgentId(a as u32))
                    })
                    .collect()
            })
            .collect()
    }

    /// Materialise the current observation (features, extras, availability).
    pub fn get_observation(&mut self) -> Observation {
        Observation {
            data: self.observation.observe(&self.world),
            extras: self.extras.compute(&self.world),
            available_actions: self.available_actions(),
        }
    }

    /// The flat state vector: the state generator's view of agent 0.
    pub fn get_state(&self) -> Vec<f32> {
        self.state.observe(&self.world).slice(0).to_vec()
    }

    fn info(&self) -> StepInfo {
        StepInfo {
            gems_collected: self.world.gems_collected(),
            exit_rate: self.reward.n_arrived() as f32 / self.n_agents() as f32,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Apply one joint action.  World errors surface unchanged and leave
    /// both the world and the adapter untouched.
    ///
    /// The reward strategy keeps the episode's arrival and death counters
    /// while folding the events; `done` and `exit_rate` read them back.
    pub fn step(&mut self, actions: &[Action]) -> EnvResult<Step> {
        let events = self.world.step(actions)?;
        let reward = self.reward.compute(&self.world, &events);
        self.done =
            self.reward.n_deads() > 0 || self.reward.n_arrived() == self.n_agents();

        Ok(Step {
            observation: self.get_observation(),
            state: self.get_state(),
            reward,
            done: self.done,
            info: self.info(),
        })
    }

    /// Start a fresh episode.
    pub fn reset(&mut self) -> (Observation, Vec<f32>) {
        self.world.reset();
        if self.randomize_lasers {
            self.randomize_laser_colours();
        }
        self.reward.reset(&self.world);
        self.extras.reset();
        self.done = false;
        debug!(name = %self.name, "environment reset");
        (self.get_observation(), self.get_state())
    }

    /// Redraw every source colour uniformly over the agent ids.  A draw
    /// that would leave an agent standing on a lethal beam is retried; if
    /// no safe draw is found the parsed colours are restored.
    fn randomize_laser_colours(&mut self) {
        let n_agents = self.n_agents() as u32;
        let laser_ids: Vec<_> = self.world.sources().iter().map(|s| s.laser_id()).collect();

        for _ in 0..MAX_COLOUR_DRAWS {
            for &laser in &laser_ids {
                let colour = AgentId(self.rng.gen_range(0..n_agents));
                self.world.set_source_colour(laser, colour);
            }
            let safe = !(0..self.n_agents()).any(|a| {
                self.world
                    .is_lethal_for(self.world.agents_positions()[a], AgentId(a as u32))
            });
            if safe {
                return;
            }
        }
        for (&laser, &colour) in laser_ids.iter().zip(&self.parsed_colours) {
            self.world.set_source_colour(laser, colour);
        }
    }

    /// Force the world into a snapshot and rebuild the episode bookkeeping
    /// from the events it implies.
    ///
    /// `set_state` emits no death events (lethal placements are refused),
    /// so `done` is taken from the world itself rather than the strategy's
    /// death counter.
    pub fn set_state(&mut self, state: &WorldState) -> EnvResult<()> {
        let events = self.world.set_state(state)?;
        self.reward.reset(&self.world);
        let _ = self.reward.compute(&self.world, &events);
        self.done = self.world.is_terminal();
        Ok(())
    }

    /// [`set_state`](Environment::set_state) from a feature vector of the
    /// configured state generator.
    pub fn set_state_vec(&mut self, data: &[f32]) -> EnvResult<()> {
        let state = self
            .state
            .to_world_state(data)
            .ok_or(EnvError::StateNotDecodable)??;
        self.set_state(&state)
    }

    /// Reseed world and adapter; the next episodes become a reproducible
    /// function of the seed.
    pub fn seed(&mut self, seed: u64) {
        self.world.seed(seed);
        self.rng = WorldRng::derived(seed, ADAPTER_RNG_OFFSET);
    }

    /// Render the current world through a caller-supplied renderer.
    pub fn get_image(&self, renderer: &dyn lle_obs::Renderer) -> lle_obs::RgbBuffer {
        renderer.render(&self.world)
    }
}
