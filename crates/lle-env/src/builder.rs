//! Fluent builder for [`Environment`].
//!
//! # Example
//!
//! ```rust,ignore
//! let mut env = EnvBuilder::level(6)?
//!     .obs_type(GeneratorKind::Layered)
//!     .multi_objective()
//!     .pbrs(0.99, 0.5, None, true)
//!     .randomize_lasers()
//!     .build()?;
//! let (obs, state) = env.reset();
//! ```
//!
//! Option validation happens at `build()`: the builder itself never fails,
//! so chains stay clean.

use std::path::Path;
use std::str::FromStr;

use lle_core::{LaserId, Position, WorldRng};
use lle_obs::{Generator, GeneratorKind};
use lle_world::World;

use crate::env::{DeathStrategy, Environment};
use crate::error::{EnvError, EnvResult};
use crate::extras::{ExtrasGenerator, LaserSubgoal, NoExtras};
use crate::pbrs::PotentialShaped;
use crate::reward::{MultiObjective, RewardStrategy, SingleObjective};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
enum Objective {
    #[default]
    Single,
    Multi,
}

struct PbrsConfig {
    gamma: f32,
    reward_value: f32,
    /// `None` rewards every laser in the world.
    lasers: Option<Vec<Position>>,
    with_extras: bool,
    /// Objective selected when `pbrs` was called; changing it afterwards is
    /// a build error.
    objective_at_call: Objective,
}

/// What `add_extras` accepted; resolved against the world at build time.
pub enum ExtrasSpec {
    Named(String),
    LaserSubgoal,
    Custom(ExtrasGenerator),
}

impl From<&str> for ExtrasSpec {
    fn from(name: &str) -> Self {
        ExtrasSpec::Named(name.to_string())
    }
}

impl From<ExtrasGenerator> for ExtrasSpec {
    fn from(generator: ExtrasGenerator) -> Self {
        ExtrasSpec::Custom(generator)
    }
}

pub struct EnvBuilder {
    world: World,
    name: String,
    obs_kind: GeneratorKind,
    state_kind: GeneratorKind,
    death_strategy: DeathStrategy,
    walkable_lasers: bool,
    objective: Objective,
    pbrs: Option<PbrsConfig>,
    randomize_lasers: bool,
    extras: Vec<ExtrasSpec>,
}

impl EnvBuilder {
    /// Wrap an already-built world.
    pub fn new(world: World) -> Self {
        EnvBuilder {
            world,
            name: "LLE".to_string(),
            obs_kind: GeneratorKind::Layered,
            state_kind: GeneratorKind::State,
            death_strategy: DeathStrategy::End,
            walkable_lasers: true,
            objective: Objective::Single,
            pbrs: None,
            randomize_lasers: false,
            extras: Vec::new(),
        }
    }

    /// Parse a map (either format) and start a builder on it.
    pub fn from_str(map: &str) -> EnvResult<Self> {
        Ok(EnvBuilder::new(World::from_str(map)?))
    }

    /// Load a map file and start a builder named after it.
    pub fn from_file(path: impl AsRef<Path>) -> EnvResult<Self> {
        let path = path.as_ref();
        let world = World::from_file(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "LLE".to_string(), |f| format!("LLE-{}", f.to_string_lossy()));
        Ok(EnvBuilder::new(world).name(name))
    }

    /// Start a builder on a level preset, named `LLE-lvl<n>`.
    pub fn level(n: usize) -> EnvResult<Self> {
        Ok(EnvBuilder::new(World::level(n)?).name(format!("LLE-lvl{n}")))
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Observation generator (default: layered).
    pub fn obs_type(mut self, kind: GeneratorKind) -> Self {
        self.obs_kind = kind;
        self
    }

    /// State generator (default: the flat state vector).
    pub fn state_type(mut self, kind: GeneratorKind) -> Self {
        self.state_kind = kind;
        self
    }

    /// What a death does to the episode; `"respawn"` is reserved and
    /// rejected at build time.
    pub fn death_strategy(mut self, strategy: DeathStrategy) -> Self {
        self.death_strategy = strategy;
        self
    }

    /// Whether agents may step into lit foreign beams (default: true).
    /// When off, such moves disappear from `available_actions`.
    pub fn walkable_lasers(mut self, walkable: bool) -> Self {
        self.walkable_lasers = walkable;
        self
    }

    /// Identifier tag carried into logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Scalar reward (the default).
    pub fn single_objective(mut self) -> Self {
        self.objective = Objective::Single;
        self
    }

    /// Four-component `[gem, exit, death, done]` reward.
    pub fn multi_objective(mut self) -> Self {
        self.objective = Objective::Multi;
        self
    }

    /// Add potential-based reward shaping over laser subgoals.
    ///
    /// `lasers_to_reward` selects sources by position (`None` = all);
    /// `with_extras` also exposes the matching subgoal flags as extras.
    /// Call `single_objective`/`multi_objective` first: switching the
    /// objective after shaping is a build error.
    pub fn pbrs(
        mut self,
        gamma: f32,
        reward_value: f32,
        lasers_to_reward: Option<&[Position]>,
        with_extras: bool,
    ) -> Self {
        self.pbrs = Some(PbrsConfig {
            gamma,
            reward_value,
            lasers: lasers_to_reward.map(<[Position]>::to_vec),
            with_extras,
            objective_at_call: self.objective,
        });
        self
    }

    /// Redraw every source colour uniformly over the agent ids at each
    /// reset.
    pub fn randomize_lasers(mut self) -> Self {
        self.randomize_lasers = true;
        self
    }

    /// Attach an extras generator: a name (`"laser_subgoal"`) or a concrete
    /// [`ExtrasGenerator`].
    pub fn add_extras(mut self, extras: impl Into<ExtrasSpec>) -> Self {
        self.extras.push(extras.into());
        self
    }

    // ── Assembly ──────────────────────────────────────────────────────────

    /// Validate the configuration and assemble the environment.
    pub fn build(self) -> EnvResult<Environment> {
        if self.death_strategy == DeathStrategy::Respawn {
            return Err(EnvError::RespawnNotImplemented);
        }

        let world = self.world;
        let n_agents = world.n_agents();
        let mut name = self.name;

        // ── Reward strategy ───────────────────────────────────────────────
        let mut strategy = match self.objective {
            Objective::Single => RewardStrategy::Single(SingleObjective::new(n_agents)),
            Objective::Multi => {
                name.push_str("-MO");
                RewardStrategy::Multi(MultiObjective::new(n_agents))
            }
        };

        let mut extras_specs = self.extras;
        if let Some(pbrs) = self.pbrs {
            if pbrs.objective_at_call != self.objective {
                return Err(EnvError::ObjectiveAfterShaping);
            }
            let lasers = match &pbrs.lasers {
                None => None,
                Some(positions) => Some(resolve_lasers(&world, positions)?),
            };
            if pbrs.with_extras {
                extras_specs.push(ExtrasSpec::Custom(ExtrasGenerator::LaserSubgoal(
                    LaserSubgoal::new(&world, lasers.as_deref()),
                )));
            }
            strategy = RewardStrategy::Shaped(PotentialShaped::new(
                strategy,
                &world,
                pbrs.gamma,
                pbrs.reward_value,
                lasers.as_deref(),
            ));
            name.push_str("-PBRS");
        }

        // ── Extras ────────────────────────────────────────────────────────
        let mut extras: Vec<ExtrasGenerator> = Vec::new();
        for spec in extras_specs {
            extras.push(match spec {
                ExtrasSpec::LaserSubgoal => {
                    ExtrasGenerator::LaserSubgoal(LaserSubgoal::new(&world, None))
                }
                ExtrasSpec::Named(tag) => match tag.as_str() {
                    "laser_subgoal" => {
                        ExtrasGenerator::LaserSubgoal(LaserSubgoal::new(&world, None))
                    }
                    other => return Err(EnvError::UnknownExtras(other.to_string())),
                },
                ExtrasSpec::Custom(generator) => generator,
            });
        }
        let extras = match extras.len() {
            0 => ExtrasGenerator::None(NoExtras::new(n_agents)),
            1 => extras.remove(0),
            _ => ExtrasGenerator::Multi(extras),
        };

        // ── Generators and final assembly ─────────────────────────────────
        let observation = Generator::build(self.obs_kind, &world);
        let state = Generator::build(self.state_kind, &world);
        let parsed_colours = world.sources().iter().map(|s| s.colour()).collect();
        let seed = world.current_seed();

        let mut env = Environment {
            name,
            world,
            observation,
            state,
            reward: strategy,
            extras,
            walkable_lasers: self.walkable_lasers,
            randomize_lasers: self.randomize_lasers,
            parsed_colours,
            rng: WorldRng::derived(seed, crate::env::ADAPTER_RNG_OFFSET),
            done: false,
        };
        env.reward.reset(&env.world);
        Ok(env)
    }
}

/// Death-strategy convenience so callers can pass the builder strings from
/// configuration files.
impl EnvBuilder {
    pub fn death_strategy_str(self, strategy: &str) -> EnvResult<Self> {
        Ok(self.death_strategy(DeathStrategy::from_str(strategy)?))
    }

    pub fn obs_type_str(self, kind: &str) -> EnvResult<Self> {
        Ok(self.obs_type(kind.parse()?))
    }

    pub fn state_type_str(self, kind: &str) -> EnvResult<Self> {
        Ok(self.state_type(kind.parse()?))
    }
}

fn resolve_lasers(world: &World, positions: &[Position]) -> EnvResult<Vec<LaserId>> {
    positions
        .iter()
        .map(|&pos| {
            world
                .source_at(pos)
                .map(|s| s.laser_id())
                .ok_or(EnvError::NoSuchLaser(pos))
        })
        .collect()
}
