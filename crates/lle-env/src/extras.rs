//! Extras generators: auxiliary per-agent features next to the main
//! observation.
//!
//! Like the observation kinds, the set is closed and dispatch is a tagged
//! enum.  `compute` is allowed to mutate (the laser-subgoal flags are
//! sticky) but never fails.

use lle_core::{LaserId, Position, Tensor};
use lle_world::World;
use rustc_hash::FxHashSet;

// ── NoExtras ──────────────────────────────────────────────────────────────────

/// Zero-width extras: an (n_agents, 0) tensor.
pub struct NoExtras {
    n_agents: usize,
}

impl NoExtras {
    pub fn new(n_agents: usize) -> Self {
        NoExtras { n_agents }
    }
}

// ── LaserSubgoal ──────────────────────────────────────────────────────────────

/// One flag per tracked source per agent; a flag turns 1 once the agent has
/// ever stood on that source's beam path since the last reset.
pub struct LaserSubgoal {
    n_agents: usize,
    targets: Vec<(LaserId, FxHashSet<Position>)>,
    /// `reached[agent * targets.len() + source]`.
    reached: Vec<bool>,
    meanings: Vec<String>,
}

impl LaserSubgoal {
    /// Track the given sources (all of the world's sources when `None`).
    pub fn new(world: &World, lasers: Option<&[LaserId]>) -> Self {
        let ids: Vec<LaserId> = match lasers {
            Some(ids) => ids.to_vec(),
            None => world.sources().iter().map(|s| s.laser_id()).collect(),
        };
        let targets: Vec<(LaserId, FxHashSet<Position>)> = ids
            .iter()
            .map(|&id| (id, world.beam_path(id).iter().copied().collect()))
            .collect();
        let meanings = ids
            .iter()
            .map(|id| {
                let source = &world.sources()[id.index()];
                format!("{} reached at {}", source.laser_id(), source.pos())
            })
            .collect();

        let n_agents = world.n_agents();
        LaserSubgoal {
            n_agents,
            reached: vec![false; n_agents * targets.len()],
            targets,
            meanings,
        }
    }

    fn compute(&mut self, world: &World) -> Tensor {
        for (a, &pos) in world.agents_positions().iter().enumerate() {
            for (t, (_, cells)) in self.targets.iter().enumerate() {
                if cells.contains(&pos) {
                    self.reached[a * self.targets.len() + t] = true;
                }
            }
        }
        let data = self
            .reached
            .iter()
            .map(|&r| if r { 1.0 } else { 0.0 })
            .collect();
        Tensor::from_data(&[self.n_agents, self.targets.len()], data)
    }
}

// ── ExtrasGenerator ───────────────────────────────────────────────────────────

/// The extras the adapter holds.  `Multi` concatenates its children along
/// the feature axis.
pub enum ExtrasGenerator {
    None(NoExtras),
    LaserSubgoal(LaserSubgoal),
    Multi(Vec<ExtrasGenerator>),
}

impl ExtrasGenerator {
    pub fn none(n_agents: usize) -> Self {
        ExtrasGenerator::None(NoExtras::new(n_agents))
    }

    /// Feature width per agent.
    pub fn size(&self) -> usize {
        match self {
            ExtrasGenerator::None(_) => 0,
            ExtrasGenerator::LaserSubgoal(g) => g.targets.len(),
            ExtrasGenerator::Multi(children) => children.iter().map(ExtrasGenerator::size).sum(),
        }
    }

    /// Human-readable label for each feature column.
    pub fn meanings(&self) -> Vec<String> {
        match self {
            ExtrasGenerator::None(_) => vec![],
            ExtrasGenerator::LaserSubgoal(g) => g.meanings.clone(),
            ExtrasGenerator::Multi(children) => {
                children.iter().flat_map(ExtrasGenerator::meanings).collect()
            }
        }
    }

    /// Materialise the (n_agents, size) extras for the current world.
    pub fn compute(&mut self, world: &World) -> Tensor {
        let n_agents = world.n_agents();
        match self {
            ExtrasGenerator::None(g) => Tensor::zeros(&[g.n_agents, 0]),
            ExtrasGenerator::LaserSubgoal(g) => g.compute(world),
            ExtrasGenerator::Multi(children) => {
                let parts: Vec<Tensor> = children.iter_mut().map(|c| c.compute(world)).collect();
                let width: usize = parts.iter().map(|p| p.shape()[1]).sum();
                let mut out = Tensor::zeros(&[n_agents, width]);
                for a in 0..n_agents {
                    let row = out.slice_mut(a);
                    let mut offset = 0;
                    for part in &parts {
                        let chunk = part.slice(a);
                        row[offset..offset + chunk.len()].copy_from_slice(chunk);
                        offset += chunk.len();
                    }
                }
                out
            }
        }
    }

    /// Clear sticky state.
    pub fn reset(&mut self) {
        match self {
            ExtrasGenerator::None(_) => {}
            ExtrasGenerator::LaserSubgoal(g) => g.reached.fill(false),
            ExtrasGenerator::Multi(children) => children.iter_mut().for_each(ExtrasGenerator::reset),
        }
    }
}
