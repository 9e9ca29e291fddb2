//! Flat state-vector generators.
//!
//! The encoding matches [`WorldState::as_array`]: agent positions, gem
//! flags, alive flags.  The normalised variant divides row/col by (H, W) so
//! entries stay in [0, 1] across map sizes.  Both support `to_world_state`
//! as a partial inverse, which is what lets the environment adapter accept
//! a plain feature vector in `set_state`.

use lle_core::Tensor;
use lle_world::{World, WorldResult, WorldState};

pub struct StateGenerator {
    n_agents: usize,
    n_gems: usize,
    height: usize,
    width: usize,
    normalized: bool,
    shape: Vec<usize>,
}

impl StateGenerator {
    pub fn new(world: &World, normalized: bool) -> Self {
        let n_agents = world.n_agents();
        let n_gems = world.n_gems();
        StateGenerator {
            n_agents,
            n_gems,
            height: world.height(),
            width: world.width(),
            normalized,
            shape: vec![WorldState::array_len(n_agents, n_gems)],
        }
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of one agent's block in the position section.
    pub const fn unit_size() -> usize {
        2
    }

    pub fn observe(&self, world: &World) -> Tensor {
        let mut array = world.get_state().as_array();
        if self.normalized {
            for (k, value) in array[..2 * self.n_agents].iter_mut().enumerate() {
                let extent = if k % 2 == 0 { self.height } else { self.width };
                *value /= extent as f32;
            }
        }
        Tensor::from_data(&self.shape, array).tile(self.n_agents)
    }

    /// Decode a feature vector back into a [`WorldState`].
    pub fn to_world_state(&self, data: &[f32]) -> WorldResult<WorldState> {
        if self.normalized {
            let mut denormalized = data.to_vec();
            for (k, value) in denormalized
                .iter_mut()
                .take(2 * self.n_agents)
                .enumerate()
            {
                let extent = if k % 2 == 0 { self.height } else { self.width };
                *value *= extent as f32;
            }
            WorldState::from_array(&denormalized, self.n_agents, self.n_gems)
        } else {
            WorldState::from_array(data, self.n_agents, self.n_gems)
        }
    }
}
