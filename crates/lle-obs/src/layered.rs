//! Full-map layered observations.
//!
//! Channel order, with `m = n_agents + padding` slots:
//!
//! | Channels        | Content                                        |
//! |-----------------|------------------------------------------------|
//! | `0 .. m`        | 1 at agent i's cell                            |
//! | `m`             | 1 at walls *and* at source housings            |
//! | `m+1 .. 2m+1`   | −1 at sources of colour c, +1 at lit cells     |
//! | `2m+1`          | 1 at void                                      |
//! | `2m+2`          | 1 at uncollected gems                          |
//! | `2m+3`          | 1 at exits                                     |
//!
//! Walls, void and exits never change, so they are painted once at
//! construction and cloned per observation.  Source markers are repainted
//! every call because laser randomisation can recolour them between
//! resets.

use lle_core::Tensor;
use lle_world::World;

pub struct LayeredGenerator {
    n_agents: usize,
    /// Agent/laser channel-group width: `n_agents` plus phantom padding.
    n_slots: usize,
    height: usize,
    width: usize,
    shape: Vec<usize>,
    /// Walls, void and exits, prefilled.
    static_layers: Tensor,
}

impl LayeredGenerator {
    pub fn new(world: &World, padding: usize) -> Self {
        let n_agents = world.n_agents();
        let n_slots = n_agents + padding;
        let (height, width) = (world.height(), world.width());
        let channels = 2 * n_slots + 4;
        let shape = vec![channels, height, width];

        let mut static_layers = Tensor::zeros(&shape);
        let wall = Self::wall_channel(n_slots);
        for pos in world.wall_positions() {
            static_layers.set(&[wall, pos.i, pos.j], 1.0);
        }
        for source in world.sources() {
            let pos = source.pos();
            static_layers.set(&[wall, pos.i, pos.j], 1.0);
        }
        let void = Self::void_channel(n_slots);
        for pos in world.void_positions() {
            static_layers.set(&[void, pos.i, pos.j], 1.0);
        }
        let exit = Self::exit_channel(n_slots);
        for pos in world.exit_positions() {
            static_layers.set(&[exit, pos.i, pos.j], 1.0);
        }

        LayeredGenerator {
            n_agents,
            n_slots,
            height,
            width,
            shape,
            static_layers,
        }
    }

    // Channel offsets.
    pub(crate) fn agent_channel(agent: usize) -> usize {
        agent
    }
    pub(crate) fn wall_channel(n_slots: usize) -> usize {
        n_slots
    }
    pub(crate) fn laser_channel(n_slots: usize, colour: usize) -> usize {
        n_slots + 1 + colour
    }
    pub(crate) fn void_channel(n_slots: usize) -> usize {
        2 * n_slots + 1
    }
    pub(crate) fn gem_channel(n_slots: usize) -> usize {
        2 * n_slots + 2
    }
    pub(crate) fn exit_channel(n_slots: usize) -> usize {
        2 * n_slots + 3
    }

    #[inline]
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// One (channels, H, W) frame for the current world.
    fn frame(&self, world: &World) -> Tensor {
        let mut obs = self.static_layers.clone();
        let n_slots = self.n_slots;

        // Sources: −1 in their colour's channel.  Colours beyond the slot
        // count have no channel and are skipped.
        for source in world.sources() {
            let colour = source.colour().index();
            if colour < n_slots {
                let pos = source.pos();
                obs.set(&[Self::laser_channel(n_slots, colour), pos.i, pos.j], -1.0);
            }
        }
        // Lit beam cells: +1.
        for (pos, source) in world.lit_cells() {
            let colour = source.colour().index();
            if colour < n_slots {
                obs.set(&[Self::laser_channel(n_slots, colour), pos.i, pos.j], 1.0);
            }
        }
        // Uncollected gems.
        for gem in world.gems() {
            if !gem.is_collected() {
                let pos = gem.pos();
                obs.set(&[Self::gem_channel(n_slots), pos.i, pos.j], 1.0);
            }
        }
        // Agents.
        for (a, pos) in world.agents_positions().iter().enumerate() {
            obs.set(&[Self::agent_channel(a), pos.i, pos.j], 1.0);
        }
        obs
    }

    /// Broadcast the frame to every slot (phantom agents included, so the
    /// leading axis matches the padded channel groups).
    pub fn observe(&self, world: &World) -> Tensor {
        self.frame(world).tile(self.n_slots)
    }

    #[inline]
    pub fn n_agents(&self) -> usize {
        self.n_agents
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
}

// ── Agent-zero perspective ────────────────────────────────────────────────────

/// Layered, re-centred on each receiver: in agent i's copy the agent-0 and
/// agent-i channels are swapped, as are the laser-0 and laser-i channels,
/// so every agent sees itself in channel 0.
pub struct PerspectiveGenerator {
    layered: LayeredGenerator,
}

impl PerspectiveGenerator {
    pub fn new(world: &World) -> Self {
        PerspectiveGenerator {
            layered: LayeredGenerator::new(world, 0),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.layered.shape()
    }

    pub fn observe(&self, world: &World) -> Tensor {
        let mut obs = self.layered.observe(world);
        let n = self.layered.n_slots();
        let plane = self.layered.height() * self.layered.width();

        for agent in 1..n {
            let frame = obs.slice_mut(agent);
            swap_planes(frame, LayeredGenerator::agent_channel(0), LayeredGenerator::agent_channel(agent), plane);
            swap_planes(
                frame,
                LayeredGenerator::laser_channel(n, 0),
                LayeredGenerator::laser_channel(n, agent),
                plane,
            );
        }
        obs
    }
}

/// Swap two (H, W) planes inside one flat (channels, H, W) frame.
fn swap_planes(frame: &mut [f32], a: usize, b: usize, plane: usize) {
    for k in 0..plane {
        frame.swap(a * plane + k, b * plane + k);
    }
}
