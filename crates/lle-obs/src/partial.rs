//! Partial (windowed) observations.
//!
//! A k×k window centred on each agent, k odd.  Channels: one per agent,
//! walls, one laser channel per agent colour, gems, exits — no void
//! channel.  Cells outside the window are dropped; cells outside the grid
//! read as zero.

use lle_core::{Position, Tensor};
use lle_world::World;

pub struct PartialGenerator {
    n_agents: usize,
    size: usize,
    center: usize,
    shape: Vec<usize>,
}

impl PartialGenerator {
    /// `size` must be odd; the supported sizes are 3, 5 and 7.
    pub fn new(world: &World, size: usize) -> Self {
        debug_assert!(size % 2 == 1, "window size must be odd");
        let n_agents = world.n_agents();
        let channels = 2 * n_agents + 3;
        PartialGenerator {
            n_agents,
            size,
            center: size / 2,
            shape: vec![channels, size, size],
        }
    }

    fn wall_channel(&self) -> usize {
        self.n_agents
    }
    fn laser_channel(&self, colour: usize) -> usize {
        self.n_agents + 1 + colour
    }
    fn gem_channel(&self) -> usize {
        2 * self.n_agents + 1
    }
    fn exit_channel(&self) -> usize {
        2 * self.n_agents + 2
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Window-relative coordinates of `cell` as seen from `origin`, if the
    /// cell falls inside the window.
    fn project(&self, origin: Position, cell: Position) -> Option<(usize, usize)> {
        let di = cell.i as i64 - origin.i as i64 + self.center as i64;
        let dj = cell.j as i64 - origin.j as i64 + self.center as i64;
        let k = self.size as i64;
        ((0..k).contains(&di) && (0..k).contains(&dj)).then_some((di as usize, dj as usize))
    }

    fn paint(
        &self,
        window: &mut Tensor,
        agent: usize,
        channel: usize,
        origin: Position,
        cell: Position,
        value: f32,
    ) {
        if let Some((wi, wj)) = self.project(origin, cell) {
            window.set(&[agent, channel, wi, wj], value);
        }
    }

    pub fn observe(&self, world: &World) -> Tensor {
        let mut shape = vec![self.n_agents];
        shape.extend_from_slice(&self.shape);
        let mut obs = Tensor::zeros(&shape);

        for (a, &origin) in world.agents_positions().iter().enumerate() {
            for (other, &pos) in world.agents_positions().iter().enumerate() {
                self.paint(&mut obs, a, other, origin, pos, 1.0);
            }
            for pos in world.wall_positions() {
                self.paint(&mut obs, a, self.wall_channel(), origin, pos, 1.0);
            }
            for source in world.sources() {
                // Housings are walls too, and mark −1 in their colour channel.
                self.paint(&mut obs, a, self.wall_channel(), origin, source.pos(), 1.0);
                let colour = source.colour().index();
                if colour < self.n_agents {
                    self.paint(
                        &mut obs,
                        a,
                        self.laser_channel(colour),
                        origin,
                        source.pos(),
                        -1.0,
                    );
                }
            }
            for (pos, source) in world.lit_cells() {
                let colour = source.colour().index();
                if colour < self.n_agents {
                    self.paint(&mut obs, a, self.laser_channel(colour), origin, pos, 1.0);
                }
            }
            for gem in world.gems() {
                if !gem.is_collected() {
                    self.paint(&mut obs, a, self.gem_channel(), origin, gem.pos(), 1.0);
                }
            }
            for pos in world.exit_positions() {
                self.paint(&mut obs, a, self.exit_channel(), origin, pos, 1.0);
            }
        }
        obs
    }
}
