//! The renderer boundary and the image observation built on it.
//!
//! Anything that can turn a world snapshot into an H'×W'×3 byte image is a
//! [`Renderer`]; the shipped [`BlockRenderer`] paints each tile as a flat
//! colour block, which is plenty for pixel-based policies.  Tests plug in
//! stubs.

use lle_core::{Tensor, Tile};
use lle_world::World;

/// Image height after resizing, in pixels.
pub const IMAGE_HEIGHT: usize = 120;
/// Image width after resizing, in pixels.
pub const IMAGE_WIDTH: usize = 160;

// ── RgbBuffer ─────────────────────────────────────────────────────────────────

/// A row-major H×W×3 byte image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBuffer {
    pub height: usize,
    pub width: usize,
    pub pixels: Vec<u8>,
}

impl RgbBuffer {
    pub fn new(height: usize, width: usize) -> Self {
        RgbBuffer {
            height,
            width,
            pixels: vec![0; height * width * 3],
        }
    }

    #[inline]
    pub fn put(&mut self, i: usize, j: usize, rgb: [u8; 3]) {
        let k = (i * self.width + j) * 3;
        self.pixels[k..k + 3].copy_from_slice(&rgb);
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> [u8; 3] {
        let k = (i * self.width + j) * 3;
        [self.pixels[k], self.pixels[k + 1], self.pixels[k + 2]]
    }

    /// Nearest-neighbour resize.
    pub fn resized(&self, height: usize, width: usize) -> RgbBuffer {
        let mut out = RgbBuffer::new(height, width);
        for i in 0..height {
            let si = i * self.height / height;
            for j in 0..width {
                let sj = j * self.width / width;
                out.put(i, j, self.get(si, sj));
            }
        }
        out
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Turns a world snapshot into an image.  May be arbitrarily fancy; the
/// observation pipeline only requires determinism.
pub trait Renderer {
    fn render(&self, world: &World) -> RgbBuffer;
}

/// Colour cycle shared by agents and their lasers.
const AGENT_COLOURS: [[u8; 3]; 8] = [
    [220, 40, 40],
    [40, 90, 220],
    [40, 180, 70],
    [230, 200, 40],
    [170, 60, 200],
    [240, 130, 30],
    [60, 200, 200],
    [230, 90, 160],
];

fn colour_of(index: usize) -> [u8; 3] {
    AGENT_COLOURS[index % AGENT_COLOURS.len()]
}

/// Flat-colour tile painter: `scale`×`scale` pixels per cell.
pub struct BlockRenderer {
    scale: usize,
}

impl BlockRenderer {
    pub fn new(scale: usize) -> Self {
        BlockRenderer { scale: scale.max(1) }
    }

    fn fill_cell(&self, img: &mut RgbBuffer, i: usize, j: usize, rgb: [u8; 3]) {
        for di in 0..self.scale {
            for dj in 0..self.scale {
                img.put(i * self.scale + di, j * self.scale + dj, rgb);
            }
        }
    }
}

impl Default for BlockRenderer {
    fn default() -> Self {
        BlockRenderer::new(8)
    }
}

impl Renderer for BlockRenderer {
    fn render(&self, world: &World) -> RgbBuffer {
        let mut img = RgbBuffer::new(world.height() * self.scale, world.width() * self.scale);

        for i in 0..world.height() {
            for j in 0..world.width() {
                let pos = lle_core::Position::new(i, j);
                let rgb = match world.grid().at(pos) {
                    Tile::Floor => [245, 245, 245],
                    Tile::Wall => [60, 60, 60],
                    Tile::Gem => {
                        if world.gem_at(pos).is_some_and(|g| g.is_collected()) {
                            [245, 245, 245]
                        } else {
                            [20, 160, 90]
                        }
                    }
                    Tile::Exit => [200, 200, 255],
                    Tile::Void => [0, 0, 0],
                    Tile::LaserSource(id) => {
                        colour_of(world.sources()[id.index()].colour().index())
                    }
                };
                self.fill_cell(&mut img, i, j, rgb);
            }
        }
        // Beam tint over the base tiles.
        for (pos, source) in world.lit_cells() {
            let [r, g, b] = colour_of(source.colour().index());
            self.fill_cell(&mut img, pos.i, pos.j, [r / 2 + 100, g / 2 + 100, b / 2 + 100]);
        }
        // Agents on top.
        for (a, pos) in world.agents_positions().iter().enumerate() {
            if world.agents()[a].is_alive() {
                self.fill_cell(&mut img, pos.i, pos.j, colour_of(a));
            }
        }
        img
    }
}

// ── Image observation ─────────────────────────────────────────────────────────

/// Renders, resizes to 120×160, transposes to (3, 160, 120) floats and
/// broadcasts to every agent.
pub struct RgbImageGenerator {
    renderer: Box<dyn Renderer>,
    n_agents: usize,
    shape: Vec<usize>,
}

impl RgbImageGenerator {
    pub fn new(world: &World, renderer: Box<dyn Renderer>) -> Self {
        RgbImageGenerator {
            renderer,
            n_agents: world.n_agents(),
            shape: vec![3, IMAGE_WIDTH, IMAGE_HEIGHT],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn observe(&self, world: &World) -> Tensor {
        let img = self.renderer.render(world).resized(IMAGE_HEIGHT, IMAGE_WIDTH);

        let mut frame = Tensor::zeros(&self.shape);
        for c in 0..3 {
            for x in 0..IMAGE_WIDTH {
                for y in 0..IMAGE_HEIGHT {
                    frame.set(&[c, x, y], img.get(y, x)[c] as f32);
                }
            }
        }
        frame.tile(self.n_agents)
    }
}
