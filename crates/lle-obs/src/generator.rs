//! The generator kinds and their uniform dispatch.
//!
//! One tagged enum instead of a trait-object hierarchy: the set of
//! generators is closed, matches are exhaustive, and the environment
//! adapter can hold two of them (observation and state) without boxing.

use std::str::FromStr;

use lle_core::Tensor;
use lle_world::{World, WorldResult, WorldState};
use thiserror::Error;

use crate::layered::{LayeredGenerator, PerspectiveGenerator};
use crate::partial::PartialGenerator;
use crate::render::{BlockRenderer, Renderer, RgbImageGenerator};
use crate::state::StateGenerator;

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// Which feature layout a generator produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
    Layered,
    LayeredPadded(usize),
    Flattened,
    Partial(usize),
    State,
    NormalizedState,
    RgbImage,
    AgentZeroPerspective,
}

/// A kind string the builder surface does not recognise.
#[derive(Debug, Error)]
#[error("unknown observation kind {0:?}")]
pub struct UnknownGeneratorKind(pub String);

impl FromStr for GeneratorKind {
    type Err = UnknownGeneratorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layered" => Ok(GeneratorKind::Layered),
            "flattened" => Ok(GeneratorKind::Flattened),
            "partial3x3" => Ok(GeneratorKind::Partial(3)),
            "partial5x5" => Ok(GeneratorKind::Partial(5)),
            "partial7x7" => Ok(GeneratorKind::Partial(7)),
            "state" => Ok(GeneratorKind::State),
            "state-normalized" | "normalized-state" => Ok(GeneratorKind::NormalizedState),
            "image" => Ok(GeneratorKind::RgbImage),
            "perspective" => Ok(GeneratorKind::AgentZeroPerspective),
            other => Err(UnknownGeneratorKind(other.to_string())),
        }
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// A built feature generator, tied to one world's dimensions.
pub enum Generator {
    Layered(LayeredGenerator),
    Flattened(LayeredGenerator),
    Partial(PartialGenerator),
    State(StateGenerator),
    RgbImage(RgbImageGenerator),
    AgentZeroPerspective(PerspectiveGenerator),
}

impl Generator {
    /// Build a generator of `kind` for `world`, with the default renderer
    /// for the image kind.
    pub fn build(kind: GeneratorKind, world: &World) -> Generator {
        match kind {
            GeneratorKind::Layered => Generator::Layered(LayeredGenerator::new(world, 0)),
            GeneratorKind::LayeredPadded(padding) => {
                Generator::Layered(LayeredGenerator::new(world, padding))
            }
            GeneratorKind::Flattened => Generator::Flattened(LayeredGenerator::new(world, 0)),
            GeneratorKind::Partial(size) => Generator::Partial(PartialGenerator::new(world, size)),
            GeneratorKind::State => Generator::State(StateGenerator::new(world, false)),
            GeneratorKind::NormalizedState => Generator::State(StateGenerator::new(world, true)),
            GeneratorKind::RgbImage => Generator::RgbImage(RgbImageGenerator::new(
                world,
                Box::new(BlockRenderer::default()),
            )),
            GeneratorKind::AgentZeroPerspective => {
                Generator::AgentZeroPerspective(PerspectiveGenerator::new(world))
            }
        }
    }

    /// Image generator with a caller-supplied renderer.
    pub fn image_with_renderer(world: &World, renderer: Box<dyn Renderer>) -> Generator {
        Generator::RgbImage(RgbImageGenerator::new(world, renderer))
    }

    /// The per-agent feature shape (the leading agent axis excluded).
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Generator::Layered(g) => g.shape().to_vec(),
            Generator::Flattened(g) => vec![g.shape().iter().product()],
            Generator::Partial(g) => g.shape().to_vec(),
            Generator::State(g) => g.shape().to_vec(),
            Generator::RgbImage(g) => g.shape().to_vec(),
            Generator::AgentZeroPerspective(g) => g.shape().to_vec(),
        }
    }

    /// Materialise features for every agent: shape `(n_agents, *shape)`.
    pub fn observe(&self, world: &World) -> Tensor {
        match self {
            Generator::Layered(g) => g.observe(world),
            Generator::Flattened(g) => {
                let n = g.n_slots();
                let flat: usize = g.shape().iter().product();
                g.observe(world).reshape(&[n, flat])
            }
            Generator::Partial(g) => g.observe(world),
            Generator::State(g) => g.observe(world),
            Generator::RgbImage(g) => g.observe(world),
            Generator::AgentZeroPerspective(g) => g.observe(world),
        }
    }

    /// Decode a feature vector back into a `WorldState`.  Only the state
    /// kinds support this; everything else returns `None`.
    pub fn to_world_state(&self, data: &[f32]) -> Option<WorldResult<WorldState>> {
        match self {
            Generator::State(g) => Some(g.to_world_state(data)),
            _ => None,
        }
    }
}
