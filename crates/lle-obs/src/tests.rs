//! Unit tests for the feature generators.

use lle_core::Action;
use lle_world::World;

use crate::{Generator, GeneratorKind};

const LASER_MAP: &str = "
@ @  @   @  @
@ .  L0S .  @
@ S0 .   S1 @
@ .  G   .  @
@ X  .   X  @
@ @  @   @  @
";

fn laser_world() -> World {
    let mut world = World::from_str(LASER_MAP).unwrap();
    world.reset();
    world
}

#[cfg(test)]
mod layered {
    use super::*;
    use crate::LayeredGenerator;

    #[test]
    fn shape_and_channel_count() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Layered, &world);
        // 2 agents → 2 + 1 + 2 + 1 + 1 + 1 = 8 channels.
        assert_eq!(generator.shape(), vec![8, 6, 5]);
        let obs = generator.observe(&world);
        assert_eq!(obs.shape(), &[2, 8, 6, 5]);
    }

    #[test]
    fn agents_walls_and_sources_are_marked() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Layered, &world);
        let obs = generator.observe(&world);

        // Agent 0 at (2,1) in channel 0, agent 1 at (2,3) in channel 1.
        assert_eq!(obs.get(&[0, 0, 2, 1]), 1.0);
        assert_eq!(obs.get(&[0, 1, 2, 3]), 1.0);
        // The wall channel covers border walls and the source housing.
        let wall = LayeredGenerator::wall_channel(2);
        assert_eq!(obs.get(&[0, wall, 0, 0]), 1.0);
        assert_eq!(obs.get(&[0, wall, 1, 2]), 1.0);
        // Laser channel 0: −1 at the housing, +1 on the lit cells.
        let laser0 = LayeredGenerator::laser_channel(2, 0);
        assert_eq!(obs.get(&[0, laser0, 1, 2]), -1.0);
        assert_eq!(obs.get(&[0, laser0, 2, 2]), 1.0);
        assert_eq!(obs.get(&[0, laser0, 3, 2]), 1.0);
        // Gem and exit channels.
        let gem = LayeredGenerator::gem_channel(2);
        let exit = LayeredGenerator::exit_channel(2);
        assert_eq!(obs.get(&[0, gem, 3, 1]), 1.0);
        assert_eq!(obs.get(&[0, exit, 4, 1]), 1.0);
        assert_eq!(obs.get(&[0, exit, 4, 3]), 1.0);
    }

    #[test]
    fn blocked_beam_cells_read_zero() {
        let mut world = laser_world();
        world.step(&[Action::East, Action::Stay]).unwrap();
        let generator = Generator::build(GeneratorKind::Layered, &world);
        let obs = generator.observe(&world);
        let laser0 = LayeredGenerator::laser_channel(2, 0);
        // The blocker's cell stays lit, the cells past it go dark.
        assert_eq!(obs.get(&[0, laser0, 2, 2]), 1.0);
        assert_eq!(obs.get(&[0, laser0, 3, 2]), 0.0);
        assert_eq!(obs.get(&[0, laser0, 4, 2]), 0.0);
    }

    #[test]
    fn collected_gems_disappear() {
        let mut world = laser_world();
        world.step(&[Action::South, Action::Stay]).unwrap();
        world.step(&[Action::East, Action::Stay]).unwrap();
        assert_eq!(world.gems_collected(), 1);
        let generator = Generator::build(GeneratorKind::Layered, &world);
        let obs = generator.observe(&world);
        let gem = LayeredGenerator::gem_channel(2);
        assert_eq!(obs.get(&[0, gem, 3, 1]), 0.0);
    }

    #[test]
    fn padding_widens_the_channel_groups() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::LayeredPadded(2), &world);
        // 4 slots → 4 + 1 + 4 + 3 = 12 channels, broadcast to 4 copies.
        assert_eq!(generator.shape(), vec![12, 6, 5]);
        assert_eq!(generator.observe(&world).shape(), &[4, 12, 6, 5]);
    }

    #[test]
    fn all_copies_are_identical() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Layered, &world);
        let obs = generator.observe(&world);
        assert_eq!(obs.slice(0), obs.slice(1));
    }
}

#[cfg(test)]
mod flattened {
    use super::*;

    #[test]
    fn flattened_matches_layered_contents() {
        let world = laser_world();
        let layered = Generator::build(GeneratorKind::Layered, &world);
        let flattened = Generator::build(GeneratorKind::Flattened, &world);
        assert_eq!(flattened.shape(), vec![8 * 6 * 5]);

        let a = layered.observe(&world);
        let b = flattened.observe(&world);
        assert_eq!(b.shape(), &[2, 240]);
        assert_eq!(a.data(), b.data());
    }
}

#[cfg(test)]
mod perspective {
    use super::*;

    #[test]
    fn agent_zero_sees_the_plain_layered_view() {
        let world = laser_world();
        let layered = Generator::build(GeneratorKind::Layered, &world);
        let perspective = Generator::build(GeneratorKind::AgentZeroPerspective, &world);
        assert_eq!(
            layered.observe(&world).slice(0),
            perspective.observe(&world).slice(0),
        );
    }

    #[test]
    fn other_agents_see_themselves_in_channel_zero() {
        let world = laser_world();
        let perspective = Generator::build(GeneratorKind::AgentZeroPerspective, &world);
        let obs = perspective.observe(&world);
        // In agent 1's copy, channel 0 holds agent 1's position (2,3) and
        // channel 1 holds agent 0's (2,1).
        assert_eq!(obs.get(&[1, 0, 2, 3]), 1.0);
        assert_eq!(obs.get(&[1, 0, 2, 1]), 0.0);
        assert_eq!(obs.get(&[1, 1, 2, 1]), 1.0);
    }
}

#[cfg(test)]
mod partial {
    use super::*;

    #[test]
    fn shape_has_no_void_channel() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Partial(3), &world);
        // 2 agents → 2 + 1 + 2 + 1 + 1 = 7 channels.
        assert_eq!(generator.shape(), vec![7, 3, 3]);
        assert_eq!(generator.observe(&world).shape(), &[2, 7, 3, 3]);
    }

    #[test]
    fn window_is_centred_on_each_agent() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Partial(3), &world);
        let obs = generator.observe(&world);
        // Every agent sees itself at the window centre.
        assert_eq!(obs.get(&[0, 0, 1, 1]), 1.0);
        assert_eq!(obs.get(&[1, 1, 1, 1]), 1.0);
        // Agent 0 at (2,1): the gem at (3,1) is one cell south.
        assert_eq!(obs.get(&[0, 5, 2, 1]), 1.0);
        // Agent 1 at (2,3) is out of agent 0's 3×3 window.
        assert_eq!(obs.get(&[0, 1, 1, 1]), 0.0);
    }

    #[test]
    fn out_of_grid_cells_read_zero() {
        let mut world = World::from_str("S0 X").unwrap();
        world.reset();
        let generator = Generator::build(GeneratorKind::Partial(5), &world);
        let obs = generator.observe(&world);
        // 1 agent → 5 channels; nothing outside the 1×2 grid is painted.
        let total: f32 = obs.data().iter().map(|v| v.abs()).sum();
        // Agent at centre + exit east of it.
        assert_eq!(total, 2.0);
    }

    #[test]
    fn sources_mark_walls_and_their_colour_channel() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Partial(3), &world);
        let obs = generator.observe(&world);
        // Agent 0 at (2,1): the housing (1,2) is at window (0,2).
        assert_eq!(obs.get(&[0, 2, 0, 2]), 1.0); // wall channel
        assert_eq!(obs.get(&[0, 3, 0, 2]), -1.0); // laser-0 channel
        // Lit cell (2,2) sits directly east: window (1,2).
        assert_eq!(obs.get(&[0, 3, 1, 2]), 1.0);
    }
}

#[cfg(test)]
mod state {
    use super::*;

    #[test]
    fn raw_state_matches_world_state_array() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::State, &world);
        assert_eq!(generator.shape(), vec![2 * 2 + 1 + 2]);
        let obs = generator.observe(&world);
        assert_eq!(obs.shape(), &[2, 7]);
        assert_eq!(obs.slice(0), world.get_state().as_array());
        assert_eq!(obs.slice(0), obs.slice(1));
    }

    #[test]
    fn normalized_positions_are_fractions() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::NormalizedState, &world);
        let obs = generator.observe(&world);
        // Agent 0 at (2,1) in a 6×5 world.
        assert_eq!(obs.get(&[0, 0]), 2.0 / 6.0);
        assert_eq!(obs.get(&[0, 1]), 1.0 / 5.0);
    }

    #[test]
    fn to_world_state_inverts_observe() {
        let mut world = laser_world();
        world.step(&[Action::South, Action::Stay]).unwrap();
        for kind in [GeneratorKind::State, GeneratorKind::NormalizedState] {
            let generator = Generator::build(kind, &world);
            let obs = generator.observe(&world);
            let state = generator.to_world_state(obs.slice(0)).unwrap().unwrap();
            assert_eq!(state, world.get_state());
        }
    }

    #[test]
    fn non_state_generators_do_not_decode() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::Layered, &world);
        assert!(generator.to_world_state(&[0.0]).is_none());
    }
}

#[cfg(test)]
mod image {
    use super::*;
    use crate::render::{IMAGE_HEIGHT, IMAGE_WIDTH, Renderer, RgbBuffer};

    /// Renderer stub: a 2×2 image with one red pixel.
    struct StubRenderer;

    impl Renderer for StubRenderer {
        fn render(&self, _world: &World) -> RgbBuffer {
            let mut img = RgbBuffer::new(2, 2);
            img.put(0, 0, [255, 0, 0]);
            img
        }
    }

    #[test]
    fn image_is_resized_transposed_and_broadcast() {
        let world = laser_world();
        let generator = Generator::image_with_renderer(&world, Box::new(StubRenderer));
        let obs = generator.observe(&world);
        assert_eq!(obs.shape(), &[2, 3, IMAGE_WIDTH, IMAGE_HEIGHT]);
        // The red quadrant maps to the top-left after nearest resize:
        // channel 0 (red) is 255 there, channel 1 is 0.
        assert_eq!(obs.get(&[0, 0, 0, 0]), 255.0);
        assert_eq!(obs.get(&[0, 1, 0, 0]), 0.0);
        assert_eq!(obs.slice(0), obs.slice(1));
    }

    #[test]
    fn default_renderer_produces_the_fixed_shape() {
        let world = laser_world();
        let generator = Generator::build(GeneratorKind::RgbImage, &world);
        assert_eq!(generator.shape(), vec![3, IMAGE_WIDTH, IMAGE_HEIGHT]);
        let obs = generator.observe(&world);
        assert_eq!(obs.shape(), &[2, 3, IMAGE_WIDTH, IMAGE_HEIGHT]);
    }

    #[test]
    fn parse_kind_strings() {
        use std::str::FromStr;
        assert_eq!(
            GeneratorKind::from_str("partial5x5").unwrap(),
            GeneratorKind::Partial(5)
        );
        assert_eq!(
            GeneratorKind::from_str("state-normalized").unwrap(),
            GeneratorKind::NormalizedState
        );
        assert!(GeneratorKind::from_str("holographic").is_err());
    }
}
