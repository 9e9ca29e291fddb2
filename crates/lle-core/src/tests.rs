//! Unit tests for lle-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, LaserId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(AgentId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(LaserId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(LaserId(0).to_string(), "LaserId(0)");
    }
}

#[cfg(test)]
mod pos {
    use crate::Position;

    #[test]
    fn checked_shift_in_bounds() {
        let p = Position::new(2, 3);
        assert_eq!(p.checked_shift((-1, 0)), Some(Position::new(1, 3)));
        assert_eq!(p.checked_shift((0, 1)), Some(Position::new(2, 4)));
    }

    #[test]
    fn checked_shift_underflow() {
        let p = Position::new(0, 0);
        assert_eq!(p.checked_shift((-1, 0)), None);
        assert_eq!(p.checked_shift((0, -1)), None);
        assert_eq!(p.checked_shift((0, 0)), Some(p));
    }

    #[test]
    fn manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(2, 3)), 5);
        assert_eq!(Position::new(4, 1).manhattan(Position::new(1, 1)), 3);
    }
}

#[cfg(test)]
mod direction {
    use crate::Direction;

    #[test]
    fn deltas() {
        assert_eq!(Direction::North.delta(), (-1, 0));
        assert_eq!(Direction::South.delta(), (1, 0));
        assert_eq!(Direction::East.delta(), (0, 1));
        assert_eq!(Direction::West.delta(), (0, -1));
    }

    #[test]
    fn opposite_is_involutive() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn parse_letters() {
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("w".parse::<Direction>().unwrap(), Direction::West);
        assert!("Q".parse::<Direction>().is_err());
    }
}

#[cfg(test)]
mod action {
    use crate::{Action, Direction};

    #[test]
    fn indices_are_stable() {
        assert_eq!(Action::North.index(), 0);
        assert_eq!(Action::South.index(), 1);
        assert_eq!(Action::East.index(), 2);
        assert_eq!(Action::West.index(), 3);
        assert_eq!(Action::Stay.index(), 4);
    }

    #[test]
    fn from_index_roundtrip() {
        for a in Action::ALL {
            assert_eq!(Action::from_index(a.index()).unwrap(), a);
        }
        assert!(Action::from_index(Action::N).is_err());
    }

    #[test]
    fn stay_has_no_direction() {
        assert_eq!(Action::Stay.delta(), (0, 0));
        assert!(Action::Stay.direction().is_none());
        assert_eq!(Action::from(Direction::East), Action::East);
    }
}

#[cfg(test)]
mod rng {
    use crate::WorldRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = WorldRng::new(12345);
        let mut r2 = WorldRng::new(12345);
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn derived_streams_differ() {
        let mut root = WorldRng::new(1);
        let mut child = WorldRng::derived(1, 1);
        let a: u64 = root.random();
        let b: u64 = child.random();
        assert_ne!(a, b, "derived stream should diverge from the root");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = WorldRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0usize..7);
            assert!(v < 7);
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = WorldRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}

#[cfg(test)]
mod tensor {
    use crate::Tensor;

    #[test]
    fn zeros_and_shape() {
        let t = Tensor::zeros(&[2, 3, 4]);
        assert_eq!(t.shape(), &[2, 3, 4]);
        assert_eq!(t.len(), 24);
        assert!(t.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn set_get_roundtrip() {
        let mut t = Tensor::zeros(&[2, 3]);
        t.set(&[1, 2], 5.0);
        assert_eq!(t.get(&[1, 2]), 5.0);
        assert_eq!(t.data()[5], 5.0);
    }

    #[test]
    fn tile_broadcasts() {
        let mut t = Tensor::zeros(&[2]);
        t.set(&[0], 1.0);
        t.set(&[1], 2.0);
        let tiled = t.tile(3);
        assert_eq!(tiled.shape(), &[3, 2]);
        assert_eq!(tiled.slice(0), &[1.0, 2.0]);
        assert_eq!(tiled.slice(2), &[1.0, 2.0]);
    }

    #[test]
    fn reshape_preserves_data() {
        let t = Tensor::from_data(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]);
        let flat = t.reshape(&[4]);
        assert_eq!(flat.shape(), &[4]);
        assert_eq!(flat.data(), &[1.0, 2.0, 3.0, 4.0]);
    }
}

#[cfg(test)]
mod tile {
    use crate::{LaserId, Tile};

    #[test]
    fn walkability() {
        assert!(Tile::Floor.is_walkable());
        assert!(Tile::Gem.is_walkable());
        assert!(Tile::Exit.is_walkable());
        assert!(Tile::Void.is_walkable());
        assert!(!Tile::Wall.is_walkable());
        assert!(!Tile::LaserSource(LaserId(0)).is_walkable());
    }

    #[test]
    fn beam_opacity() {
        assert!(Tile::Wall.blocks_beam());
        assert!(Tile::LaserSource(LaserId(1)).blocks_beam());
        assert!(!Tile::Void.blocks_beam());
        assert!(!Tile::Exit.blocks_beam());
    }
}
