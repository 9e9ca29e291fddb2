//! Deterministic RNG wrapper for worlds and environments.
//!
//! # Determinism strategy
//!
//! A world holds exactly one `WorldRng`, consumed only by random-start
//! sampling; the environment adapter derives its own child RNG (for laser
//! randomisation) from the same seed:
//!
//!   child_seed = seed XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.  This
//! means:
//!
//! - World and adapter never share RNG state, so adding laser randomisation
//!   to a configuration does not disturb start sampling.
//! - `seed(s)` followed by the same call sequence reproduces the exact same
//!   trace, run after run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seedable deterministic RNG.
///
/// Used only in single-threaded contexts; a world is not safe for concurrent
/// mutation and neither is its RNG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldRng(SmallRng);

impl WorldRng {
    pub fn new(seed: u64) -> Self {
        WorldRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent `WorldRng` from `seed` and an offset — used to
    /// give the environment adapter its own stream without a second seed in
    /// the public interface.
    pub fn derived(seed: u64, offset: u64) -> WorldRng {
        WorldRng::new(seed ^ offset.wrapping_mul(MIXING_CONSTANT))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.  Returns `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
