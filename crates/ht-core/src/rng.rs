//! Deterministic RNG wrapper.
//!
//! # Determinism strategy
//!
//! Everything random in the engine — the baseline random assignment strategy
//! and the synthetic-load simulator — draws from a `SimRng` seeded from the
//! engine configuration.  The same seed and the same sequence of calls
//! always produce the same assignments, which is what makes perturbation
//! runs and the reproducibility tests possible.
//!
//! Independent consumers (strategy vs. simulator) derive their own child
//! RNGs via [`SimRng::child`] so their draw sequences never interleave.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing — spreads
/// consecutive child offsets uniformly across the seed space.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded deterministic RNG for engine-level randomness.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — used to give
    /// the random strategy and the simulator independent streams.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
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

    /// Choose a random element from a slice.  Returns `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Pick two distinct indices in `0..len`, in random order.
    ///
    /// Returns `None` when `len < 2`.  Used by the simulator to draw an
    /// (origin, destination) pair.
    pub fn pick_two_distinct(&mut self, len: usize) -> Option<(usize, usize)> {
        if len < 2 {
            return None;
        }
        let sampled = rand::seq::index::sample(&mut self.0, len, 2);
        Some((sampled.index(0), sampled.index(1)))
    }
}
