//! Run-level RNG wrapper.
//!
//! Background traffic is random by nature; a fixed seed makes a run
//! reproducible (same edge pairs, same departure times) as long as the
//! routing service answers the same way.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// RNG used for background-traffic sampling.
///
/// Single-threaded only; the tool has exactly one thread of control.
pub struct SimRng(SmallRng);

impl SimRng {
    /// Deterministic RNG from `seed`.
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// `new(seed)` when a seed is configured, otherwise `from_entropy()`.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
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

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
