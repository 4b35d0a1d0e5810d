//! Randomness used by the feed, behind a trait so tests can script it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the three random draws a tick makes.
pub trait FeedRandom: Send {
    /// Uniform integer in `min..=max`.
    fn count_between(&mut self, min: usize, max: usize) -> usize;

    /// Uniform index in `0..len`. `len` is never zero.
    fn index_below(&mut self, len: usize) -> usize;

    /// Uniform fractional change in `-max..=max`.
    fn change_within(&mut self, max: f64) -> f64;
}

/// [`FeedRandom`] backed by any [`rand::Rng`].
pub struct RngRandom<R>(R);

impl<R: Rng + Send> RngRandom<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngRandom<StdRng> {
    /// Deterministic source for reproducible sessions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> FeedRandom for RngRandom<R> {
    fn count_between(&mut self, min: usize, max: usize) -> usize {
        self.0.gen_range(min..=max)
    }

    fn index_below(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn change_within(&mut self, max: f64) -> f64 {
        self.0.gen_range(-max..=max)
    }
}

/// Pick `count` distinct indices from `0..len`, uniformly, without replacement.
///
/// Partial Fisher-Yates: each draw picks among the indices not yet taken.
pub fn sample_indices(random: &mut dyn FeedRandom, len: usize, count: usize) -> Vec<usize> {
    let count = count.min(len);
    let mut pool: Vec<usize> = (0..len).collect();
    for i in 0..count {
        let j = i + random.index_below(len - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
