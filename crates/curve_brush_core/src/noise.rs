// SPDX-License-Identifier: MIT OR Apache-2.0
//! Random sources for the noise brush.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[-1, 1]`
pub trait NoiseSource {
    /// Draw the next sample
    fn sample(&mut self) -> f32;
}

/// Noise drawn from any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomNoise<R> {
    rng: R,
}

impl<R: Rng> RandomNoise<R> {
    /// Wrap a generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNoise<ThreadRng> {
    /// Non-deterministic noise from the thread-local generator
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomNoise<StdRng> {
    /// Reproducible noise from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for RandomNoise<R> {
    fn sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceNoise {
    samples: Vec<f32>,
    cursor: usize,
}

impl SequenceNoise {
    /// Create from samples; an empty list always yields `0.0`
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }
}

impl NoiseSource for SequenceNoise {
    fn sample(&mut self) -> f32 {
        let Some(&value) = self.samples.get(self.cursor % self.samples.len().max(1)) else {
            return 0.0;
        };
        self.cursor += 1;
        value.clamp(-1.0, 1.0)
    }
}
