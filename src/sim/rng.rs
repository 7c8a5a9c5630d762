//! Per-run random stream
//!
//! Every procedural decision of a run (anchor placement, tiers, speed
//! factors, explosion shards) draws from one `RunRng`, so a seed and an
//! input sequence fully reproduce a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRng {
    seed: u32,
    rng: Pcg32,
}

impl RunRng {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed as u64),
        }
    }

    /// Seed the stream was created from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform float in [-span/2, span/2)
    pub fn centered(&mut self, span: f32) -> f32 {
        (self.next_f32() - 0.5) * span
    }

    /// Index drawn from relative `weights`
    ///
    /// Falls back to `fallback` when rounding leaves the roll unconsumed.
    pub fn weighted_index(&mut self, weights: &[f32], fallback: usize) -> usize {
        let total: f32 = weights.iter().sum();
        let mut roll = self.next_f32() * total;
        for (i, w) in weights.iter().enumerate() {
            roll -= w;
            if *w > 0.0 && roll <= 0.0 {
                return i;
            }
        }
        fallback
    }
}
