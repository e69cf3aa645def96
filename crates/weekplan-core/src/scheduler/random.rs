//! Random source for candidate selection.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Picks candidates for the slot packer.
pub trait RandomSource {
    /// Return an index uniformly distributed in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// PCG-backed random source; reproducible when seeded.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Mcg128Xsl64,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, otherwise from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
