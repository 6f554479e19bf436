//! Seedable RNG shared by board generation, refill, shuffle and super-tile rolls.
//!
//! Uses `SmallRng` (xoshiro256++), which is fast and builds for WASM. Entropy
//! comes from `getrandom` (browser crypto API on wasm32, the OS elsewhere).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::types::TileColor;

/// Seed it for deterministic replay, or create it from system entropy.
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Uniform color among the first `color_count` entries of [`TileColor::ALL`].
    pub fn color(&mut self, color_count: usize) -> TileColor {
        let n = color_count.clamp(1, TileColor::ALL.len());
        TileColor::ALL[self.gen_range(n)]
    }

    /// Fair coin flip.
    #[inline(always)]
    pub fn coin(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
