//! Seeded linear congruential generator
//!
//! Small and fully reproducible: the whole generator state is one integer, so
//! a session can be replayed from its seed alone.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Multiplier of the recurrence
pub const LCG_A: u64 = 9301;
/// Increment of the recurrence
pub const LCG_C: u64 = 49297;
/// Modulus of the recurrence
pub const LCG_M: u64 = 233280;

/// Deterministic PRNG driving board generation and colour draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    seed: u64,
}

impl SeededRandom {
    /// Create a generator from any integer seed (e.g. a wall-clock timestamp)
    pub fn new(seed: u64) -> Self {
        // Reducing first keeps the recurrence exact for huge seeds
        Self { seed: seed % LCG_M }
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.seed
    }

    /// Advance and return a float in `[0, 1)`
    pub fn next(&mut self) -> f64 {
        self.seed = (self.seed * LCG_A + LCG_C) % LCG_M;
        self.seed as f64 / LCG_M as f64
    }

    /// Draw an index in `[0, len)` as `floor(next() * len)`
    ///
    /// Returns 0 for an empty range (the draw is still consumed).
    pub fn next_index(&mut self, len: usize) -> usize {
        let r = self.next();
        if len == 0 {
            return 0;
        }
        ((r * len as f64).floor() as usize).min(len - 1)
    }
}

/// Lets collaborators pull values through the `rand` API.
///
/// Each `next_u32` consumes exactly one step of the recurrence.
impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next() * u32::MAX as f64) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
