//! Deterministic random source for battle resolution.
//!
//! The generator is a plain value stored inside the battlefield state and
//! threaded through every transition. Nothing reads ambient randomness:
//! identical seed string + identical rosters replay to an identical event
//! log.

use sha2::{Digest, Sha256};

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output. Small, fast, and
/// statistically solid, which is all the battle loop needs for hit, crit,
/// guard, and turn-order rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRng {
    state: u64,
}

impl BattleRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a raw 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        // One warm-up step so similar seeds diverge immediately.
        Self {
            state: Self::step(seed ^ Self::INCREMENT),
        }
    }

    /// Creates a generator from an arbitrary seed string.
    ///
    /// The string is folded through SHA-256 and the first eight bytes become
    /// the LCG state, so callers can hand in human-readable seeds.
    pub fn from_seed_str(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self::from_seed(u64::from_le_bytes(bytes))
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Draws the next 32-bit value, advancing the stream.
    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }

    /// Rolls a d100 (1-100 inclusive), the unit for percentage checks.
    pub fn roll_d100(&mut self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// Draws a coin flip. Used for cross-team turn-order ties.
    pub fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 0
    }

    /// Draws a value in `[0, upper)`. Returns 0 when the range is empty.
    pub fn below(&mut self, upper: u32) -> u32 {
        if upper <= 1 {
            return 0;
        }
        self.next_u32() % upper
    }
}
