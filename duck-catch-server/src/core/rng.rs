//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ algorithm for fast, high-quality, deterministic randomness.
//! Given the same seed, a session places and moves its ducks identically.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use duck_catch::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Sequential seeds (session counters, test ids) still give unrelated
    /// duck layouts.
    pub fn new(seed: u64) -> Self {
        let state = match expand_seed(seed) {
            [0, 0] => [1, 1],
            state => state,
        };
        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random `f32` in range [0, 1).
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a random `f32` in range [min, max).
    ///
    /// Returns `min` when the range is empty.
    #[inline]
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + self.next_unit() * (max - min)
    }

    /// Generate a random point inside the box `[min, max)`.
    #[inline]
    pub fn random_point(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        let x = self.next_range(min.x, max.x);
        let y = self.next_range(min.y, max.y);
        Vec2::new(x, y)
    }
}

/// Weyl increment of the SplitMix64 seed expander.
const SEED_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Two SplitMix64 outputs from `seed`, used as the Xorshift state.
fn expand_seed(seed: u64) -> [u64; 2] {
    let mix = |step: u64| {
        let mut z = seed.wrapping_add(SEED_GAMMA.wrapping_mul(step));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };
    [mix(1), mix(2)]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_rng_known_values() {
        // Recorded sessions rely on this exact sequence.
        let mut rng = DeterministicRng::new(42);
        assert_eq!(rng.next_u64(), 16629283624882167704);
        assert_eq!(rng.next_u64(), 1420492921613871959);
        assert_eq!(rng.next_u64(), 9768315062676884790);
    }

    #[test]
    fn test_next_unit_range() {
        let mut rng = DeterministicRng::new(9999);

        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_range_empty() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(rng.next_range(8.0, 8.0), 8.0);
        assert_eq!(rng.next_range(10.0, 2.0), 10.0);
    }

    #[test]
    fn test_random_point_in_box() {
        let mut rng = DeterministicRng::new(7777);
        let min = Vec2::new(8.0, 8.0);
        let max = Vec2::new(728.0, 428.0);

        for _ in 0..1000 {
            let p = rng.random_point(min, max);
            assert!(p.within(min, max), "{:?} escaped the box", p);
        }
    }
}
