//! Entropy Sources
//!
//! The game core consumes randomness through the narrow [`EntropySource`]
//! capability. Sessions default to [`DeterministicRng`] (Xorshift128+), and
//! tests substitute [`FixedSequence`] to script exact draws.

use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

/// Supplier of uniformly distributed integers.
///
/// Implementations return a value in `[0, bound)`. A `bound` of zero
/// yields zero.
pub trait EntropySource {
    /// Draw the next integer in `[0, bound)`.
    fn next(&mut self, bound: u32) -> u32;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn next(&mut self, bound: u32) -> u32 {
        (**self).next(bound)
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Box<E> {
    fn next(&mut self, bound: u32) -> u32 {
        (**self).next(bound)
    }
}

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform.
///
/// # Example
///
/// ```
/// use treasure_hunt::core::rng::{DeterministicRng, EntropySource};
///
/// let mut rng = DeterministicRng::new(12345);
/// let cell = rng.next(100);
/// assert!(cell < 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create RNG for a session identifier.
    pub fn for_session(session_id: &[u8; 16], salt: &[u8]) -> Self {
        Self::new(derive_session_seed(session_id, salt))
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

    /// Generate a random integer in range [0, max).
    ///
    /// Rejects the biased tail of the u64 range so every value is equally likely.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        let max = max as u64;
        let zone = u64::MAX - (u64::MAX % max);
        loop {
            let raw = self.next_u64();
            if raw < zone {
                return (raw % max) as u32;
            }
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

impl EntropySource for DeterministicRng {
    #[inline]
    fn next(&mut self, bound: u32) -> u32 {
        self.next_int(bound)
    }
}

/// Scripted entropy: replays a fixed list of values in a loop.
///
/// Each value is reduced modulo the requested bound, so `FixedSequence::new([7])`
/// always answers 7 for any bound above 7.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedSequence {
    values: Vec<u32>,
    cursor: usize,
}

impl FixedSequence {
    /// Create a sequence from the given values.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl EntropySource for FixedSequence {
    fn next(&mut self, bound: u32) -> u32 {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % bound
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a session seed from a session identifier and caller salt.
///
/// Same inputs always give the same seed; changing either input changes it.
pub fn derive_session_seed(session_id: &[u8; 16], salt: &[u8]) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"TREASURE_HUNT_SEED_V1");
    hasher.update(session_id);
    hasher.update(salt);

    let hash = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(seed)
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

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_int_bounds() {
        let mut rng = DeterministicRng::new(1234);

        for _ in 0..1000 {
            assert!(rng.next_int(100) < 100);
        }

        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_next_int_roughly_uniform() {
        let mut rng = DeterministicRng::new(2024);
        let mut buckets = [0u32; 100];

        for _ in 0..10_000 {
            buckets[rng.next(100) as usize] += 1;
        }

        // Expected 100 per bucket; 5 sigma either side.
        for (cell, count) in buckets.iter().enumerate() {
            assert!((50..=150).contains(count), "cell {} drawn {} times", cell, count);
        }
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = DeterministicRng::new(5555);

        for _ in 0..50 {
            rng.next_u64();
        }

        let saved_state = rng.state();
        let next_values: Vec<u64> = (0..10).map(|_| rng.next_u64()).collect();

        rng.set_state(saved_state);

        for expected in next_values {
            assert_eq!(rng.next_u64(), expected);
        }
    }

    #[test]
    fn test_fixed_sequence_cycles_and_reduces() {
        let mut seq = FixedSequence::new([3, 250, 7]);

        assert_eq!(seq.next(100), 3);
        assert_eq!(seq.next(100), 50);
        assert_eq!(seq.next(4), 3);
        assert_eq!(seq.next(100), 3);
        assert_eq!(seq.draws(), 4);
        assert_eq!(seq.next(0), 0);
    }

    #[test]
    fn test_empty_fixed_sequence() {
        let mut seq = FixedSequence::new(Vec::new());
        assert_eq!(seq.next(10), 0);
    }

    #[test]
    fn test_entropy_through_mut_ref() {
        fn draw(source: &mut impl EntropySource) -> u32 {
            source.next(10)
        }

        let mut seq = FixedSequence::new([4]);
        assert_eq!(draw(&mut &mut seq), 4);
    }

    #[test]
    fn test_derive_session_seed() {
        let session = [1u8; 16];

        let seed1 = derive_session_seed(&session, b"alpha");
        let seed2 = derive_session_seed(&session, b"alpha");
        assert_eq!(seed1, seed2);

        assert_ne!(seed1, derive_session_seed(&session, b"beta"));
        assert_ne!(seed1, derive_session_seed(&[2u8; 16], b"alpha"));

        let mut a = DeterministicRng::for_session(&session, b"alpha");
        let mut b = DeterministicRng::new(seed1);
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
