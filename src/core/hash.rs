//! State Hashing for Verification
//!
//! Deterministic SHA-256 digests of game state, used to compare sessions
//! after replay and to prove a rejected operation left nothing behind.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game state.
    pub fn for_game_state() -> Self {
        Self::new(b"TREASURE_HUNT_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u128 value (little-endian).
    #[inline]
    pub fn update_u128(&mut self, value: u128) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a UUID (16 bytes).
    #[inline]
    pub fn update_uuid(&mut self, uuid: &[u8; 16]) {
        self.hasher.update(uuid);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute the state hash of a session.
///
/// Grid size and seed are always hashed first; the closure adds the rest.
pub fn compute_state_hash<F>(grid_size: u32, seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    hasher.update_u32(grid_size);
    hasher.update_u64(seed);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_game_state();
            hasher.update_u32(100);
            hasher.update_u64(12345);
            hasher.update_u128(1_000_000_000_000_000_000);
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(10, 12345, |hasher| hasher.update_u32(42));
        let hash2 = compute_state_hash(10, 12345, |hasher| hasher.update_u32(42));
        assert_eq!(hash, hash2);

        let other_seed = compute_state_hash(10, 12346, |hasher| hasher.update_u32(42));
        assert_ne!(hash, other_seed);

        let other_grid = compute_state_hash(11, 12345, |hasher| hasher.update_u32(42));
        assert_ne!(hash, other_grid);
    }
}
