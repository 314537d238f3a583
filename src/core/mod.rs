//! Core deterministic primitives.
//!
//! Grid geometry, entropy sources and state hashing. Nothing here knows
//! about players, stakes or treasure.

pub mod grid;
pub mod rng;
pub mod hash;

// Re-export core types
pub use grid::{Direction, Grid, Position, DEFAULT_GRID_SIZE};
pub use rng::{DeterministicRng, EntropySource, FixedSequence, derive_session_seed};
pub use hash::{StateHash, StateHasher, compute_state_hash};
