//! # Treasure Hunt
//!
//! Deterministic grid treasure hunt engine. Players stake value to join,
//! step around an N×N board, and a hidden treasure relocates when a player
//! lands on certain cells.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TREASURE HUNT                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── grid.rs     - Board geometry and directions             │
//! │  ├── rng.rs      - Entropy sources (Xorshift128+, scripted)  │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game rules                                │
//! │  ├── state.rs    - Player registry, treasure, pool           │
//! │  ├── payment.rs  - Join gating and deposits                  │
//! │  ├── movement.rs - Move validation and commit                │
//! │  ├── treasure.rs - Relocation policy                         │
//! │  ├── events.rs   - Event log                                 │
//! │  └── session.rs  - Session facade and replay                 │
//! │                                                              │
//! │  config.rs       - JSON session configuration                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! All randomness flows through [`crate::core::rng::EntropySource`]. Given the
//! same config, seed and action log, a session reaches a bit-identical
//! state (see [`crate::game::session::HuntSession::replay`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::config::{ConfigError, HuntConfig};
pub use crate::core::grid::{Direction, Grid, Position, DEFAULT_GRID_SIZE};
pub use crate::core::rng::{DeterministicRng, EntropySource, FixedSequence};
pub use crate::game::error::GameError;
pub use crate::game::session::{Action, ActionOutcome, HuntSession};
pub use crate::game::state::{Amount, GameState, PlayerId, PlayerState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
