//! Game Logic Module
//!
//! All game rules. 100% deterministic given the entropy source.
//!
//! ## Module Structure
//!
//! - `state`: Player registry, treasure and pool balance
//! - `payment`: Join gating and deposits
//! - `movement`: Move validation and commit
//! - `treasure`: Treasure relocation policy
//! - `events`: Game events for logging and replay checks
//! - `session`: Session facade owning state, entropy and event log
//! - `error`: Operation errors

pub mod error;
pub mod state;
pub mod payment;
pub mod movement;
pub mod treasure;
pub mod events;
pub mod session;

// Re-export key types
pub use error::GameError;
pub use state::{Amount, GameState, PlayerId, PlayerState, ORIGIN};
pub use payment::JoinReceipt;
pub use movement::MoveOutcome;
pub use treasure::{Relocation, RelocationCause, TieBreak};
pub use events::{GameEvent, GameEventData};
pub use session::{Action, ActionOutcome, HuntSession};
