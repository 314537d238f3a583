//! Game operation errors.

use crate::core::grid::Position;
use crate::game::state::PlayerId;

/// Rejection of a single join or move.
///
/// Every variant leaves the game state exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Join attempted with a zero stake.
    #[error("Minimum stake should be greater than zero")]
    InsufficientStake,

    /// Move attempted by a player who never joined.
    #[error("Player {0} should join game before move")]
    NotJoined(PlayerId),

    /// Move target is off the board, or the direction code is unknown.
    #[error("Invalid position: direction {direction_code} from cell {from}")]
    InvalidPosition {
        /// Cell the player tried to leave.
        from: Position,
        /// Direction code as submitted.
        direction_code: u32,
    },
}
