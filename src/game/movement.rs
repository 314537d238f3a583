//! Movement Engine
//!
//! Validates and commits a single step for a joined player, then hands the
//! landing cell to the treasure relocator. Validation happens entirely before
//! the first write, so a rejected move leaves the state untouched.

use crate::core::grid::{Direction, Grid, Position};
use crate::core::rng::EntropySource;
use crate::game::error::GameError;
use crate::game::state::{GameState, PlayerId};
use crate::game::treasure::{on_move_committed, Relocation, TieBreak};

/// Result of a committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Player who moved
    pub player_id: PlayerId,
    /// Direction taken
    pub direction: Direction,
    /// Cell before the move
    pub from: Position,
    /// Cell after the move
    pub to: Position,
    /// Treasure relocation caused by landing on `to`
    pub relocation: Option<Relocation>,
}

/// Candidate cell for `direction_code` from `from`.
///
/// Total and side-effect free: unknown codes and steps off the board
/// both yield `None`.
pub fn candidate_position(grid: Grid, from: Position, direction_code: u32) -> Option<(Direction, Position)> {
    let direction = Direction::from_code(direction_code)?;
    grid.step(from, direction).map(|to| (direction, to))
}

/// Validate and commit a move, then run the relocation policy.
///
/// # Errors
///
/// - [`GameError::NotJoined`] if the player has not joined.
/// - [`GameError::InvalidPosition`] if the direction code does not lead to a
///   cell on the board.
pub fn move_player<E: EntropySource + ?Sized>(
    state: &mut GameState,
    player_id: PlayerId,
    direction_code: u32,
    entropy: &mut E,
    tie_break: TieBreak,
) -> Result<MoveOutcome, GameError> {
    let from = match state.get_player(&player_id) {
        Some(player) if player.joined => player.position,
        _ => return Err(GameError::NotJoined(player_id)),
    };

    let (direction, to) = candidate_position(state.grid(), from, direction_code)
        .ok_or(GameError::InvalidPosition { from, direction_code })?;

    // Commit. Nothing below can fail.
    if let Some(player) = state.get_player_mut(&player_id) {
        player.position = to;
    }
    let relocation = on_move_committed(state, to, entropy, tie_break);

    Ok(MoveOutcome {
        player_id,
        direction,
        from,
        to,
        relocation,
    })
}

// =============================================================================
// TESTS
// =============================================================================
