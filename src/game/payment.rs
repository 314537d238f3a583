//! Payment Gate
//!
//! Admission into the hunt. A join with a positive stake is the only way a
//! player becomes able to move.

use crate::game::error::GameError;
use crate::game::state::{Amount, GameState, PlayerId, ORIGIN};

/// Result of a successful join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinReceipt {
    /// Player who joined
    pub player_id: PlayerId,
    /// Stake paid by this join
    pub stake: Amount,
    /// True if the player had joined before (position was reset)
    pub rejoined: bool,
    /// Pool balance after crediting the stake
    pub pool_balance: Amount,
}

/// Validate and record a join.
///
/// Re-joining is allowed and always sends the player back to the origin.
/// A zero stake fails with [`GameError::InsufficientStake`] and changes nothing.
pub fn join_game(
    state: &mut GameState,
    player_id: PlayerId,
    stake: Amount,
) -> Result<JoinReceipt, GameError> {
    if stake == 0 {
        return Err(GameError::InsufficientStake);
    }

    let player = state.player_entry(player_id);
    let rejoined = player.joined;
    player.joined = true;
    player.position = ORIGIN;
    player.stake = player.stake.saturating_add(stake);
    player.joins = player.joins.saturating_add(1);

    let pool_balance = state.credit_pool(stake);

    Ok(JoinReceipt {
        player_id,
        stake,
        rejoined,
        pool_balance,
    })
}

/// Accept an unconditional deposit into the pool. Never fails.
pub fn receive_value(state: &mut GameState, amount: Amount) -> Amount {
    state.credit_pool(amount)
}

// =============================================================================
// TESTS
// =============================================================================
