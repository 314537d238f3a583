//! Treasure Relocation
//!
//! After every committed move the landing cell decides what happens to the
//! treasure:
//!
//! - prime cell: redraw uniformly over the whole board
//! - non-zero multiple of five: hop to a random orthogonal neighbour
//! - anything else: stay put
//!
//! The decision depends only on the landing cell and the entropy draws,
//! never on who moved.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::grid::Position;
use crate::core::rng::EntropySource;
use crate::game::state::GameState;

/// Rule that wins when a cell is both prime and a non-zero multiple of five.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Redraw the treasure uniformly (cell 5 triggers a full redraw).
    #[default]
    PrimeFirst,
    /// Hop to a neighbour (cell 5 triggers a neighbour hop).
    MultipleOfFiveFirst,
}

/// Why the treasure moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelocationCause {
    /// Player landed on a prime cell
    PrimeLanding,
    /// Player landed on a non-zero multiple of five
    MultipleOfFiveLanding,
}

/// A treasure move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// Previous treasure cell
    pub from: Position,
    /// New treasure cell (may equal `from` after a redraw)
    pub to: Position,
    /// Triggering rule
    pub cause: RelocationCause,
}

/// Trial-division primality test. 0 and 1 are not prime.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let n = n as u64;
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Which rule, if any, a landing cell triggers.
pub fn classify(landing: Position, tie_break: TieBreak) -> Option<RelocationCause> {
    let prime = is_prime(landing);
    let five = landing > 0 && landing % 5 == 0;

    match (prime, five, tie_break) {
        (true, true, TieBreak::MultipleOfFiveFirst) => Some(RelocationCause::MultipleOfFiveLanding),
        (true, _, _) => Some(RelocationCause::PrimeLanding),
        (false, true, _) => Some(RelocationCause::MultipleOfFiveLanding),
        (false, false, _) => None,
    }
}

/// Apply the relocation policy for a player who just landed on `landing`.
///
/// Returns the relocation performed, or `None` when the treasure stays.
/// A neighbour hop from a cell with no neighbours is a no-op.
pub fn on_move_committed<E: EntropySource + ?Sized>(
    state: &mut GameState,
    landing: Position,
    entropy: &mut E,
    tie_break: TieBreak,
) -> Option<Relocation> {
    let cause = classify(landing, tie_break)?;
    let grid = state.grid();
    let from = state.treasure_position();

    let to = match cause {
        RelocationCause::PrimeLanding => entropy.next(grid.cells()),
        RelocationCause::MultipleOfFiveLanding => {
            let neighbors = grid.neighbors(from);
            if neighbors.is_empty() {
                debug!(from, "treasure has no neighbour, staying put");
                return None;
            }
            neighbors[entropy.next(neighbors.len() as u32) as usize]
        }
    };

    debug!(landing, ?cause, from, to, "treasure relocated");
    state.set_treasure(to);

    Some(Relocation { from, to, cause })
}

// =============================================================================
// TESTS
// =============================================================================
