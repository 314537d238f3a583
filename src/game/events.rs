//! Game Events
//!
//! Append-only record of every successful operation, for logging and replay
//! checks. Rejected operations never produce events.

use serde::{Serialize, Deserialize};

use crate::core::grid::{Direction, Position};
use crate::game::state::{Amount, PlayerId};
use crate::game::treasure::{Relocation, RelocationCause};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player paid in and was placed at the origin
    PlayerJoined {
        player_id: PlayerId,
        stake: Amount,
        rejoined: bool,
    },

    /// Player stepped to a new cell
    PlayerMoved {
        player_id: PlayerId,
        direction: Direction,
        from: Position,
        to: Position,
    },

    /// Treasure changed cell
    TreasureRelocated {
        from: Position,
        to: Position,
        cause: RelocationCause,
    },

    /// Unconditional deposit into the pool
    ValueReceived {
        from: PlayerId,
        amount: Amount,
        new_balance: Amount,
    },
}

/// A game event with its position in the session log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Monotonic sequence number within the session
    pub seq: u64,

    /// Player involved, if any
    pub player_id: Option<PlayerId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(seq: u64, data: GameEventData) -> Self {
        let player_id = match &data {
            GameEventData::PlayerJoined { player_id, .. } => Some(*player_id),
            GameEventData::PlayerMoved { player_id, .. } => Some(*player_id),
            GameEventData::ValueReceived { from, .. } => Some(*from),
            GameEventData::TreasureRelocated { .. } => None,
        };

        Self { seq, player_id, data }
    }

    /// Create player joined event.
    pub fn player_joined(seq: u64, player_id: PlayerId, stake: Amount, rejoined: bool) -> Self {
        Self::new(seq, GameEventData::PlayerJoined { player_id, stake, rejoined })
    }

    /// Create player moved event.
    pub fn player_moved(
        seq: u64,
        player_id: PlayerId,
        direction: Direction,
        from: Position,
        to: Position,
    ) -> Self {
        Self::new(seq, GameEventData::PlayerMoved { player_id, direction, from, to })
    }

    /// Create treasure relocated event.
    pub fn treasure_relocated(seq: u64, relocation: Relocation) -> Self {
        Self::new(
            seq,
            GameEventData::TreasureRelocated {
                from: relocation.from,
                to: relocation.to,
                cause: relocation.cause,
            },
        )
    }

    /// Create value received event.
    pub fn value_received(seq: u64, from: PlayerId, amount: Amount, new_balance: Amount) -> Self {
        Self::new(seq, GameEventData::ValueReceived { from, amount, new_balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_player_attribution() {
        let id = PlayerId::new([3; 16]);

        assert_eq!(GameEvent::player_joined(0, id, 5, false).player_id, Some(id));
        assert_eq!(GameEvent::player_moved(1, id, Direction::Down, 0, 10).player_id, Some(id));
        assert_eq!(GameEvent::value_received(2, id, 1, 6).player_id, Some(id));

        let relocation = Relocation { from: 1, to: 2, cause: RelocationCause::PrimeLanding };
        assert_eq!(GameEvent::treasure_relocated(3, relocation).player_id, None);
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::player_joined(7, PlayerId::new([0; 16]), 100, true);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["seq"], 7);
        assert_eq!(json["data"]["PlayerJoined"]["rejoined"], true);
    }
}
