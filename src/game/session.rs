//! Hunt Session
//!
//! Owns one game: config, state, entropy and the event log. All mutation
//! goes through `&mut self`, so operations are serialized by construction
//! and every operation either applies completely or not at all.

use serde::{Serialize, Deserialize};
use tracing::{info, warn, instrument};

use crate::config::{ConfigError, HuntConfig};
use crate::core::grid::Position;
use crate::core::hash::StateHash;
use crate::core::rng::{DeterministicRng, EntropySource, derive_session_seed};
use crate::game::error::GameError;
use crate::game::events::GameEvent;
use crate::game::movement::{self, MoveOutcome};
use crate::game::payment::{self, JoinReceipt};
use crate::game::state::{Amount, GameState, PlayerId, PlayerState};

/// A caller request, in a form that can be logged and replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Join (or re-join) with a stake
    Join { player_id: PlayerId, stake: Amount },
    /// Step in a direction
    Move { player_id: PlayerId, direction_code: u32 },
    /// Deposit into the pool
    Receive { from: PlayerId, amount: Amount },
}

/// Result of an applied action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Join accepted
    Joined(JoinReceipt),
    /// Move committed
    Moved(MoveOutcome),
    /// Deposit credited; carries the new pool balance
    Received(Amount),
}

/// One treasure hunt game.
#[derive(Debug)]
pub struct HuntSession<E: EntropySource = DeterministicRng> {
    config: HuntConfig,
    seed: u64,
    state: GameState,
    entropy: E,
    events: Vec<GameEvent>,
    next_seq: u64,
    history: Vec<Action>,
}

impl HuntSession<DeterministicRng> {
    /// Start a session driven by the seeded Xorshift generator.
    ///
    /// Without a configured seed, one is derived from a fresh session id.
    pub fn new(config: HuntConfig) -> Result<Self, ConfigError> {
        let seed = match config.seed {
            Some(seed) => seed,
            None => derive_session_seed(uuid::Uuid::new_v4().as_bytes(), b"session"),
        };
        Self::build(config, seed, DeterministicRng::new(seed))
    }

    /// Rebuild a session by re-applying an action log.
    ///
    /// Returns the session and the per-action results. The same config,
    /// seed and log always produce the same state hash.
    pub fn replay(
        config: HuntConfig,
        seed: u64,
        actions: &[Action],
    ) -> Result<(Self, Vec<Result<ActionOutcome, GameError>>), ConfigError> {
        let config = HuntConfig { seed: Some(seed), ..config };
        let mut session = Self::new(config)?;
        let results = actions.iter().map(|action| session.apply(*action)).collect();
        Ok((session, results))
    }
}

impl<E: EntropySource> HuntSession<E> {
    /// Start a session with a caller-supplied entropy source.
    ///
    /// The config seed (or 0) is recorded for state hashing only.
    pub fn with_entropy(config: HuntConfig, entropy: E) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or(0);
        Self::build(config, seed, entropy)
    }

    fn build(config: HuntConfig, seed: u64, mut entropy: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(config.grid(), &mut entropy);

        info!(
            grid_size = config.grid_size,
            seed,
            treasure = state.treasure_position(),
            "session started"
        );

        Ok(Self {
            config,
            seed,
            state,
            entropy,
            events: Vec::new(),
            next_seq: 0,
            history: Vec::new(),
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Join with a positive stake; the player is (re)placed at the origin.
    #[instrument(level = "debug", skip(self, player_id), fields(player = %player_id))]
    pub fn join_game(&mut self, player_id: PlayerId, stake: Amount) -> Result<JoinReceipt, GameError> {
        let receipt = payment::join_game(&mut self.state, player_id, stake).inspect_err(|err| {
            warn!(player = %player_id, stake, %err, "join rejected");
        })?;

        info!(
            player = %player_id,
            stake,
            rejoined = receipt.rejoined,
            pool = receipt.pool_balance,
            "player joined"
        );
        let seq = self.bump_seq();
        self.events.push(GameEvent::player_joined(seq, player_id, stake, receipt.rejoined));
        self.history.push(Action::Join { player_id, stake });

        Ok(receipt)
    }

    /// Step a joined player; may relocate the treasure.
    #[instrument(level = "debug", skip(self, player_id), fields(player = %player_id))]
    pub fn move_player(&mut self, player_id: PlayerId, direction_code: u32) -> Result<MoveOutcome, GameError> {
        let outcome = movement::move_player(
            &mut self.state,
            player_id,
            direction_code,
            &mut self.entropy,
            self.config.tie_break,
        )
        .inspect_err(|err| {
            warn!(player = %player_id, direction_code, %err, "move rejected");
        })?;

        info!(
            player = %player_id,
            direction = %outcome.direction,
            from = outcome.from,
            to = outcome.to,
            "player moved"
        );
        let seq = self.bump_seq();
        self.events.push(GameEvent::player_moved(
            seq,
            player_id,
            outcome.direction,
            outcome.from,
            outcome.to,
        ));

        if let Some(relocation) = outcome.relocation {
            info!(
                from = relocation.from,
                to = relocation.to,
                cause = ?relocation.cause,
                "treasure relocated"
            );
            let seq = self.bump_seq();
            self.events.push(GameEvent::treasure_relocated(seq, relocation));
        }
        self.history.push(Action::Move { player_id, direction_code });

        Ok(outcome)
    }

    /// Accept an unconditional deposit. Always succeeds.
    pub fn receive_value(&mut self, from: PlayerId, amount: Amount) -> Amount {
        let new_balance = payment::receive_value(&mut self.state, amount);

        info!(from = %from, amount, pool = new_balance, "value received");
        let seq = self.bump_seq();
        self.events.push(GameEvent::value_received(seq, from, amount, new_balance));
        self.history.push(Action::Receive { from, amount });

        new_balance
    }

    /// Apply any action.
    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome, GameError> {
        match action {
            Action::Join { player_id, stake } => self.join_game(player_id, stake).map(ActionOutcome::Joined),
            Action::Move { player_id, direction_code } => {
                self.move_player(player_id, direction_code).map(ActionOutcome::Moved)
            }
            Action::Receive { from, amount } => Ok(ActionOutcome::Received(self.receive_value(from, amount))),
        }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current treasure cell.
    pub fn treasure_position(&self) -> Position {
        self.state.treasure_position()
    }

    /// Current cell of a player, if they ever joined.
    pub fn player_position(&self, id: &PlayerId) -> Option<Position> {
        self.state.player_position(id)
    }

    /// Registry entry for a player.
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.state.get_player(id)
    }

    /// Pool balance.
    pub fn pool_balance(&self) -> Amount {
        self.state.pool_balance()
    }

    /// Full game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Session config.
    pub fn config(&self) -> &HuntConfig {
        &self.config
    }

    /// Seed recorded for this session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Events not yet taken.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Successful actions, in order.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Hash of the current game state.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash(self.seed)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::FixedSequence;
    use crate::game::events::GameEventData;
    use crate::game::treasure::{RelocationCause, TieBreak};
    use proptest::prelude::*;

    const UP: u32 = 0;
    const DOWN: u32 = 1;
    const RIGHT: u32 = 3;

    fn alice() -> PlayerId {
        PlayerId::new([1; 16])
    }

    fn bob() -> PlayerId {
        PlayerId::new([2; 16])
    }

    fn scripted(values: impl IntoIterator<Item = u32>) -> HuntSession<FixedSequence> {
        HuntSession::with_entropy(HuntConfig::seeded(7), FixedSequence::new(values)).unwrap()
    }

    #[test]
    fn test_treasure_initialized_in_bounds() {
        for seed in 0..50 {
            let session = HuntSession::new(HuntConfig::seeded(seed)).unwrap();
            assert!(session.treasure_position() < 100);
        }
        let unseeded = HuntSession::new(HuntConfig::default()).unwrap();
        assert!(unseeded.treasure_position() < 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HuntConfig { grid_size: 0, ..HuntConfig::default() };
        assert!(matches!(HuntSession::new(config), Err(ConfigError::InvalidGridSize(0))));
    }

    #[test]
    fn test_join_then_move_down() {
        let mut session = scripted([60, 0]);

        session.join_game(alice(), 100).unwrap();
        assert_eq!(session.player_position(&alice()), Some(0));

        let outcome = session.move_player(alice(), DOWN).unwrap();
        assert_eq!(outcome.to, 10);
        assert_eq!(session.player_position(&alice()), Some(10));
        // Cell 10 hops the treasure from 60 to its first neighbour (50).
        assert_eq!(session.treasure_position(), 50);
    }

    #[test]
    fn test_zero_stake_join_fails() {
        let mut session = scripted([60]);
        let hash = session.compute_hash();

        assert_eq!(session.join_game(alice(), 0), Err(GameError::InsufficientStake));
        assert_eq!(session.player_position(&alice()), None);
        assert_eq!(session.compute_hash(), hash);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_move_before_join_fails() {
        let mut session = scripted([60]);
        assert_eq!(session.move_player(bob(), DOWN), Err(GameError::NotJoined(bob())));
    }

    #[test]
    fn test_invalid_codes_fail_and_leave_position() {
        let mut session = scripted([60]);
        session.join_game(alice(), 1).unwrap();

        for code in [UP, 100, 255] {
            assert_eq!(
                session.move_player(alice(), code),
                Err(GameError::InvalidPosition { from: 0, direction_code: code })
            );
            assert_eq!(session.player_position(&alice()), Some(0));
        }
    }

    #[test]
    fn test_rejoin_resets_after_moves() {
        let mut session = scripted([60, 0, 0]);
        session.join_game(alice(), 1).unwrap();
        session.move_player(alice(), DOWN).unwrap();
        session.move_player(alice(), RIGHT).unwrap();
        assert_eq!(session.player_position(&alice()), Some(11));

        let receipt = session.join_game(alice(), 1).unwrap();
        assert!(receipt.rejoined);
        assert_eq!(session.player_position(&alice()), Some(0));
    }

    #[test]
    fn test_receive_value_and_pool() {
        let mut session = scripted([60]);
        session.join_game(alice(), 40).unwrap();

        assert_eq!(session.receive_value(bob(), 2), 42);
        assert_eq!(session.pool_balance(), 42);
        // Depositing does not register the sender as a player.
        assert!(session.player(&bob()).is_none());
    }

    #[test]
    fn test_events_for_move_with_relocation() {
        let mut session = scripted([60, 9]);
        session.join_game(alice(), 5).unwrap();
        session.move_player(alice(), RIGHT).unwrap(); // cell 1
        session.move_player(alice(), RIGHT).unwrap(); // cell 2, prime

        let events = session.take_events();
        let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);

        assert!(matches!(events[0].data, GameEventData::PlayerJoined { stake: 5, rejoined: false, .. }));
        assert!(matches!(events[2].data, GameEventData::PlayerMoved { from: 1, to: 2, .. }));
        assert_eq!(
            events[3].data,
            GameEventData::TreasureRelocated { from: 60, to: 9, cause: RelocationCause::PrimeLanding }
        );
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_tie_break_from_config() {
        let config = HuntConfig { tie_break: TieBreak::MultipleOfFiveFirst, ..HuntConfig::seeded(1) };
        let mut session = HuntSession::with_entropy(config, FixedSequence::new([44, 0, 0, 0])).unwrap();
        session.join_game(alice(), 1).unwrap();
        for _ in 0..5 {
            session.move_player(alice(), RIGHT).unwrap();
        }
        // Landing on 2 and 3 redrew to 0 % 100; landing on 5 hopped from 0 to 10.
        assert_eq!(session.player_position(&alice()), Some(5));
        assert_eq!(session.treasure_position(), 10);
    }

    #[test]
    fn test_history_records_successes_only() {
        let mut session = scripted([60]);
        session.join_game(alice(), 0).unwrap_err();
        session.join_game(alice(), 3).unwrap();
        session.move_player(alice(), UP).unwrap_err();
        session.receive_value(bob(), 1);

        assert_eq!(
            session.history(),
            &[
                Action::Join { player_id: alice(), stake: 3 },
                Action::Receive { from: bob(), amount: 1 },
            ]
        );
    }

    #[test]
    fn test_replay_reproduces_state() {
        let mut session = HuntSession::new(HuntConfig::seeded(99)).unwrap();
        let script = [
            Action::Join { player_id: alice(), stake: 10 },
            Action::Join { player_id: bob(), stake: 20 },
            Action::Move { player_id: alice(), direction_code: RIGHT },
            Action::Move { player_id: alice(), direction_code: RIGHT },
            Action::Move { player_id: bob(), direction_code: DOWN },
            Action::Receive { from: bob(), amount: 5 },
            Action::Move { player_id: bob(), direction_code: UP },
        ];
        for action in script {
            let _ = session.apply(action);
        }

        let (replayed, results) =
            HuntSession::replay(HuntConfig::default(), session.seed(), session.history()).unwrap();

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(replayed.compute_hash(), session.compute_hash());
        assert_eq!(replayed.state(), session.state());
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        let player = (0u8..3).prop_map(|b| PlayerId::new([b; 16]));
        prop_oneof![
            (player.clone(), 0u128..3).prop_map(|(player_id, stake)| Action::Join { player_id, stake }),
            (player.clone(), 0u32..6).prop_map(|(player_id, direction_code)| Action::Move {
                player_id,
                direction_code
            }),
            (player, 0u128..3).prop_map(|(from, amount)| Action::Receive { from, amount }),
        ]
    }

    proptest! {
        #[test]
        fn prop_positions_stay_on_board(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 0..200)) {
            let mut session = HuntSession::new(HuntConfig::seeded(seed)).unwrap();
            for action in actions {
                let _ = session.apply(action);
                prop_assert!(session.treasure_position() < 100);
                for player in session.state().players() {
                    prop_assert!(player.position < 100);
                }
            }
        }

        #[test]
        fn prop_failed_actions_change_nothing(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 0..100)) {
            let mut session = HuntSession::new(HuntConfig::seeded(seed)).unwrap();
            for action in actions {
                let state = session.state().clone();
                let events = session.events().len();
                let history = session.history().len();

                if session.apply(action).is_err() {
                    prop_assert_eq!(session.state(), &state);
                    prop_assert_eq!(session.events().len(), events);
                    prop_assert_eq!(session.history().len(), history);
                }
            }
        }

        #[test]
        fn prop_replay_is_deterministic(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 0..100)) {
            let (a, results_a) = HuntSession::replay(HuntConfig::default(), seed, &actions).unwrap();
            let (b, results_b) = HuntSession::replay(HuntConfig::default(), seed, &actions).unwrap();

            prop_assert_eq!(results_a, results_b);
            prop_assert_eq!(a.compute_hash(), b.compute_hash());
        }
    }
}
