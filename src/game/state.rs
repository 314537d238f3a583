//! Game State Definitions
//!
//! The board, the treasure and the player registry.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::grid::{Grid, Position};
use crate::core::rng::EntropySource;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};

/// Value unit for stakes and the pool balance.
pub type Amount = u128;

/// Cell every player (re)starts from.
pub const ORIGIN: Position = 0;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random identifier.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    /// Short form: first four bytes in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..4]))
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// Registry entry for one player.
///
/// Created on first join and never removed for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Unique player ID
    pub id: PlayerId,

    /// Has this player paid in? Only joined players may move.
    pub joined: bool,

    /// Current cell
    pub position: Position,

    /// Total staked across all joins
    pub stake: Amount,

    /// Number of successful joins
    pub joins: u32,
}

impl PlayerState {
    /// Create an unjoined player at the origin.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            joined: false,
            position: ORIGIN,
            stake: 0,
            joins: 0,
        }
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_uuid(&self.id.0);
        hasher.update_bool(self.joined);
        hasher.update_u32(self.position);
        hasher.update_u128(self.stake);
        hasher.update_u32(self.joins);
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one treasure hunt session.
///
/// Mutated only by the payment gate, the movement engine and the treasure
/// relocator; everything else reads it through the accessors below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    grid: Grid,
    treasure: Position,
    players: BTreeMap<PlayerId, PlayerState>,
    pool_balance: Amount,
}

impl GameState {
    /// Create a fresh state, placing the treasure with one uniform draw.
    pub fn new<E: EntropySource + ?Sized>(grid: Grid, entropy: &mut E) -> Self {
        let treasure = entropy.next(grid.cells());
        Self {
            grid,
            treasure,
            players: BTreeMap::new(),
            pool_balance: 0,
        }
    }

    /// Board geometry.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Current treasure cell.
    pub fn treasure_position(&self) -> Position {
        self.treasure
    }

    /// Current cell of a player, if they ever joined.
    pub fn player_position(&self, id: &PlayerId) -> Option<Position> {
        self.players.get(id).map(|p| p.position)
    }

    /// Get a player by ID.
    pub fn get_player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// All players in ID order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    /// Number of registered players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Sum of all stakes and unconditional deposits.
    pub fn pool_balance(&self) -> Amount {
        self.pool_balance
    }

    pub(crate) fn get_player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    pub(crate) fn player_entry(&mut self, id: PlayerId) -> &mut PlayerState {
        self.players.entry(id).or_insert_with(|| PlayerState::new(id))
    }

    pub(crate) fn set_treasure(&mut self, position: Position) {
        debug_assert!(self.grid.contains(position));
        self.treasure = position;
    }

    pub(crate) fn credit_pool(&mut self, amount: Amount) -> Amount {
        self.pool_balance = self.pool_balance.saturating_add(amount);
        self.pool_balance
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self, seed: u64) -> StateHash {
        compute_state_hash(self.grid.size(), seed, |hasher| {
            hasher.update_u32(self.treasure);
            hasher.update_u128(self.pool_balance);

            // Hash all players in sorted order (BTreeMap guarantees this)
            hasher.update_u32(self.players.len() as u32);
            for player in self.players.values() {
                player.hash_into(hasher);
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
