//! Player persistence.
//!
//! The engine only talks to a `PlayerStore`. Three implementations ship
//! with the crate: an in-memory map for tests and embedding, one pretty
//! JSON file per player, and checksummed binary snapshots.

pub mod json;
pub mod memory;
pub mod snapshot;

pub use json::JsonPlayerStore;
pub use memory::InMemoryPlayerStore;
pub use snapshot::SnapshotPlayerStore;

use crate::core::game_state::PlayerState;
use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("corrupted data: {0}")]
    Corrupted(String),

    #[error("player id {0:?} cannot be used as a file name")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage for player state, keyed by player id.
pub trait PlayerStore: Send + Sync {
    /// Returns `None` when no player with this id exists.
    fn get(&self, id: &str) -> Result<Option<PlayerState>>;

    /// Inserts or replaces the player.
    fn save(&self, player: &PlayerState) -> Result<()>;

    /// Removes the player, returning whether it existed.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Ids of every stored player, sorted.
    fn list_ids(&self) -> Result<Vec<String>>;

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

impl<T: PlayerStore + ?Sized> PlayerStore for Box<T> {
    fn get(&self, id: &str) -> Result<Option<PlayerState>> {
        (**self).get(id)
    }

    fn save(&self, player: &PlayerState) -> Result<()> {
        (**self).save(player)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        (**self).list_ids()
    }
}

/// Maps a player id onto a file stem.
///
/// Only ASCII alphanumerics, `-` and `_` survive; anything else would let an
/// id escape the store directory or collide across platforms.
pub fn file_stem_for(id: &str) -> Result<String> {
    let stem: String = id
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() || stem != id {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(stem)
}
