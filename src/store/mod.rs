//! Player persistence
//!
//! A [`PlayerStore`] keeps one record per user id and owns two guarantees:
//!
//! - reads and writes for the same id are serialized, so a read-modify-write
//!   through [`PlayerStore::modify`] never loses a concurrent update
//! - every write that touches an attribute also rewrites `total_score`
//!
//! # Backends
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  SqlitePlayerStore   │   │  MemoryPlayerStore   │
//! │  (players.db, WAL)   │   │  (per-id mutexes)    │
//! └──────────────────────┘   └──────────────────────┘
//! ```

mod db;
mod error;
mod memory;
mod sqlite;

pub use db::PlayerDb;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryPlayerStore;
pub use sqlite::SqlitePlayerStore;

use crate::domain::{Attribute, MagicSet, Player, Race, UserId};

/// A set of field writes applied to one stored player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub attributes: Vec<(Attribute, u16)>,
    pub race: Option<Race>,
    pub magic: Option<MagicSet>,
    pub last_meditation: Option<i64>,
}

impl PlayerUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, attribute: Attribute, value: u16) -> Self {
        self.attributes.push((attribute, value));
        self
    }

    pub fn race(mut self, race: Race) -> Self {
        self.race = Some(race);
        self
    }

    pub fn magic(mut self, magic: MagicSet) -> Self {
        self.magic = Some(magic);
        self
    }

    pub fn last_meditation(mut self, at: i64) -> Self {
        self.last_meditation = Some(at);
        self
    }

    /// The writes that turn `before` into `after`
    pub fn diff(before: &Player, after: &Player) -> Self {
        Self {
            attributes: after.attributes().changed_from(before.attributes()),
            race: after.race.filter(|r| before.race != Some(*r)),
            magic: (after.magic != before.magic).then(|| after.magic.clone()),
            last_meditation: after
                .last_meditation
                .filter(|t| before.last_meditation != Some(*t)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.race.is_none()
            && self.magic.is_none()
            && self.last_meditation.is_none()
    }

    pub fn touches_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Apply to an in-memory record. Attribute writes go through the
    /// player's setters, which keep the total in step.
    pub fn apply_to(&self, player: &mut Player) {
        for &(attribute, value) in &self.attributes {
            player.set_attribute(attribute, value);
        }
        if let Some(race) = self.race {
            player.race = Some(race);
        }
        if let Some(magic) = &self.magic {
            player.magic = magic.clone();
        }
        if let Some(at) = self.last_meditation {
            player.last_meditation = Some(at);
        }
    }
}

/// Durable table of players keyed by user id
pub trait PlayerStore: Send + Sync {
    /// Load a player without creating one
    fn get(&self, id: UserId) -> StoreResult<Option<Player>>;

    /// Load a player, inserting a default record first if none exists.
    /// Concurrent first access for the same id inserts exactly once.
    fn get_or_create(&self, id: UserId) -> StoreResult<Player>;

    /// Apply field writes to an existing record and return the stored result.
    /// Fails with [`StoreError::Missing`] when the id has no record.
    fn save(&self, id: UserId, update: &PlayerUpdate) -> StoreResult<Player>;

    /// Serialized read-modify-write.
    ///
    /// Loads the record (creating it first when `create_missing` is set),
    /// hands a copy to `f`, and persists whatever `f` changed. Nothing is
    /// written when `f` fails. Returns `None` when the record does not exist
    /// and `create_missing` is false.
    fn modify<T, E, F>(&self, id: UserId, create_missing: bool, f: F) -> Result<Option<(Player, T)>, E>
    where
        F: FnOnce(&mut Player) -> Result<T, E>,
        E: From<StoreError>;

    /// Players with the highest total score, best first. Ties keep
    /// insertion order.
    fn top_n(&self, n: usize) -> StoreResult<Vec<Player>>;

    /// 1-based position of a player under the `top_n` ordering
    fn rank_of(&self, id: UserId) -> StoreResult<Option<usize>>;

    /// Number of stored players
    fn count(&self) -> StoreResult<u64>;
}
