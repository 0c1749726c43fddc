//! In-memory player store
//!
//! Each player lives behind its own mutex, so operations on different ids
//! never wait on each other. The outer map lock is held only to look up or
//! insert an entry; a `modify` that creates a player holds it until the
//! new record is ready to publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::error::{StoreError, StoreResult};
use super::{PlayerStore, PlayerUpdate};
use crate::domain::{Player, UserId};

struct Entry {
    seq: u64,
    player: Mutex<Player>,
}

#[derive(Default)]
pub struct MemoryPlayerStore {
    entries: RwLock<HashMap<UserId, Arc<Entry>>>,
    next_seq: AtomicU64,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: UserId) -> StoreResult<Option<Arc<Entry>>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(&id).cloned())
    }

    /// Insert-if-absent under the write lock
    fn entry_or_create(&self, id: UserId) -> StoreResult<Arc<Entry>> {
        if let Some(entry) = self.entry(id)? {
            return Ok(entry);
        }
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let entry = entries.entry(id).or_insert_with(|| {
            tracing::info!(user_id = %id, "Created player");
            Arc::new(Entry {
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                player: Mutex::new(Player::new(id)),
            })
        });
        Ok(Arc::clone(entry))
    }

    /// Consistent-per-entry copy of all players with their insertion sequence
    fn snapshot(&self) -> StoreResult<Vec<(u64, Player)>> {
        let entries: Vec<Arc<Entry>> = {
            let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
            map.values().cloned().collect()
        };
        entries
            .iter()
            .map(|e| {
                let player = e.player.lock().map_err(|_| StoreError::LockPoisoned)?;
                Ok((e.seq, player.clone()))
            })
            .collect()
    }

    fn ranked(&self) -> StoreResult<Vec<(u64, Player)>> {
        let mut all = self.snapshot()?;
        all.sort_by(|(seq_a, a), (seq_b, b)| {
            b.total_score()
                .cmp(&a.total_score())
                .then(seq_a.cmp(seq_b))
        });
        Ok(all)
    }
}

impl PlayerStore for MemoryPlayerStore {
    fn get(&self, id: UserId) -> StoreResult<Option<Player>> {
        let Some(entry) = self.entry(id)? else {
            return Ok(None);
        };
        let player = entry.player.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(Some(player.clone()))
    }

    fn get_or_create(&self, id: UserId) -> StoreResult<Player> {
        let entry = self.entry_or_create(id)?;
        let player = entry.player.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(player.clone())
    }

    fn save(&self, id: UserId, update: &PlayerUpdate) -> StoreResult<Player> {
        let entry = self.entry(id)?.ok_or(StoreError::Missing(id))?;
        let mut player = entry.player.lock().map_err(|_| StoreError::LockPoisoned)?;
        update.apply_to(&mut player);
        Ok(player.clone())
    }

    fn modify<T, E, F>(&self, id: UserId, create_missing: bool, f: F) -> Result<Option<(Player, T)>, E>
    where
        F: FnOnce(&mut Player) -> Result<T, E>,
        E: From<StoreError>,
    {
        let entry = match self.entry(id)? {
            Some(entry) => entry,
            None if !create_missing => return Ok(None),
            None => {
                let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
                match entries.get(&id) {
                    Some(entry) => Arc::clone(entry),
                    None => {
                        // A new record is published only once f has succeeded
                        let mut player = Player::new(id);
                        let value = f(&mut player)?;
                        tracing::info!(user_id = %id, "Created player");
                        entries.insert(
                            id,
                            Arc::new(Entry {
                                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                                player: Mutex::new(player.clone()),
                            }),
                        );
                        return Ok(Some((player, value)));
                    }
                }
            }
        };

        let mut stored = entry.player.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut working = stored.clone();
        let value = f(&mut working)?;

        let update = PlayerUpdate::diff(&stored, &working);
        update.apply_to(&mut stored);
        if !update.is_empty() {
            tracing::debug!(user_id = %id, ?update, "Modified player");
        }
        Ok(Some((stored.clone(), value)))
    }

    fn top_n(&self, n: usize) -> StoreResult<Vec<Player>> {
        Ok(self
            .ranked()?
            .into_iter()
            .take(n)
            .map(|(_, p)| p)
            .collect())
    }

    fn rank_of(&self, id: UserId) -> StoreResult<Option<usize>> {
        Ok(self
            .ranked()?
            .iter()
            .position(|(_, p)| p.id == id)
            .map(|i| i + 1))
    }

    fn count(&self) -> StoreResult<u64> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionSettings;
    use crate::domain::{Attribute, Race};
    use crate::progression::{ProgressionEngine, ProgressionError};
    use std::thread;

    #[test]
    fn test_concurrent_first_access_creates_once() {
        let store = Arc::new(MemoryPlayerStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.get_or_create(UserId(1)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_modify_loses_no_update() {
        let store = Arc::new(MemoryPlayerStore::new());
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .modify::<_, StoreError, _>(UserId(1), true, |p| {
                            p.increase_attribute(Attribute::Luck, 1);
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let p = store.get(UserId(1)).unwrap().unwrap();
        assert_eq!(p.attribute(Attribute::Luck), 30);
        assert_eq!(p.total_score(), 130);
    }

    #[test]
    fn test_failed_modify_does_not_create_player() {
        let store = MemoryPlayerStore::new();
        let result = store.modify::<(), _, _>(UserId(3), true, |p| {
            p.set_attribute(Attribute::Luck, 200);
            Err(StoreError::Missing(UserId(3)))
        });
        assert!(result.is_err());
        assert!(store.get(UserId(3)).unwrap().is_none());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_refused_race_leaves_no_record() {
        let store = Arc::new(MemoryPlayerStore::new());
        let engine = ProgressionEngine::new(Arc::clone(&store), ProgressionSettings::default());

        let err = engine.select_race(UserId(9), "Hobbits").unwrap_err();
        assert!(matches!(err, ProgressionError::UnknownRace(_)));
        assert_eq!(store.count().unwrap(), 0);

        engine.select_race(UserId(9), "Elves").unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(UserId(9)).unwrap().unwrap().race, Some(Race::Elves));
    }

    #[test]
    fn test_save_and_ranking() {
        let store = MemoryPlayerStore::new();
        for id in [1, 2, 3] {
            store.get_or_create(UserId(id)).unwrap();
        }
        let p = store
            .save(
                UserId(2),
                &PlayerUpdate::new().attribute(Attribute::Wisdom, 100).race(Race::Ents),
            )
            .unwrap();
        assert_eq!(p.total_score(), 200);

        let ids: Vec<i64> = store.top_n(10).unwrap().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(store.rank_of(UserId(3)).unwrap(), Some(3));
        assert_eq!(store.rank_of(UserId(4)).unwrap(), None);
    }

    #[test]
    fn test_save_missing() {
        let store = MemoryPlayerStore::new();
        let err = store.save(UserId(1), &PlayerUpdate::new()).unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }
}
