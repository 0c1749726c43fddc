//! Progression engine
//!
//! Applies the rules in [`rules`] to stored players. Each operation is one
//! serialized read-modify-write through [`PlayerStore::modify`]: the rule
//! runs against the freshly loaded record and the store persists the result
//! before the call returns. Two concurrent meditations for the same player
//! therefore see each other's writes and at most one succeeds.
//!
//! # Usage
//!
//! ```ignore
//! let engine = ProgressionEngine::new(store, config.progression.clone());
//!
//! match engine.meditate(user, now()) {
//!     Ok(m) => println!("perception {} energy {}", m.perception, m.energy),
//!     Err(ProgressionError::OnCooldown { seconds_remaining }) => { /* tell the user */ }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod error;
mod outcome;
pub mod rules;

pub use error::ProgressionError;
pub use outcome::{MagicChange, MagicSelection, Meditation, Profile, RaceSelection};

use std::sync::Arc;

use chrono::Utc;

use crate::config::ProgressionSettings;
use crate::domain::{Attribute, MagicSet, Player, UserId};
use crate::store::PlayerStore;

/// Current wall-clock time in epoch seconds
pub fn now() -> i64 {
    Utc::now().timestamp()
}

pub struct ProgressionEngine<S> {
    store: Arc<S>,
    settings: ProgressionSettings,
}

impl<S> Clone for ProgressionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}

impl<S: PlayerStore> ProgressionEngine<S> {
    pub fn new(store: Arc<S>, settings: ProgressionSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    /// Load (or lazily create) a player with meditation availability at `now`
    pub fn profile(&self, id: UserId, now: i64) -> Result<Profile, ProgressionError> {
        let player = self.store.get_or_create(id)?;
        let cooldown_remaining =
            player.cooldown_remaining(now, self.settings.meditation_cooldown_secs);
        Ok(Profile {
            player,
            cooldown_remaining,
        })
    }

    pub fn meditate(&self, id: UserId, now: i64) -> Result<Meditation, ProgressionError> {
        let result = self.mutate(id, |p| rules::attempt_meditation(p, now, &self.settings));
        match &result {
            Ok(m) => tracing::info!(
                user_id = %id,
                perception = m.perception,
                energy = m.energy,
                total = m.total_score,
                "Meditation complete"
            ),
            Err(ProgressionError::OnCooldown { seconds_remaining }) => {
                tracing::debug!(user_id = %id, seconds_remaining, "Meditation on cooldown")
            }
            Err(_) => {}
        }
        result
    }

    pub fn select_race(&self, id: UserId, name: &str) -> Result<RaceSelection, ProgressionError> {
        let selection = self.mutate(id, |p| rules::select_race(p, name))?;
        tracing::info!(
            user_id = %id,
            race = %selection.race,
            previous = ?selection.previous,
            "Race selected"
        );
        Ok(selection)
    }

    pub fn select_magic(&self, id: UserId, name: &str) -> Result<MagicSelection, ProgressionError> {
        let selection = self.mutate(id, |p| rules::select_magic(p, name))?;
        tracing::info!(user_id = %id, change = ?selection.change, magic = %selection.magic, "Magic updated");
        Ok(selection)
    }

    /// Admin: replace a player's disciplines wholesale. Does not create players.
    pub fn admin_set_magic<N: AsRef<str>>(
        &self,
        id: UserId,
        names: &[N],
    ) -> Result<MagicSet, ProgressionError> {
        let magic = self.mutate_existing(id, |p| rules::admin_set_magic(p, names))?;
        tracing::info!(user_id = %id, magic = %magic, "Admin set magic");
        Ok(magic)
    }

    /// Admin: overwrite one attribute. Does not create players.
    pub fn admin_set_attribute(
        &self,
        id: UserId,
        attribute: Attribute,
        value: i64,
    ) -> Result<Player, ProgressionError> {
        let player = self.mutate_existing_player(id, |p| {
            rules::admin_set_attribute(p, attribute, value).map(|_| ())
        })?;
        tracing::info!(
            user_id = %id,
            %attribute,
            value,
            total = player.total_score(),
            "Admin set attribute"
        );
        Ok(player)
    }

    fn mutate<T>(
        &self,
        id: UserId,
        f: impl FnOnce(&mut Player) -> Result<T, ProgressionError>,
    ) -> Result<T, ProgressionError> {
        self.store
            .modify(id, true, f)?
            .map(|(_, value)| value)
            .ok_or(ProgressionError::NotFound(id))
    }

    fn mutate_existing<T>(
        &self,
        id: UserId,
        f: impl FnOnce(&mut Player) -> Result<T, ProgressionError>,
    ) -> Result<T, ProgressionError> {
        self.store
            .modify(id, false, f)?
            .map(|(_, value)| value)
            .ok_or(ProgressionError::NotFound(id))
    }

    fn mutate_existing_player(
        &self,
        id: UserId,
        f: impl FnOnce(&mut Player) -> Result<(), ProgressionError>,
    ) -> Result<Player, ProgressionError> {
        self.store
            .modify(id, false, f)?
            .map(|(player, _)| player)
            .ok_or(ProgressionError::NotFound(id))
    }
}
