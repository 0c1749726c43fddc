//! Leaderboard queries
//!
//! Read-only views over the player store. Results may trail a write that is
//! still in flight for another player.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Race, UserId};
use crate::store::{PlayerStore, StoreResult};

/// One ranked row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub user_id: UserId,
    pub race: Option<Race>,
    pub total_score: u32,
}

pub struct LeaderboardService<S> {
    store: Arc<S>,
}

impl<S: PlayerStore> LeaderboardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Up to `n` players, highest total score first. Empty when there are
    /// no players.
    pub fn top_players(&self, n: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        let players = self.store.top_n(n)?;
        tracing::debug!(requested = n, returned = players.len(), "Leaderboard query");
        Ok(players
            .into_iter()
            .enumerate()
            .map(|(i, p)| LeaderboardEntry {
                rank: i + 1,
                user_id: p.id,
                race: p.race,
                total_score: p.total_score(),
            })
            .collect())
    }

    /// Position of one player, `None` if they have no record
    pub fn rank_of(&self, id: UserId) -> StoreResult<Option<usize>> {
        self.store.rank_of(id)
    }
}
