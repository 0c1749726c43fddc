//! Shared test utilities for store and engine integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use archmage::config::ProgressionSettings;
use archmage::leaderboard::LeaderboardService;
use archmage::progression::ProgressionEngine;
use archmage::store::{PlayerDb, PlayerStore, SqlitePlayerStore};
use archmage::{Player, UserId};
use tempfile::TempDir;

/// A SQLite-backed store in a fresh temporary directory.
/// Keep the `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, Arc<SqlitePlayerStore>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = open_store(&dir.path().join("players.db"));
    (dir, store)
}

/// Open a second, independent connection to an existing database file
pub fn open_store(path: &Path) -> Arc<SqlitePlayerStore> {
    let db = PlayerDb::open(path).expect("Failed to open player db");
    Arc::new(SqlitePlayerStore::new(db))
}

pub fn engine<S: PlayerStore>(store: &Arc<S>) -> ProgressionEngine<S> {
    ProgressionEngine::new(Arc::clone(store), ProgressionSettings::default())
}

pub fn leaderboard<S: PlayerStore>(store: &Arc<S>) -> LeaderboardService<S> {
    LeaderboardService::new(Arc::clone(store))
}

/// Check the record invariants that must hold for every stored player
pub fn assert_invariants(player: &Player) {
    assert_eq!(
        player.total_score(),
        player.attributes().total(),
        "total score out of step for {}",
        player.id
    );
    assert!(player.attributes().iter().all(|(_, v)| v <= 250));
    assert!(player.magic.len() <= 4);
    if player.magic.has_antimagic() {
        assert_eq!(player.magic.len(), 1, "Antimagic must be alone");
    }
}

pub fn stored(store: &impl PlayerStore, id: i64) -> Player {
    store
        .get(UserId(id))
        .expect("store read failed")
        .expect("player missing")
}
