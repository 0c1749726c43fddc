//! SQLite database connection and schema management for player records
//!
//! Manages the player database (by default `~/.archmage/players.db`) with
//! automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::error::{StoreError, StoreResult};

/// Database wrapper shared by every store handle
#[derive(Clone)]
pub struct PlayerDb {
    conn: Arc<Mutex<Connection>>,
}

impl PlayerDb {
    /// Open or create the player database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open player db: {}", path.display()))?;

        // WAL lets leaderboard reads run next to writers; FULL makes each
        // commit durable before the call returns
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        Self::from_connection(conn)
    }

    /// Private database that lives as long as this handle (tests, tooling)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory player db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection for one store operation
    pub(crate) fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to create player schema")?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: total_score becomes store-derived; repair rows written
        // by callers that updated attributes without it
        if version < 2 {
            let repaired = conn.execute(
                &format!(
                    "UPDATE players SET total_score = {TOTAL_SCORE_EXPR} WHERE total_score != {TOTAL_SCORE_EXPR}"
                ),
                [],
            )?;
            if repaired > 0 {
                tracing::warn!(repaired, "Recomputed stale total scores");
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }
}

/// SQL expression for the derived total score. Must list every attribute column.
pub(crate) const TOTAL_SCORE_EXPR: &str = "(strength + durability + defense + agility + intellect + wisdom + charisma + perception + stamina + energy + luck)";

/// Column list shared by every player SELECT
pub(crate) const PLAYER_COLUMNS: &str = "user_id, strength, durability, defense, agility, intellect, wisdom, charisma, perception, stamina, energy, luck, race, magic, last_meditation, total_score";

/// SQL schema for the player database
const SCHEMA_SQL: &str = r#"
-- One row per user. seq is the insertion order, used to break score ties.
CREATE TABLE IF NOT EXISTS players (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    strength INTEGER NOT NULL DEFAULT 10 CHECK (strength BETWEEN 0 AND 250),
    durability INTEGER NOT NULL DEFAULT 10 CHECK (durability BETWEEN 0 AND 250),
    defense INTEGER NOT NULL DEFAULT 10 CHECK (defense BETWEEN 0 AND 250),
    agility INTEGER NOT NULL DEFAULT 10 CHECK (agility BETWEEN 0 AND 250),
    intellect INTEGER NOT NULL DEFAULT 10 CHECK (intellect BETWEEN 0 AND 250),
    wisdom INTEGER NOT NULL DEFAULT 10 CHECK (wisdom BETWEEN 0 AND 250),
    charisma INTEGER NOT NULL DEFAULT 10 CHECK (charisma BETWEEN 0 AND 250),
    perception INTEGER NOT NULL DEFAULT 10 CHECK (perception BETWEEN 0 AND 250),
    stamina INTEGER NOT NULL DEFAULT 10 CHECK (stamina BETWEEN 0 AND 250),
    energy INTEGER NOT NULL DEFAULT 10 CHECK (energy BETWEEN 0 AND 250),
    luck INTEGER NOT NULL DEFAULT 10 CHECK (luck BETWEEN 0 AND 250),
    race TEXT,                                  -- NULL until chosen
    magic TEXT NOT NULL DEFAULT '[]',           -- JSON array of discipline ids
    last_meditation INTEGER,                    -- epoch seconds, NULL = never
    total_score INTEGER NOT NULL DEFAULT 110,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_players_score ON players(total_score DESC, seq ASC);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attribute;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("players.db");
        let db = PlayerDb::open(&db_path).unwrap();

        let conn = db.conn().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"players".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));

        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("players.db");
        {
            let db = PlayerDb::open(&db_path).unwrap();
            db.conn()
                .unwrap()
                .execute("INSERT INTO players (user_id, created_at) VALUES (5, 0)", [])
                .unwrap();
        }
        let db = PlayerDb::open(&db_path).unwrap();
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM players", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_migration_repairs_stale_totals() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("players.db");
        {
            let db = PlayerDb::open(&db_path).unwrap();
            let conn = db.conn().unwrap();
            conn.execute_batch(
                r#"
                INSERT INTO players (user_id, strength, total_score, created_at) VALUES (1, 60, 110, 0);
                DELETE FROM schema_version WHERE version = 2;
                "#,
            )
            .unwrap();
        }
        let db = PlayerDb::open(&db_path).unwrap();
        let total: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT total_score FROM players WHERE user_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(total, 160);
    }

    #[test]
    fn test_total_score_expr_covers_every_attribute() {
        for attribute in Attribute::ALL {
            assert!(TOTAL_SCORE_EXPR.contains(attribute.as_str()), "{attribute}");
            assert!(PLAYER_COLUMNS.contains(attribute.as_str()), "{attribute}");
        }
    }

    #[test]
    fn test_attribute_cap_enforced_by_schema() {
        let db = PlayerDb::open_in_memory().unwrap();
        let conn = db.conn().unwrap();
        let result = conn.execute(
            "INSERT INTO players (user_id, luck, created_at) VALUES (1, 251, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
