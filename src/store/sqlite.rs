//! SQLite-backed player store

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use super::db::{PLAYER_COLUMNS, PlayerDb, TOTAL_SCORE_EXPR};
use super::error::{StoreError, StoreResult};
use super::{PlayerStore, PlayerUpdate};
use crate::domain::{ATTRIBUTE_MAX, Attribute, Attributes, MagicSet, Player, Race, UserId};

/// Player store on top of [`PlayerDb`].
///
/// Every operation holds the connection for its whole duration and writes
/// run inside an `IMMEDIATE` transaction, so read-modify-write sequences are
/// serialized within this process and against other processes sharing the
/// database file.
#[derive(Clone)]
pub struct SqlitePlayerStore {
    db: PlayerDb,
}

impl SqlitePlayerStore {
    pub fn new(db: PlayerDb) -> Self {
        Self { db }
    }

    fn insert_default(conn: &Connection, id: UserId) -> StoreResult<bool> {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO players (user_id, created_at) VALUES (?1, ?2)",
            params![id.0, Utc::now().timestamp()],
        )?;
        if inserted > 0 {
            tracing::info!(user_id = %id, "Created player");
        }
        Ok(inserted > 0)
    }

    fn load(conn: &Connection, id: UserId) -> StoreResult<Option<Player>> {
        let raw = conn
            .query_row(
                &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE user_id = ?1"),
                [id.0],
                RawPlayer::from_row,
            )
            .optional()?;
        raw.map(RawPlayer::into_player).transpose()
    }

    /// Write the update. Attribute changes are followed by a total_score
    /// refresh in the same transaction.
    fn apply(conn: &Connection, id: UserId, update: &PlayerUpdate) -> StoreResult<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        for &(attribute, value) in &update.attributes {
            sets.push(format!("{} = ?", attribute.as_str()));
            values.push(i64::from(value.min(ATTRIBUTE_MAX)).into());
        }
        if let Some(race) = update.race {
            sets.push("race = ?".to_string());
            values.push(race.as_str().to_string().into());
        }
        if let Some(magic) = &update.magic {
            sets.push("magic = ?".to_string());
            values.push(encode_magic(magic).into());
        }
        if let Some(at) = update.last_meditation {
            sets.push("last_meditation = ?".to_string());
            values.push(at.into());
        }
        values.push(id.0.into());

        let sql = format!("UPDATE players SET {} WHERE user_id = ?", sets.join(", "));
        let changed = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::Missing(id));
        }

        if update.touches_attributes() {
            conn.execute(
                &format!("UPDATE players SET total_score = {TOTAL_SCORE_EXPR} WHERE user_id = ?1"),
                [id.0],
            )?;
        }
        Ok(())
    }
}

impl PlayerStore for SqlitePlayerStore {
    fn get(&self, id: UserId) -> StoreResult<Option<Player>> {
        let conn = self.db.conn()?;
        Self::load(&conn, id)
    }

    fn get_or_create(&self, id: UserId) -> StoreResult<Player> {
        let conn = self.db.conn()?;
        Self::insert_default(&conn, id)?;
        Self::load(&conn, id)?.ok_or(StoreError::Missing(id))
    }

    fn save(&self, id: UserId, update: &PlayerUpdate) -> StoreResult<Player> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Self::apply(&tx, id, update)?;
        let stored = Self::load(&tx, id)?.ok_or(StoreError::Missing(id))?;
        tx.commit()?;
        tracing::debug!(user_id = %id, ?update, "Saved player");
        Ok(stored)
    }

    fn modify<T, E, F>(&self, id: UserId, create_missing: bool, f: F) -> Result<Option<(Player, T)>, E>
    where
        F: FnOnce(&mut Player) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.db.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        if create_missing {
            Self::insert_default(&tx, id)?;
        }
        let Some(before) = Self::load(&tx, id)? else {
            return Ok(None);
        };

        let mut after = before.clone();
        // Dropping tx on the error path rolls back the insert above as well
        let value = f(&mut after)?;

        let update = PlayerUpdate::diff(&before, &after);
        Self::apply(&tx, id, &update)?;
        let stored = Self::load(&tx, id)?.ok_or(StoreError::Missing(id))?;
        tx.commit().map_err(StoreError::from)?;

        if !update.is_empty() {
            tracing::debug!(user_id = %id, ?update, "Modified player");
        }
        Ok(Some((stored, value)))
    }

    fn top_n(&self, n: usize) -> StoreResult<Vec<Player>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY total_score DESC, seq ASC LIMIT ?1"
        ))?;
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], RawPlayer::from_row)?;

        let mut players = Vec::new();
        for raw in rows {
            players.push(raw?.into_player()?);
        }
        Ok(players)
    }

    fn rank_of(&self, id: UserId) -> StoreResult<Option<usize>> {
        let conn = self.db.conn()?;
        let ahead: Option<i64> = conn
            .query_row(
                r#"SELECT (SELECT COUNT(*) FROM players p
                           WHERE p.total_score > me.total_score
                              OR (p.total_score = me.total_score AND p.seq < me.seq))
                   FROM players me WHERE me.user_id = ?1"#,
                [id.0],
                |r| r.get(0),
            )
            .optional()?;
        Ok(ahead.map(|n| n as usize + 1))
    }

    fn count(&self) -> StoreResult<u64> {
        let conn = self.db.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM players", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

/// Row as stored, before catalog values are validated
struct RawPlayer {
    user_id: i64,
    attributes: [u16; Attribute::COUNT],
    race: Option<String>,
    magic: String,
    last_meditation: Option<i64>,
    total_score: i64,
}

impl RawPlayer {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut attributes = [0u16; Attribute::COUNT];
        for (i, slot) in attributes.iter_mut().enumerate() {
            *slot = row.get(i + 1)?;
        }
        Ok(Self {
            user_id: row.get(0)?,
            attributes,
            race: row.get(12)?,
            magic: row.get(13)?,
            last_meditation: row.get(14)?,
            total_score: row.get(15)?,
        })
    }

    fn into_player(self) -> StoreResult<Player> {
        let corrupted = |reason: String| StoreError::Corrupted {
            user_id: self.user_id,
            reason,
        };

        let race = match self.race.as_deref() {
            None => None,
            Some(s) => Some(Race::from_id(s).ok_or_else(|| corrupted(format!("unknown race {s:?}")))?),
        };
        let magic: MagicSet = serde_json::from_str(&self.magic)
            .map_err(|e| corrupted(format!("bad magic set {:?}: {e}", self.magic)))?;

        let player = Player::from_parts(
            UserId(self.user_id),
            Attributes::from_values(self.attributes),
            race,
            magic,
            self.last_meditation,
        );
        if i64::from(player.total_score()) != self.total_score {
            tracing::warn!(
                user_id = self.user_id,
                stored = self.total_score,
                derived = player.total_score(),
                "Stored total score out of date"
            );
        }
        Ok(player)
    }
}

fn encode_magic(magic: &MagicSet) -> String {
    let names: Vec<&str> = magic.iter().map(|d| d.as_str()).collect();
    serde_json::Value::from(names).to_string()
}
