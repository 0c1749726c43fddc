//! Errors raised by player stores

use thiserror::Error;

use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player store lock was poisoned")]
    LockPoisoned,

    #[error("player {0} does not exist")]
    Missing(UserId),

    #[error("corrupted record for player {user_id}: {reason}")]
    Corrupted { user_id: i64, reason: String },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
