//! Failures reported by progression operations

use thiserror::Error;

use crate::domain::{ATTRIBUTE_MAX, Attribute, UserId};
use crate::store::StoreError;

/// Why an action was refused. Every variant leaves the player untouched.
#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("meditation available again in {seconds_remaining}s")]
    OnCooldown { seconds_remaining: i64 },

    #[error("unknown race: {0}")]
    UnknownRace(String),

    #[error("unknown magic discipline: {0}")]
    UnknownDiscipline(String),

    #[error("selection contains no valid disciplines")]
    InvalidSelection,

    #[error("magic selection limit reached")]
    SelectionLimitReached,

    #[error("{attribute} must be between 0 and {max}, got {value}", max = ATTRIBUTE_MAX)]
    AttributeOutOfRange { attribute: Attribute, value: i64 },

    #[error("player {0} not found")]
    NotFound(UserId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProgressionError {
    /// Caller or policy errors meant to be shown to the user, as opposed
    /// to storage failures
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
