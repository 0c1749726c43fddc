//! Success payloads returned to the transport layer

use serde::Serialize;

use crate::domain::{Discipline, MagicSet, Player, Race};

/// Result of a successful meditation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meditation {
    pub gain: u16,
    pub perception: u16,
    pub energy: u16,
    pub total_score: u32,
    /// Epoch seconds at which the next meditation unlocks
    pub next_available_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceSelection {
    pub race: Race,
    pub previous: Option<Race>,
}

/// What a magic toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MagicChange {
    Added(Discipline),
    Removed(Discipline),
    /// The whole set was replaced by `{Antimagic}`
    Antimagic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagicSelection {
    pub change: MagicChange,
    pub magic: MagicSet,
}

/// A player plus meditation availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub player: Player,
    /// Seconds until meditation unlocks, `None` when it is available now
    pub cooldown_remaining: Option<i64>,
}

impl Profile {
    pub fn can_meditate(&self) -> bool {
        self.cooldown_remaining.is_none()
    }
}
