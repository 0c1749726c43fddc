//! The persistent per-user progression record

use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, Attributes};
use super::magic::MagicSet;
use super::race::Race;

/// Opaque user identity supplied by the transport (chat user id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A player's progression state.
///
/// `total_score` is derived: it always equals the sum of the attributes and
/// is refreshed by every attribute write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: UserId,
    attributes: Attributes,
    pub race: Option<Race>,
    pub magic: MagicSet,
    /// Epoch seconds of the last successful meditation, `None` if never
    pub last_meditation: Option<i64>,
    total_score: u32,
}

impl Player {
    /// Fresh record with all defaults
    pub fn new(id: UserId) -> Self {
        Self::from_parts(id, Attributes::default(), None, MagicSet::new(), None)
    }

    /// Assemble a record, deriving the total score from the attributes
    pub fn from_parts(
        id: UserId,
        attributes: Attributes,
        race: Option<Race>,
        magic: MagicSet,
        last_meditation: Option<i64>,
    ) -> Self {
        Self {
            id,
            total_score: attributes.total(),
            attributes,
            race,
            magic,
            last_meditation,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, attribute: Attribute) -> u16 {
        self.attributes.get(attribute)
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Set one attribute (clamped) and refresh the total
    pub fn set_attribute(&mut self, attribute: Attribute, value: u16) -> u16 {
        let stored = self.attributes.set(attribute, value);
        self.total_score = self.attributes.total();
        stored
    }

    /// Raise one attribute (saturating at the cap) and refresh the total
    pub fn increase_attribute(&mut self, attribute: Attribute, amount: u16) -> u16 {
        let stored = self.attributes.increase(attribute, amount);
        self.total_score = self.attributes.total();
        stored
    }

    /// Seconds left before the next meditation, `None` if one is allowed now.
    /// A `now` earlier than the last meditation counts as no time elapsed.
    pub fn cooldown_remaining(&self, now: i64, cooldown_secs: i64) -> Option<i64> {
        let last = self.last_meditation?;
        let elapsed = now.saturating_sub(last).max(0);
        if elapsed < cooldown_secs {
            Some(cooldown_secs - elapsed)
        } else {
            None
        }
    }
}
