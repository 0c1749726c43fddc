//! Magic discipline catalog and the per-player discipline set
//!
//! Players pick up to [`MAX_DISCIPLINES`] disciplines from the catalog, or the
//! single sentinel [`Discipline::Antimagic`] which excludes everything else.

use serde::{Deserialize, Serialize};

/// Upper bound on how many disciplines a player may hold at once
pub const MAX_DISCIPLINES: usize = 4;

/// Grouping used for menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagicCategory {
    Elemental,
    Natural,
    Spiritual,
    Arcane,
    Primordial,
}

impl MagicCategory {
    pub const ALL: [MagicCategory; 5] = [
        Self::Elemental,
        Self::Natural,
        Self::Spiritual,
        Self::Arcane,
        Self::Primordial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Elemental => "Elemental",
            Self::Natural => "Natural",
            Self::Spiritual => "Spiritual",
            Self::Arcane => "Arcane",
            Self::Primordial => "Primordial",
        }
    }

    /// Menu blurb. The Primordial note is informational only; selection
    /// never checks it.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Elemental => "Command over the classical elements",
            Self::Natural => "Magic drawn from living and raw matter",
            Self::Spiritual => "Light, shadow and the soul",
            Self::Arcane => "Learned arts of the mind and the written word",
            Self::Primordial => {
                "High-tier forces of reality, usually granted by an administrator"
            }
        }
    }

    /// Catalog disciplines in this category
    pub fn disciplines(&self) -> impl Iterator<Item = Discipline> + '_ {
        Discipline::CATALOG
            .into_iter()
            .filter(move |d| d.category() == Some(*self))
    }
}

/// A named magic ability. Variant names are the stored identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    // Elemental
    Fire,
    Ice,
    Water,
    Earth,
    Air,
    Lightning,
    // Natural
    Nature,
    Poison,
    Blood,
    Metal,
    Sound,
    // Spiritual
    Light,
    Darkness,
    Holy,
    Curse,
    Soul,
    Necromancy,
    // Arcane
    Illusion,
    Mind,
    Summoning,
    Enchantment,
    Runes,
    Alchemy,
    // Primordial
    Space,
    Time,
    Gravity,
    Chaos,
    Creation,

    /// Mutually exclusive with every other discipline
    Antimagic,
}

impl Discipline {
    /// Selectable disciplines, excluding the Antimagic sentinel
    pub const CATALOG: [Discipline; 28] = [
        Self::Fire,
        Self::Ice,
        Self::Water,
        Self::Earth,
        Self::Air,
        Self::Lightning,
        Self::Nature,
        Self::Poison,
        Self::Blood,
        Self::Metal,
        Self::Sound,
        Self::Light,
        Self::Darkness,
        Self::Holy,
        Self::Curse,
        Self::Soul,
        Self::Necromancy,
        Self::Illusion,
        Self::Mind,
        Self::Summoning,
        Self::Enchantment,
        Self::Runes,
        Self::Alchemy,
        Self::Space,
        Self::Time,
        Self::Gravity,
        Self::Chaos,
        Self::Creation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Ice => "Ice",
            Self::Water => "Water",
            Self::Earth => "Earth",
            Self::Air => "Air",
            Self::Lightning => "Lightning",
            Self::Nature => "Nature",
            Self::Poison => "Poison",
            Self::Blood => "Blood",
            Self::Metal => "Metal",
            Self::Sound => "Sound",
            Self::Light => "Light",
            Self::Darkness => "Darkness",
            Self::Holy => "Holy",
            Self::Curse => "Curse",
            Self::Soul => "Soul",
            Self::Necromancy => "Necromancy",
            Self::Illusion => "Illusion",
            Self::Mind => "Mind",
            Self::Summoning => "Summoning",
            Self::Enchantment => "Enchantment",
            Self::Runes => "Runes",
            Self::Alchemy => "Alchemy",
            Self::Space => "Space",
            Self::Time => "Time",
            Self::Gravity => "Gravity",
            Self::Chaos => "Chaos",
            Self::Creation => "Creation",
            Self::Antimagic => "Antimagic",
        }
    }

    /// `None` only for Antimagic
    pub fn category(&self) -> Option<MagicCategory> {
        use MagicCategory::*;
        match self {
            Self::Fire | Self::Ice | Self::Water | Self::Earth | Self::Air | Self::Lightning => {
                Some(Elemental)
            }
            Self::Nature | Self::Poison | Self::Blood | Self::Metal | Self::Sound => Some(Natural),
            Self::Light
            | Self::Darkness
            | Self::Holy
            | Self::Curse
            | Self::Soul
            | Self::Necromancy => Some(Spiritual),
            Self::Illusion
            | Self::Mind
            | Self::Summoning
            | Self::Enchantment
            | Self::Runes
            | Self::Alchemy => Some(Arcane),
            Self::Space | Self::Time | Self::Gravity | Self::Chaos | Self::Creation => {
                Some(Primordial)
            }
            Self::Antimagic => None,
        }
    }

    pub fn is_antimagic(&self) -> bool {
        matches!(self, Self::Antimagic)
    }

    /// Exact lookup by stored identifier, Antimagic included
    pub fn from_id(s: &str) -> Option<Self> {
        if s == Self::Antimagic.as_str() {
            return Some(Self::Antimagic);
        }
        Self::CATALOG.into_iter().find(|d| d.as_str() == s)
    }

    /// Case-insensitive lookup for user input, Antimagic included
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if Self::Antimagic.as_str().eq_ignore_ascii_case(s) {
            return Some(Self::Antimagic);
        }
        Self::CATALOG
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The disciplines a player holds, in the order they were picked.
///
/// Holds at most [`MAX_DISCIPLINES`] entries, no duplicates, and contains
/// Antimagic only as a singleton. Mutation goes through the progression
/// rules; this type only exposes checked constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MagicSet(Vec<Discipline>);

impl MagicSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `{Antimagic}` singleton
    pub fn antimagic() -> Self {
        Self(vec![Discipline::Antimagic])
    }

    /// Build from a list, rejecting anything that breaks the set invariants
    pub fn try_from_vec(items: Vec<Discipline>) -> Option<Self> {
        if items.len() > MAX_DISCIPLINES {
            return None;
        }
        if items.contains(&Discipline::Antimagic) && items.len() > 1 {
            return None;
        }
        for (i, d) in items.iter().enumerate() {
            if items[..i].contains(d) {
                return None;
            }
        }
        Some(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, discipline: Discipline) -> bool {
        self.0.contains(&discipline)
    }

    pub fn has_antimagic(&self) -> bool {
        self.contains(Discipline::Antimagic)
    }

    /// Whether one more regular discipline fits
    pub fn has_room(&self) -> bool {
        self.0.len() < MAX_DISCIPLINES && !self.has_antimagic()
    }

    pub fn iter(&self) -> impl Iterator<Item = Discipline> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Discipline] {
        &self.0
    }

    pub(crate) fn push_unchecked(&mut self, discipline: Discipline) {
        self.0.push(discipline);
    }

    pub(crate) fn remove(&mut self, discipline: Discipline) {
        self.0.retain(|d| *d != discipline);
    }
}

impl std::fmt::Display for MagicSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.0.iter().map(|d| d.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl<'de> Deserialize<'de> for MagicSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<Discipline>::deserialize(deserializer)?;
        Self::try_from_vec(items)
            .ok_or_else(|| serde::de::Error::custom("magic set violates selection rules"))
    }
}
