//! Race catalog

use serde::{Deserialize, Serialize};

/// A playable race. The variant names are the stored identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Humans,
    Elves,
    Dwarves,
    Orcs,
    Dragonborn,
    Beastfolk,
    Insectoids,
    Giants,
    Vampires,
    Werewolves,
    Undead,
    Demons,
    Angels,
    Monsters,
    Ents,
    Fairies,
    Frostborn,
    Merfolk,
    Golems,
    Chimeras,
    Astrals,
    Nagas,
}

impl Race {
    /// Catalog in display order (numbered 1..=22 in menus)
    pub const ALL: [Race; 22] = [
        Self::Humans,
        Self::Elves,
        Self::Dwarves,
        Self::Orcs,
        Self::Dragonborn,
        Self::Beastfolk,
        Self::Insectoids,
        Self::Giants,
        Self::Vampires,
        Self::Werewolves,
        Self::Undead,
        Self::Demons,
        Self::Angels,
        Self::Monsters,
        Self::Ents,
        Self::Fairies,
        Self::Frostborn,
        Self::Merfolk,
        Self::Golems,
        Self::Chimeras,
        Self::Astrals,
        Self::Nagas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Humans => "Humans",
            Self::Elves => "Elves",
            Self::Dwarves => "Dwarves",
            Self::Orcs => "Orcs",
            Self::Dragonborn => "Dragonborn",
            Self::Beastfolk => "Beastfolk",
            Self::Insectoids => "Insectoids",
            Self::Giants => "Giants",
            Self::Vampires => "Vampires",
            Self::Werewolves => "Werewolves",
            Self::Undead => "Undead",
            Self::Demons => "Demons",
            Self::Angels => "Angels",
            Self::Monsters => "Monsters",
            Self::Ents => "Ents",
            Self::Fairies => "Fairies",
            Self::Frostborn => "Frostborn",
            Self::Merfolk => "Merfolk",
            Self::Golems => "Golems",
            Self::Chimeras => "Chimeras",
            Self::Astrals => "Astrals",
            Self::Nagas => "Nagas",
        }
    }

    /// Exact lookup by stored identifier
    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Lenient lookup for user input: identifier in any case, or the
    /// 1-based menu number
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
    }

    /// 1-based position in the catalog
    pub fn number(&self) -> usize {
        *self as usize + 1
    }
}

impl std::fmt::Display for Race {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
