//! Player attributes
//!
//! The closed set of eleven numeric stats every player carries. The string
//! identifiers double as column names in the players table, so they must
//! never change.

use serde::{Deserialize, Serialize};

/// Highest value an attribute can hold
pub const ATTRIBUTE_MAX: u16 = 250;

/// Value every attribute starts with
pub const ATTRIBUTE_DEFAULT: u16 = 10;

/// One of the eleven named stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Durability,
    Defense,
    Agility,
    Intellect,
    Wisdom,
    Charisma,
    Perception,
    Stamina,
    Energy,
    Luck,
}

impl Attribute {
    pub const COUNT: usize = 11;

    /// All attributes in storage/display order
    pub const ALL: [Attribute; Self::COUNT] = [
        Self::Strength,
        Self::Durability,
        Self::Defense,
        Self::Agility,
        Self::Intellect,
        Self::Wisdom,
        Self::Charisma,
        Self::Perception,
        Self::Stamina,
        Self::Energy,
        Self::Luck,
    ];

    /// Stable identifier (also the database column name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Durability => "durability",
            Self::Defense => "defense",
            Self::Agility => "agility",
            Self::Intellect => "intellect",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
            Self::Perception => "perception",
            Self::Stamina => "stamina",
            Self::Energy => "energy",
            Self::Luck => "luck",
        }
    }

    /// Parse from the stable identifier (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Durability => "Durability",
            Self::Defense => "Defense",
            Self::Agility => "Agility",
            Self::Intellect => "Intellect",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
            Self::Perception => "Perception",
            Self::Stamina => "Stamina",
            Self::Energy => "Energy",
            Self::Luck => "Luck",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Values of all eleven attributes, always within `[0, ATTRIBUTE_MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    values: [u16; Attribute::COUNT],
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            values: [ATTRIBUTE_DEFAULT; Attribute::COUNT],
        }
    }
}

impl Attributes {
    /// Build from raw values, clamping anything above the cap
    pub fn from_values(values: [u16; Attribute::COUNT]) -> Self {
        Self {
            values: values.map(|v| v.min(ATTRIBUTE_MAX)),
        }
    }

    pub fn get(&self, attribute: Attribute) -> u16 {
        self.values[attribute.index()]
    }

    /// Set a value, clamped to the attribute cap. Returns the stored value.
    pub fn set(&mut self, attribute: Attribute, value: u16) -> u16 {
        let clamped = value.min(ATTRIBUTE_MAX);
        self.values[attribute.index()] = clamped;
        clamped
    }

    /// Add to a value, saturating at the attribute cap. Returns the new value.
    pub fn increase(&mut self, attribute: Attribute, amount: u16) -> u16 {
        let current = self.get(attribute);
        self.set(attribute, current.saturating_add(amount))
    }

    /// Sum of all attribute values
    pub fn total(&self) -> u32 {
        self.values.iter().map(|&v| u32::from(v)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u16)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Attributes whose value differs between `self` and `other`
    pub fn changed_from(&self, other: &Attributes) -> Vec<(Attribute, u16)> {
        self.iter()
            .filter(|(a, v)| other.get(*a) != *v)
            .collect()
    }
}

/// Serialized as `{"strength": 10, ...}` in storage order
impl Serialize for Attributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Attribute::COUNT))?;
        for (attribute, value) in self.iter() {
            map.serialize_entry(attribute.as_str(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_total_110() {
        let attrs = Attributes::default();
        assert!(attrs.iter().all(|(_, v)| v == 10));
        assert_eq!(attrs.total(), 110);
    }

    #[test]
    fn test_increase_caps_at_250() {
        let mut attrs = Attributes::default();
        attrs.set(Attribute::Energy, 249);
        assert_eq!(attrs.increase(Attribute::Energy, 2), 250);
        assert_eq!(attrs.increase(Attribute::Energy, 2), 250);
    }

    #[test]
    fn test_set_clamps() {
        let mut attrs = Attributes::default();
        assert_eq!(attrs.set(Attribute::Luck, 999), ATTRIBUTE_MAX);
        let raw = Attributes::from_values([300; Attribute::COUNT]);
        assert_eq!(raw.total(), 250 * 11);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Attribute::from_name("Perception"), Some(Attribute::Perception));
        assert_eq!(Attribute::from_name(" luck "), Some(Attribute::Luck));
        assert_eq!(Attribute::from_name("mana"), None);
    }

    #[test]
    fn test_serializes_as_named_map() {
        let json = serde_json::to_value(Attributes::default()).unwrap();
        assert_eq!(json["perception"], 10);
        assert_eq!(json.as_object().unwrap().len(), Attribute::COUNT);
    }

    #[test]
    fn test_changed_from() {
        let before = Attributes::default();
        let mut after = before;
        after.increase(Attribute::Perception, 2);
        after.increase(Attribute::Energy, 2);
        assert_eq!(
            after.changed_from(&before),
            vec![(Attribute::Perception, 12), (Attribute::Energy, 12)]
        );
    }
}
