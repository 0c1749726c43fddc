//! Domain types: catalogs and the player record

mod attribute;
mod magic;
mod player;
mod race;

pub use attribute::{ATTRIBUTE_DEFAULT, ATTRIBUTE_MAX, Attribute, Attributes};
pub use magic::{Discipline, MAX_DISCIPLINES, MagicCategory, MagicSet};
pub use player::{Player, UserId};
pub use race::Race;
