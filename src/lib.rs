//! Archmage - character progression for chat RPG bots
//!
//! Every chat user owns a persistent [`Player`](domain::Player): eleven
//! attributes, a race, up to four magic disciplines, and a meditation
//! action gated by a three hour cooldown. The transport (a chat bot, the
//! bundled CLI) calls into this crate with a user id and an action and
//! renders whatever comes back.
//!
//! ## Components
//!
//! - [`store`]: durable table of players with serialized per-id writes
//! - [`progression`]: rules for meditation, race and magic selection, and
//!   admin overrides
//! - [`leaderboard`]: ranked views by total score

pub mod config;
pub mod domain;
pub mod leaderboard;
pub mod progression;
pub mod store;

pub use domain::*;
