//! Configuration loading and management

mod io;

use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.archmage/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Meditation tuning
    #[serde(default)]
    pub progression: ProgressionSettings,

    /// Where player records live
    #[serde(default)]
    pub storage: StorageSettings,

    /// Leaderboard display
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
}

/// Meditation tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionSettings {
    /// Minimum seconds between two successful meditations (default: 3 hours)
    #[serde(default = "default_meditation_cooldown_secs")]
    pub meditation_cooldown_secs: i64,

    /// Points added to perception and energy per meditation
    #[serde(default = "default_meditation_gain")]
    pub meditation_gain: u16,
}

fn default_meditation_cooldown_secs() -> i64 {
    3 * 60 * 60
}

fn default_meditation_gain() -> u16 {
    2
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            meditation_cooldown_secs: default_meditation_cooldown_secs(),
            meditation_gain: default_meditation_gain(),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file. Defaults to ~/.archmage/players.db
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl StorageSettings {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| Config::global_config_dir().join("players.db"))
    }
}

/// Leaderboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    /// Number of entries shown when no size is requested
    #[serde(default = "default_leaderboard_size")]
    pub default_size: usize,
}

fn default_leaderboard_size() -> usize {
    10
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            default_size: default_leaderboard_size(),
        }
    }
}

impl Config {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.progression.meditation_cooldown_secs < 0 {
            bail!(
                "progression.meditation_cooldown_secs must not be negative (got {})",
                self.progression.meditation_cooldown_secs
            );
        }
        if self.progression.meditation_gain == 0 {
            bail!("progression.meditation_gain must be at least 1");
        }
        Ok(())
    }
}
