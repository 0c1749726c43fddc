//! CLI command implementations

pub mod admin;
pub mod catalog;
pub mod leaderboard;
pub mod player;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use archmage::config::Config;
use archmage::leaderboard::LeaderboardService;
use archmage::progression::{ProgressionEngine, ProgressionError};
use archmage::store::{PlayerDb, SqlitePlayerStore};

/// Everything a command needs, wired from the config
pub struct Context {
    pub config: Config,
    pub engine: ProgressionEngine<SqlitePlayerStore>,
    pub leaderboard: LeaderboardService<SqlitePlayerStore>,
}

impl Context {
    pub fn open(config_path: Option<&Path>, db_override: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let db_path = db_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.storage.resolved_db_path());

        tracing::debug!(db = %db_path.display(), "Opening player database");
        let store = Arc::new(SqlitePlayerStore::new(PlayerDb::open(&db_path)?));

        Ok(Self {
            engine: ProgressionEngine::new(Arc::clone(&store), config.progression.clone()),
            leaderboard: LeaderboardService::new(store),
            config,
        })
    }
}

/// Print refused actions for the user; pass storage failures up
pub fn report(err: ProgressionError) -> Result<()> {
    if err.is_user_facing() {
        eprintln!("{}", describe(&err));
        Ok(())
    } else {
        Err(err.into())
    }
}

fn describe(err: &ProgressionError) -> String {
    match err {
        ProgressionError::OnCooldown { seconds_remaining } => format!(
            "Meditation will be available in {}",
            format_duration(*seconds_remaining)
        ),
        ProgressionError::SelectionLimitReached => {
            "You cannot pick more magic: deselect one first (Antimagic excludes all others)"
                .to_string()
        }
        other => other.to_string(),
    }
}

/// `H:MM:SS`
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
