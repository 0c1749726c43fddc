use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "archmage")]
#[command(about = "Archmage - character progression for chat RPG bots")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.archmage/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Player database to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a player's profile (creates the player on first use)
    Profile { user: i64 },

    /// Meditate: +2 perception and energy, once every 3 hours
    Meditate { user: i64 },

    /// Choose a race by name or catalog number
    Race { user: i64, race: String },

    /// Toggle a magic discipline (Antimagic replaces everything)
    Magic { user: i64, discipline: String },

    /// Admin: replace a player's disciplines
    AdminMagic {
        user: i64,
        #[arg(required = true)]
        disciplines: Vec<String>,
    },

    /// Admin: set one attribute to an exact value
    AdminSet {
        user: i64,
        attribute: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Show the leaderboard
    Top {
        /// Number of players to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Also show this player's position
        #[arg(long)]
        user: Option<i64>,
    },

    /// List races and magic disciplines
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    dispatch(cli)
}

/// Run one command. The player database is opened only by commands that
/// touch players.
fn dispatch(cli: Cli) -> Result<()> {
    let open = || cli::Context::open(cli.config.as_deref(), cli.db.as_deref());

    match cli.command {
        Commands::Profile { user } => cli::player::profile_command(&open()?, user),
        Commands::Meditate { user } => cli::player::meditate_command(&open()?, user),
        Commands::Race { user, race } => cli::player::race_command(&open()?, user, &race),
        Commands::Magic { user, discipline } => {
            cli::player::magic_command(&open()?, user, &discipline)
        }
        Commands::AdminMagic { user, disciplines } => {
            cli::admin::admin_magic_command(&open()?, user, &disciplines)
        }
        Commands::AdminSet {
            user,
            attribute,
            value,
        } => cli::admin::admin_set_command(&open()?, user, &attribute, value),
        Commands::Top { limit, user } => cli::leaderboard::top_command(&open()?, limit, user),
        Commands::Catalog => {
            cli::catalog::catalog_command();
            Ok(())
        }
    }
}
