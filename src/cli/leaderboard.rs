//! Leaderboard command

use anyhow::Result;

use archmage::UserId;

use super::Context;

pub fn top_command(ctx: &Context, limit: Option<usize>, user: Option<i64>) -> Result<()> {
    let n = limit.unwrap_or(ctx.config.leaderboard.default_size);
    let entries = ctx.leaderboard.top_players(n)?;

    if entries.is_empty() {
        println!("No players yet.");
    } else {
        println!("Top {} players:\n", entries.len());
        for entry in &entries {
            let race = entry
                .race
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>3}. {:<14} {:<12} {:>5}",
                entry.rank, entry.user_id, race, entry.total_score
            );
        }
    }

    if let Some(user) = user {
        match ctx.leaderboard.rank_of(UserId(user))? {
            Some(rank) => println!("\nPlayer {user} is #{rank}."),
            None => println!("\nPlayer {user} has no record yet."),
        }
    }
    Ok(())
}
