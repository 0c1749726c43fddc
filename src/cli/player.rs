//! Player commands: profile, meditation, race and magic selection

use anyhow::Result;

use archmage::progression::{self, MagicChange, Profile};
use archmage::{ATTRIBUTE_MAX, UserId};

use super::{Context, format_duration, report};

/// Show a player's profile
pub fn profile_command(ctx: &Context, user: i64) -> Result<()> {
    match ctx.engine.profile(UserId(user), progression::now()) {
        Ok(profile) => {
            print_profile(&profile);
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub fn meditate_command(ctx: &Context, user: i64) -> Result<()> {
    match ctx.engine.meditate(UserId(user), progression::now()) {
        Ok(m) => {
            println!("You sink into deep meditation...");
            println!("  +{} Energy ({})", m.gain, m.energy);
            println!("  +{} Perception ({})", m.gain, m.perception);
            println!(
                "Next meditation in {}.",
                format_duration(ctx.engine.settings().meditation_cooldown_secs)
            );
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub fn race_command(ctx: &Context, user: i64, race: &str) -> Result<()> {
    match ctx.engine.select_race(UserId(user), race) {
        Ok(selection) => {
            match selection.previous {
                Some(previous) if previous != selection.race => {
                    println!("Race changed from {} to {}.", previous, selection.race)
                }
                _ => println!("Your race is now {}.", selection.race),
            }
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub fn magic_command(ctx: &Context, user: i64, discipline: &str) -> Result<()> {
    match ctx.engine.select_magic(UserId(user), discipline) {
        Ok(selection) => {
            match selection.change {
                MagicChange::Added(d) => println!("Learned {d}."),
                MagicChange::Removed(d) => println!("Forgot {d}."),
                MagicChange::Antimagic => println!("You renounce all magic: Antimagic."),
            }
            println!("Magic: {}", selection.magic);
            Ok(())
        }
        Err(e) => report(e),
    }
}

fn print_profile(profile: &Profile) {
    let p = &profile.player;
    println!("Player {}", p.id);
    println!();
    println!(
        "Race:  {}",
        p.race.map(|r| r.to_string()).unwrap_or_else(|| "not chosen".to_string())
    );
    println!("Magic: {}", p.magic);
    println!();
    for (attribute, value) in p.attributes().iter() {
        println!("{:<12} {:>3}/{}", attribute.label(), value, ATTRIBUTE_MAX);
    }
    println!("{:<12} {:>3}", "Total", p.total_score());
    println!();
    match profile.cooldown_remaining {
        None => println!("Meditation: ready"),
        Some(secs) => println!("Meditation: locked ({})", format_duration(secs)),
    }
}
