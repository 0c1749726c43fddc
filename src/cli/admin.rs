//! Admin override commands

use anyhow::Result;

use archmage::{Attribute, UserId};

use super::{Context, report};

/// Replace a player's disciplines wholesale
pub fn admin_magic_command(ctx: &Context, user: i64, disciplines: &[String]) -> Result<()> {
    match ctx.engine.admin_set_magic(UserId(user), disciplines) {
        Ok(magic) => {
            println!("Player {user} magic set to: {magic}");
            Ok(())
        }
        Err(e) => report(e),
    }
}

/// Set one attribute to an exact value
pub fn admin_set_command(ctx: &Context, user: i64, attribute: &str, value: i64) -> Result<()> {
    let Some(attribute) = Attribute::from_name(attribute) else {
        let known: Vec<&str> = Attribute::ALL.iter().map(|a| a.as_str()).collect();
        eprintln!("Unknown attribute: {attribute} (expected one of {})", known.join(", "));
        return Ok(());
    };

    match ctx.engine.admin_set_attribute(UserId(user), attribute, value) {
        Ok(player) => {
            println!(
                "Player {user}: {} = {} (total {})",
                attribute.label(),
                player.attribute(attribute),
                player.total_score()
            );
            Ok(())
        }
        Err(e) => report(e),
    }
}
