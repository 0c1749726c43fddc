//! Mutation rules over a single player record
//!
//! These functions only touch the in-memory [`Player`] they are given. They
//! either succeed and leave the record in its new state, or fail and leave
//! it exactly as it was. Persisting the result is the caller's job
//! (see [`super::ProgressionEngine`]).

use crate::config::ProgressionSettings;
use crate::domain::{
    ATTRIBUTE_MAX, Attribute, Discipline, MAX_DISCIPLINES, MagicSet, Player, Race,
};

use super::error::ProgressionError;
use super::outcome::{MagicChange, MagicSelection, Meditation, RaceSelection};

type Result<T> = std::result::Result<T, ProgressionError>;

/// Meditate at `now` (epoch seconds): +gain to perception and energy,
/// capped at the attribute maximum, unless still on cooldown.
pub fn attempt_meditation(
    player: &mut Player,
    now: i64,
    settings: &ProgressionSettings,
) -> Result<Meditation> {
    if let Some(seconds_remaining) =
        player.cooldown_remaining(now, settings.meditation_cooldown_secs)
    {
        return Err(ProgressionError::OnCooldown { seconds_remaining });
    }

    let gain = settings.meditation_gain;
    let perception = player.increase_attribute(Attribute::Perception, gain);
    let energy = player.increase_attribute(Attribute::Energy, gain);
    player.last_meditation = Some(now);

    Ok(Meditation {
        gain,
        perception,
        energy,
        total_score: player.total_score(),
        next_available_at: now.saturating_add(settings.meditation_cooldown_secs),
    })
}

/// Set the player's race. Re-selecting over an existing race is allowed.
pub fn select_race(player: &mut Player, name: &str) -> Result<RaceSelection> {
    let race = Race::from_name(name).ok_or_else(|| ProgressionError::UnknownRace(name.to_string()))?;
    let previous = player.race.replace(race);
    Ok(RaceSelection { race, previous })
}

/// Toggle a discipline.
///
/// - Antimagic replaces the whole set
/// - a discipline already held is removed
/// - a new discipline is added while there is room and Antimagic is not held
pub fn select_magic(player: &mut Player, name: &str) -> Result<MagicSelection> {
    let discipline = Discipline::from_name(name)
        .ok_or_else(|| ProgressionError::UnknownDiscipline(name.to_string()))?;

    let change = if discipline.is_antimagic() {
        player.magic = MagicSet::antimagic();
        MagicChange::Antimagic
    } else if player.magic.contains(discipline) {
        player.magic.remove(discipline);
        MagicChange::Removed(discipline)
    } else if player.magic.has_room() {
        player.magic.push_unchecked(discipline);
        MagicChange::Added(discipline)
    } else {
        return Err(ProgressionError::SelectionLimitReached);
    };

    Ok(MagicSelection {
        change,
        magic: player.magic.clone(),
    })
}

/// Replace the whole set from an admin-supplied list.
///
/// Unknown names and duplicates are dropped. Antimagic anywhere in the list
/// wins and yields `{Antimagic}`. More than [`MAX_DISCIPLINES`] valid entries
/// without Antimagic is refused.
pub fn admin_set_magic<S: AsRef<str>>(player: &mut Player, names: &[S]) -> Result<MagicSet> {
    let mut valid: Vec<Discipline> = Vec::new();
    for name in names {
        match Discipline::from_name(name.as_ref()) {
            Some(d) if !valid.contains(&d) => valid.push(d),
            Some(_) => {}
            None => tracing::debug!(name = name.as_ref(), "Ignoring unknown discipline"),
        }
    }

    if valid.is_empty() {
        return Err(ProgressionError::InvalidSelection);
    }

    let magic = if valid.contains(&Discipline::Antimagic) {
        MagicSet::antimagic()
    } else if valid.len() > MAX_DISCIPLINES {
        return Err(ProgressionError::SelectionLimitReached);
    } else {
        MagicSet::try_from_vec(valid).ok_or(ProgressionError::InvalidSelection)?
    };

    player.magic = magic.clone();
    Ok(magic)
}

/// Overwrite one attribute. Values outside `[0, ATTRIBUTE_MAX]` are refused
/// rather than clamped.
pub fn admin_set_attribute(player: &mut Player, attribute: Attribute, value: i64) -> Result<u16> {
    let in_range = u16::try_from(value)
        .ok()
        .filter(|v| *v <= ATTRIBUTE_MAX)
        .ok_or(ProgressionError::AttributeOutOfRange { attribute, value })?;
    Ok(player.set_attribute(attribute, in_range))
}
