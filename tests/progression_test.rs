//! End-to-end progression scenarios against the SQLite store

mod common;

use archmage::progression::{MagicChange, ProgressionError};
use archmage::store::{PlayerStore, PlayerUpdate};
use archmage::{Attribute, Discipline, MagicSet, Race, UserId};

use common::{assert_invariants, engine, leaderboard, stored, temp_store};

#[test]
fn test_new_player_has_defaults() {
    let (_dir, store) = temp_store();
    let player = store.get_or_create(UserId(1)).unwrap();

    assert!(player.attributes().iter().all(|(_, v)| v == 10));
    assert_eq!(player.race, None);
    assert!(player.magic.is_empty());
    assert_eq!(player.last_meditation, None);
    assert_eq!(player.total_score(), 110);
}

#[test]
fn test_meditation_then_cooldown() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    let m = engine.meditate(UserId(1), 0).unwrap();
    assert_eq!((m.perception, m.energy), (12, 12));
    assert_eq!(m.total_score, 114);

    let err = engine.meditate(UserId(1), 100).unwrap_err();
    assert!(matches!(err, ProgressionError::OnCooldown { seconds_remaining: 10_700 }));

    let p = stored(store.as_ref(), 1);
    assert_eq!(p.total_score(), 114);
    assert_eq!(p.last_meditation, Some(0));
    assert_invariants(&p);
}

#[test]
fn test_meditation_unlocks_after_cooldown() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    engine.meditate(UserId(1), 1_000).unwrap();
    assert!(engine.meditate(UserId(1), 1_000 + 10_799).is_err());
    let m = engine.meditate(UserId(1), 1_000 + 10_800).unwrap();
    assert_eq!(m.perception, 14);
    assert_eq!(m.next_available_at, 1_000 + 2 * 10_800);
}

#[test]
fn test_meditation_cap_boundary() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);
    store.get_or_create(UserId(1)).unwrap();
    store
        .save(
            UserId(1),
            &PlayerUpdate::new()
                .attribute(Attribute::Perception, 249)
                .attribute(Attribute::Energy, 249),
        )
        .unwrap();

    let m = engine.meditate(UserId(1), 0).unwrap();
    assert_eq!((m.perception, m.energy), (250, 250));

    let p = stored(store.as_ref(), 1);
    assert_eq!(p.attribute(Attribute::Perception), 250);
    assert_invariants(&p);
}

#[test]
fn test_antimagic_blocks_further_selection() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    engine.select_magic(UserId(1), "Fire").unwrap();
    engine.select_magic(UserId(1), "Ice").unwrap();

    let sel = engine.select_magic(UserId(1), "Antimagic").unwrap();
    assert_eq!(sel.change, MagicChange::Antimagic);
    assert_eq!(stored(store.as_ref(), 1).magic, MagicSet::antimagic());

    let err = engine.select_magic(UserId(1), "Fire").unwrap_err();
    assert!(matches!(err, ProgressionError::SelectionLimitReached));
    assert_eq!(stored(store.as_ref(), 1).magic, MagicSet::antimagic());
}

#[test]
fn test_fifth_discipline_refused() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    for name in ["Fire", "Ice", "Water", "Earth"] {
        engine.select_magic(UserId(1), name).unwrap();
    }
    let err = engine.select_magic(UserId(1), "Air").unwrap_err();
    assert!(matches!(err, ProgressionError::SelectionLimitReached));

    let p = stored(store.as_ref(), 1);
    assert_eq!(p.magic.len(), 4);
    assert!(!p.magic.contains(Discipline::Air));
}

#[test]
fn test_toggle_round_trip_persists() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);
    engine.select_magic(UserId(1), "Light").unwrap();
    let before = stored(store.as_ref(), 1).magic;

    engine.select_magic(UserId(1), "Fire").unwrap();
    engine.select_magic(UserId(1), "Fire").unwrap();
    assert_eq!(stored(store.as_ref(), 1).magic, before);
}

#[test]
fn test_race_reselection_allowed() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    engine.select_race(UserId(1), "Vampires").unwrap();
    let again = engine.select_race(UserId(1), "3").unwrap();
    assert_eq!(again.previous, Some(Race::Vampires));
    assert_eq!(stored(store.as_ref(), 1).race, Some(Race::Dwarves));

    let err = engine.select_race(UserId(1), "Hobbits").unwrap_err();
    assert!(matches!(err, ProgressionError::UnknownRace(_)));
    assert_eq!(stored(store.as_ref(), 1).race, Some(Race::Dwarves));
}

#[test]
fn test_admin_flow() {
    let (_dir, store) = temp_store();
    let engine = engine(&store);

    let err = engine.admin_set_magic(UserId(7), &["Fire"]).unwrap_err();
    assert!(matches!(err, ProgressionError::NotFound(UserId(7))));
    assert!(store.get(UserId(7)).unwrap().is_none());

    engine.profile(UserId(7), 0).unwrap();
    let magic = engine
        .admin_set_magic(UserId(7), &["Chaos", "Creation", "nonsense"])
        .unwrap();
    assert_eq!(magic.as_slice(), &[Discipline::Chaos, Discipline::Creation]);

    let err = engine.admin_set_magic(UserId(7), &["nonsense"]).unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidSelection));

    let p = engine
        .admin_set_attribute(UserId(7), Attribute::Charisma, 90)
        .unwrap();
    assert_eq!(p.total_score(), 190);
    assert_invariants(&stored(store.as_ref(), 7));
}

#[test]
fn test_leaderboard_order() {
    let (_dir, store) = temp_store();
    for (id, strength) in [(1, 50), (2, 10), (3, 100)] {
        store.get_or_create(UserId(id)).unwrap();
        store
            .save(UserId(id), &PlayerUpdate::new().attribute(Attribute::Strength, strength))
            .unwrap();
    }

    let board = leaderboard(&store);
    let scores: Vec<u32> = board
        .top_players(10)
        .unwrap()
        .iter()
        .map(|e| e.total_score)
        .collect();
    assert_eq!(scores, vec![200, 150, 110]);
}

#[test]
fn test_leaderboard_empty_and_truncated() {
    let (_dir, store) = temp_store();
    let board = leaderboard(&store);
    assert!(board.top_players(10).unwrap().is_empty());

    for id in 1..=5 {
        store.get_or_create(UserId(id)).unwrap();
    }
    let top = board.top_players(3).unwrap();
    // equal scores keep insertion order
    let ids: Vec<UserId> = top.iter().map(|e| e.user_id).collect();
    assert_eq!(ids, vec![UserId(1), UserId(2), UserId(3)]);
}

#[test]
fn test_state_survives_reopen() {
    let (dir, store) = temp_store();
    let engine = engine(&store);
    engine.meditate(UserId(1), 500).unwrap();
    engine.select_race(UserId(1), "Nagas").unwrap();
    engine.select_magic(UserId(1), "Runes").unwrap();
    drop(engine);
    drop(store);

    let reopened = common::open_store(&dir.path().join("players.db"));
    let p = stored(reopened.as_ref(), 1);
    assert_eq!(p.race, Some(Race::Nagas));
    assert!(p.magic.contains(Discipline::Runes));
    assert_eq!(p.last_meditation, Some(500));
    assert_eq!(p.total_score(), 114);
}

#[test]
fn test_backends_agree_on_refusals_and_clamping() {
    use archmage::store::MemoryPlayerStore;
    use std::sync::Arc;

    let (_dir, sqlite) = temp_store();
    let memory = Arc::new(MemoryPlayerStore::new());

    let sql_err = engine(&sqlite).select_race(UserId(9), "Hobbits").unwrap_err();
    let mem_err = engine(&memory).select_race(UserId(9), "Hobbits").unwrap_err();
    assert!(matches!(sql_err, ProgressionError::UnknownRace(_)));
    assert!(matches!(mem_err, ProgressionError::UnknownRace(_)));
    assert_eq!(sqlite.count().unwrap(), 0);
    assert_eq!(memory.count().unwrap(), 0);

    let update = PlayerUpdate::new().attribute(Attribute::Stamina, 400);
    sqlite.get_or_create(UserId(1)).unwrap();
    memory.get_or_create(UserId(1)).unwrap();
    let from_sql = sqlite.save(UserId(1), &update).unwrap();
    let from_mem = memory.save(UserId(1), &update).unwrap();
    assert_eq!(from_sql.attribute(Attribute::Stamina), 250);
    assert_eq!(from_sql, from_mem);
    assert_invariants(&from_sql);
}
