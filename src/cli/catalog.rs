//! Catalog listing

use archmage::{Discipline, MAX_DISCIPLINES, MagicCategory, Race};

pub fn catalog_command() {
    println!("Races:");
    for race in Race::ALL {
        println!("  ({:>2}) {}", race.number(), race);
    }

    println!("\nMagic (pick up to {MAX_DISCIPLINES}):");
    for category in MagicCategory::ALL {
        let names: Vec<&str> = category.disciplines().map(|d| d.as_str()).collect();
        println!("  {} - {}", category.label(), category.description());
        println!("    {}", names.join(", "));
    }
    println!(
        "  {} - excludes every other discipline",
        Discipline::Antimagic
    );
}
