//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `pitchboard_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use pitchboard_core::db::open_db_in_memory;
use pitchboard_core::{BoardService, ContainerId, DropEvent, PriorityTier, SqliteBoardRepository};

fn main() {
    println!("pitchboard_core ping={}", pitchboard_core::ping());
    println!("pitchboard_core version={}", pitchboard_core::core_version());

    if let Err(err) = smoke_drop() {
        eprintln!("smoke drop failed: {err}");
        std::process::exit(1);
    }
}

fn smoke_drop() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteBoardRepository::try_new(&conn)?;
    let service = BoardService::new(repo);

    let first = service.create_pitch("Onboarding revamp", None)?;
    let second = service.create_pitch("Search facets", None)?;

    let tier = ContainerId::Tier(PriorityTier::Highest);
    for pitch in [&first, &second] {
        service.handle_drop(&DropEvent {
            pitch_uuid: pitch.uuid,
            source: ContainerId::Unsorted,
            destination: Some(tier),
            destination_index: 0,
        })?;
    }

    for (index, pitch) in service.list_container(&tier)?.iter().enumerate() {
        println!("{tier}[{index}] {}", pitch.title);
    }

    Ok(())
}
