use pitchboard_core::db::open_db_in_memory;
use pitchboard_core::{
    Appetite, BoardService, ContainerId, DropEvent, DropOutcome, PriorityTier, ServiceError,
    SqliteBoardRepository, UnchangedReason, COLLAPSE_THRESHOLD, MAX_ORDER, MIN_ORDER,
};

const TIER: ContainerId = ContainerId::Tier(PriorityTier::Highest);

fn drop_into(pitch_uuid: uuid::Uuid, destination: ContainerId, index: usize) -> DropEvent {
    DropEvent {
        pitch_uuid,
        source: ContainerId::Unsorted,
        destination: Some(destination),
        destination_index: index,
    }
}

#[test]
fn create_pitch_trims_title_and_rejects_blank() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());

    let pitch = service.create_pitch("  Offline mode  ", None).unwrap();
    assert_eq!(pitch.title, "Offline mode");
    assert_eq!(pitch.container, ContainerId::Unsorted);

    let err = service.create_pitch("   ", None).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTitle));
}

#[test]
fn drops_into_a_tier_stack_up_in_drop_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());

    let first = service.create_pitch("First", None).unwrap();
    let second = service.create_pitch("Second", None).unwrap();

    let outcome = service
        .handle_drop(&drop_into(first.uuid, TIER, 0))
        .unwrap();
    assert!(matches!(outcome, DropOutcome::Moved(_)));

    // Second is dropped above the first one.
    service
        .handle_drop(&drop_into(second.uuid, TIER, 0))
        .unwrap();

    let listed = service.list_container(&TIER).unwrap();
    let uuids: Vec<_> = listed.iter().map(|pitch| pitch.uuid).collect();
    assert_eq!(uuids, vec![second.uuid, first.uuid]);
    assert!(listed[0].order_key.unwrap() < listed[1].order_key.unwrap());
}

#[test]
fn drop_without_destination_leaves_the_board_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());
    let pitch = service.create_pitch("Stationary", None).unwrap();

    let outcome = service
        .handle_drop(&DropEvent {
            pitch_uuid: pitch.uuid,
            source: ContainerId::Unsorted,
            destination: None,
            destination_index: 0,
        })
        .unwrap();

    assert_eq!(
        outcome,
        DropOutcome::Unchanged(UnchangedReason::NoDestination)
    );
    let reloaded = service.get_pitch(pitch.uuid).unwrap().unwrap();
    assert_eq!(reloaded, pitch);
}

#[test]
fn drop_back_onto_current_position_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());
    let pitch = service.create_pitch("Settled", None).unwrap();
    service.handle_drop(&drop_into(pitch.uuid, TIER, 0)).unwrap();
    let placed = service.get_pitch(pitch.uuid).unwrap().unwrap();

    let outcome = service
        .handle_drop(&DropEvent {
            pitch_uuid: pitch.uuid,
            source: TIER,
            destination: Some(TIER),
            destination_index: 0,
        })
        .unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged(UnchangedReason::SamePosition));
    let reloaded = service.get_pitch(pitch.uuid).unwrap().unwrap();
    assert_eq!(reloaded, placed);
}

#[test]
fn repeated_boundary_drops_keep_container_keys_healthy() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());

    let anchor = service.create_pitch("Anchor", None).unwrap();
    service
        .handle_drop(&drop_into(anchor.uuid, TIER, 0))
        .unwrap();
    let head = service.create_pitch("Head", None).unwrap();
    service.handle_drop(&drop_into(head.uuid, TIER, 0)).unwrap();

    // Hammer the same boundary; the service rebalances whenever key density
    // collapses, so the container must stay healthy throughout.
    for round in 0..15 {
        let pitch = service
            .create_pitch(format!("Wedge {round}"), None)
            .unwrap();
        service.handle_drop(&drop_into(pitch.uuid, TIER, 1)).unwrap();

        let keys: Vec<f64> = service
            .list_container(&TIER)
            .unwrap()
            .iter()
            .map(|pitch| pitch.order_key.unwrap())
            .collect();
        for key in &keys {
            assert!(key.is_finite());
            assert!((MIN_ORDER..=MAX_ORDER).contains(key));
        }
        for pair in keys.windows(2) {
            assert!(pair[1] - pair[0] >= COLLAPSE_THRESHOLD);
        }
    }

    assert_eq!(service.list_container(&TIER).unwrap().len(), 17);
}

#[test]
fn export_ballot_lists_containers_in_display_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());

    let ranked = service
        .create_pitch("Ranked", Some(Appetite::Medium))
        .unwrap();
    service
        .handle_drop(&drop_into(ranked.uuid, TIER, 0))
        .unwrap();
    let pending = service.create_pitch("Pending", None).unwrap();

    let ballot = service.export_ballot().unwrap();

    assert_eq!(ballot.entries.len(), 2);
    assert_eq!(ballot.entries[0].pitch_uuid, pending.uuid);
    assert_eq!(ballot.entries[0].container, ContainerId::Unsorted);
    assert_eq!(ballot.entries[0].position, 0);
    assert_eq!(ballot.entries[1].pitch_uuid, ranked.uuid);
    assert_eq!(ballot.entries[1].container, TIER);
    assert_eq!(ballot.entries[1].position, 0);

    let json = serde_json::to_value(&ballot).unwrap();
    assert_eq!(json["entries"][1]["title"], "Ranked");
    assert_eq!(json["entries"][1]["appetite"], "medium");
    assert_eq!(json["entries"][1]["container"], "priority-highest-priority");
    assert_eq!(json["entries"][1]["position"], 0);
}

#[test]
fn set_appetite_round_trips_through_the_service() {
    let conn = open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteBoardRepository::try_new(&conn).unwrap());
    let pitch = service.create_pitch("Sized", None).unwrap();

    service
        .set_appetite(pitch.uuid, Some(Appetite::Large))
        .unwrap();

    let reloaded = service.get_pitch(pitch.uuid).unwrap().unwrap();
    assert_eq!(reloaded.appetite, Some(Appetite::Large));
}
