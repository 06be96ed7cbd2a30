use pitchboard_core::{ContainerId, ContainerParseError, InterestBucket, PriorityTier};
use std::collections::HashSet;

#[test]
fn every_container_round_trips_through_its_wire_string() {
    for container in ContainerId::all() {
        let wire = container.to_string();
        let parsed: ContainerId = wire.parse().unwrap();
        assert_eq!(parsed, container, "round trip failed for `{wire}`");
    }
}

#[test]
fn wire_strings_use_expected_column_ids() {
    assert_eq!(ContainerId::Unsorted.to_string(), "unsorted");
    assert_eq!(
        ContainerId::Tier(PriorityTier::Highest).to_string(),
        "priority-highest-priority"
    );
    assert_eq!(
        ContainerId::Tier(PriorityTier::Low).to_string(),
        "priority-low-priority"
    );
    assert_eq!(
        ContainerId::Bucket(InterestBucket::VeryInterested).to_string(),
        "interest-very-interested"
    );
    assert_eq!(
        ContainerId::Bucket(InterestBucket::NotInterested).to_string(),
        "interest-not-interested"
    );
}

#[test]
fn full_board_has_eight_distinct_containers() {
    let containers = ContainerId::all();

    assert_eq!(containers.len(), 8);
    let unique: HashSet<ContainerId> = containers.into_iter().collect();
    assert_eq!(unique.len(), 8);
}

#[test]
fn malformed_ids_are_rejected() {
    let err = "".parse::<ContainerId>().unwrap_err();
    assert!(matches!(err, ContainerParseError::MalformedId(_)));

    let err = "Priority-High".parse::<ContainerId>().unwrap_err();
    assert!(matches!(err, ContainerParseError::MalformedId(_)));

    let err = "tier-highest-priority".parse::<ContainerId>().unwrap_err();
    assert!(matches!(err, ContainerParseError::MalformedId(_)));
}

#[test]
fn unknown_tier_and_bucket_slugs_are_rejected() {
    let err = "priority-mediocre".parse::<ContainerId>().unwrap_err();
    assert_eq!(err, ContainerParseError::UnknownTier("mediocre".to_string()));

    let err = "interest-bored".parse::<ContainerId>().unwrap_err();
    assert_eq!(err, ContainerParseError::UnknownBucket("bored".to_string()));
}

#[test]
fn serde_round_trips_through_the_wire_string() {
    let container = ContainerId::Tier(PriorityTier::Medium);

    let json = serde_json::to_value(container).unwrap();
    assert_eq!(json, serde_json::json!("priority-medium-priority"));

    let decoded: ContainerId = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, container);
}

#[test]
fn serde_rejects_unknown_wire_strings() {
    let result: Result<ContainerId, _> = serde_json::from_value(serde_json::json!("priority-x"));

    assert!(result.is_err());
}
