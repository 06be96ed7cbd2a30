use pitchboard_core::{
    compute_insertion_key, OrderKeyError, DEFAULT_STEP, EMPTY_CONTAINER_SEED, MAX_ORDER, MIN_ORDER,
};

#[test]
fn empty_container_returns_seed_within_bounds() {
    let key = compute_insertion_key(&[], &[]).unwrap();

    assert_eq!(key, EMPTY_CONTAINER_SEED);
    assert!(key.is_finite());
    assert!((MIN_ORDER..=MAX_ORDER).contains(&key));
}

#[test]
fn head_insert_steps_below_first_neighbor() {
    let key = compute_insertion_key(&[], &[100.0]).unwrap();

    assert_eq!(key, 100.0 - DEFAULT_STEP);
    assert!(key < 100.0);
    assert!(key >= MIN_ORDER);
}

#[test]
fn head_insert_clamps_at_lower_bound() {
    let key = compute_insertion_key(&[], &[MIN_ORDER + 1.0]).unwrap();

    assert_eq!(key, MIN_ORDER);
}

#[test]
fn tail_insert_steps_above_last_neighbor() {
    let key = compute_insertion_key(&[100.0], &[]).unwrap();

    assert_eq!(key, 100.0 + DEFAULT_STEP);
    assert!(key > 100.0);
    assert!(key <= MAX_ORDER);
}

#[test]
fn tail_insert_clamps_at_upper_bound() {
    let key = compute_insertion_key(&[MAX_ORDER], &[]).unwrap();

    assert_eq!(key, MAX_ORDER);
}

#[test]
fn between_neighbors_returns_midpoint() {
    let key = compute_insertion_key(&[1000.0], &[2000.0]).unwrap();

    assert_eq!(key, 1500.0);
}

#[test]
fn only_boundary_elements_are_used() {
    let key = compute_insertion_key(&[-5000.0, 1000.0], &[2000.0, 900_000.0]).unwrap();

    assert_eq!(key, 1500.0);
}

#[test]
fn collapsed_neighbors_still_return_midpoint() {
    let key = compute_insertion_key(&[10.0], &[11.0]).unwrap();
    assert_eq!(key, 10.5);

    let key = compute_insertion_key(&[5.0], &[5.0]).unwrap();
    assert_eq!(key, 5.0);
}

#[test]
fn thirty_insertions_at_one_boundary_stay_bounded() {
    let upper = 2000.0;
    let mut lower = 1000.0;

    for _ in 0..30 {
        let key = compute_insertion_key(&[lower], &[upper]).unwrap();

        assert!(key.is_finite());
        assert!(!key.is_nan());
        assert!((MIN_ORDER..=MAX_ORDER).contains(&key));
        assert!(key >= lower);
        assert!(key <= upper);

        lower = key;
    }
}

#[test]
fn non_finite_boundary_fails_loudly() {
    let err = compute_insertion_key(&[f64::NAN], &[1.0]).unwrap_err();
    assert!(matches!(err, OrderKeyError::NonFiniteKey { .. }));

    let err = compute_insertion_key(&[1.0], &[f64::INFINITY]).unwrap_err();
    assert!(matches!(err, OrderKeyError::NonFiniteKey { .. }));

    let err = compute_insertion_key(&[], &[f64::NEG_INFINITY]).unwrap_err();
    assert!(matches!(err, OrderKeyError::NonFiniteKey { .. }));
}

#[test]
fn inverted_boundaries_are_rejected() {
    let err = compute_insertion_key(&[2000.0], &[1000.0]).unwrap_err();

    assert_eq!(
        err,
        OrderKeyError::InvertedBounds {
            before: 2000.0,
            after: 1000.0
        }
    );
}
