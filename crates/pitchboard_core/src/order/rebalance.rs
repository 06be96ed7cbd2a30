//! Container renumbering support.
//!
//! # Responsibility
//! - Generate the evenly spaced key layout a rebalanced container takes.
//! - Detect when a container's assigned keys have grown dense enough to
//!   need renumbering.
//!
//! # Invariants
//! - Generated keys are ascending until the range ceiling and never exceed
//!   `MAX_ORDER`.

use crate::order::key::{COLLAPSE_THRESHOLD, DEFAULT_STEP, MAX_ORDER};

/// Returns `len` evenly spaced keys starting at `0`.
///
/// This is the target shape of a container rebalance: positions map to
/// `0, 1000, 2000, …`, capped at `MAX_ORDER` for absurdly large containers.
pub fn evenly_spaced_keys(len: usize) -> Vec<f64> {
    (0..len)
        .map(|index| (index as f64 * DEFAULT_STEP).min(MAX_ORDER))
        .collect()
}

/// Returns whether any adjacent pair of assigned keys has collapsed.
///
/// The input does not need to be sorted; non-finite values are ignored here
/// because they are rejected before they can be persisted.
pub fn needs_rebalance(keys: &[f64]) -> bool {
    let mut sorted: Vec<f64> = keys.iter().copied().filter(|key| key.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
        .windows(2)
        .any(|pair| pair[1] - pair[0] < COLLAPSE_THRESHOLD)
}
