//! Insertion-key calculator.
//!
//! # Responsibility
//! - Given the keys of the neighbors around an insertion point, compute a
//!   key that sorts between them.
//! - Fail loudly on non-finite or inverted boundary keys instead of
//!   propagating NaN into a container's ordering.
//!
//! # Invariants
//! - Pure function over its inputs; no clock, no randomness.
//! - Results are finite and within `[MIN_ORDER, MAX_ORDER]`.
//! - Only the boundary elements of each neighbor slice are read.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lower bound for every order key.
pub const MIN_ORDER: f64 = -1_000_000_000.0;
/// Upper bound for every order key.
pub const MAX_ORDER: f64 = 1_000_000_000.0;
/// Default increment used when inserting at the head or tail of a container.
pub const DEFAULT_STEP: f64 = 1000.0;
/// Gap below which neighbor keys are considered collapsed. In the collapsed
/// regime the calculator returns plain midpoints and leaves recovery to a
/// container rebalance.
pub const COLLAPSE_THRESHOLD: f64 = 2.0;
/// Key assigned to the first pitch placed into an empty container.
pub const EMPTY_CONTAINER_SEED: f64 = 0.0;

/// Result type for order-key computation.
pub type OrderKeyResult<T> = Result<T, OrderKeyError>;

/// Errors from insertion-key computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderKeyError {
    /// A boundary neighbor key is NaN or infinite.
    NonFiniteKey { key: f64 },
    /// The preceding boundary key is greater than the following one.
    InvertedBounds { before: f64, after: f64 },
}

impl Display for OrderKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteKey { key } => write!(f, "order key must be finite, got {key}"),
            Self::InvertedBounds { before, after } => write!(
                f,
                "neighbor keys must be ascending, got before={before} after={after}"
            ),
        }
    }
}

impl Error for OrderKeyError {}

/// Computes the order key for a pitch inserted between two neighbor runs.
///
/// `before_keys` are the keys of pitches that will precede the insertion,
/// `after_keys` the keys that will follow it, both ascending. Only the last
/// element of `before_keys` and the first of `after_keys` are inspected.
///
/// When both boundary keys already sit outside `[MIN_ORDER, MAX_ORDER]`
/// (possible through the timestamp fallback), the clamped result can fall
/// outside the neighbor interval; that is the caller's signal to renumber
/// the container.
///
/// # Errors
/// - `NonFiniteKey` when either boundary key is NaN or infinite.
/// - `InvertedBounds` when the boundary keys are not ascending.
pub fn compute_insertion_key(before_keys: &[f64], after_keys: &[f64]) -> OrderKeyResult<f64> {
    let before = checked_boundary(before_keys.last().copied())?;
    let after = checked_boundary(after_keys.first().copied())?;

    match (before, after) {
        (None, None) => Ok(EMPTY_CONTAINER_SEED),
        (None, Some(after)) => Ok((after - DEFAULT_STEP).max(MIN_ORDER)),
        (Some(before), None) => Ok((before + DEFAULT_STEP).min(MAX_ORDER)),
        (Some(before), Some(after)) => {
            if before > after {
                return Err(OrderKeyError::InvertedBounds { before, after });
            }
            if (after - before).abs() < COLLAPSE_THRESHOLD {
                // Collapsed neighbors: the exact midpoint no longer separates
                // cleanly, the container is due for renumbering.
                return Ok((before + after) / 2.0);
            }
            Ok((before + (after - before) / 2.0).clamp(MIN_ORDER, MAX_ORDER))
        }
    }
}

fn checked_boundary(key: Option<f64>) -> OrderKeyResult<Option<f64>> {
    match key {
        Some(key) if !key.is_finite() => Err(OrderKeyError::NonFiniteKey { key }),
        other => Ok(other),
    }
}
