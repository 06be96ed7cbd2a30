//! Per-container sort projection.
//!
//! # Responsibility
//! - Filter pitches to one container and order them for display.
//! - Offer the opt-in shuffled variant used when reviewing unsorted cards.
//!
//! # Invariants
//! - Ordering is deterministic: effective order key ascending, then
//!   last-write timestamp, then uuid. Ties are broken, never dropped.
//! - Keys from other containers never influence the result.

use crate::model::container::ContainerId;
use crate::model::pitch::Pitch;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Returns the pitches of one container in display order.
///
/// Pure and idempotent: unchanged input yields a value-equal output. Keys
/// are compared with `f64::total_cmp`, so the ordering stays total even for
/// corrupt input that slipped past write validation.
pub fn project(pitches: &[Pitch], container: &ContainerId) -> Vec<Pitch> {
    let mut items: Vec<Pitch> = pitches
        .iter()
        .filter(|pitch| pitch.container == *container)
        .cloned()
        .collect();
    items.sort_by(compare_for_display);
    items
}

/// Returns the pitches of one container in a caller-seeded random order.
///
/// Presentation aid for reviewing the unsorted pool evenly; the stable
/// projection in [`project`] remains the canonical order. Callers own the
/// RNG, so the core stays deterministic.
pub fn shuffled_for_review(
    pitches: &[Pitch],
    container: &ContainerId,
    rng: &mut impl Rng,
) -> Vec<Pitch> {
    let mut items = project(pitches, container);
    items.shuffle(rng);
    items
}

fn compare_for_display(a: &Pitch, b: &Pitch) -> Ordering {
    a.effective_order_key()
        .total_cmp(&b.effective_order_key())
        .then_with(|| a.updated_at.cmp(&b.updated_at))
        .then_with(|| a.uuid.cmp(&b.uuid))
}
