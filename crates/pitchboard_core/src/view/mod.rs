//! Pure display projections over the pitch collection.
//!
//! # Responsibility
//! - Derive per-container ordered lists for rendering.
//! - Keep projection referentially transparent so callers can memoize it.
//!
//! # Invariants
//! - Projection never mutates its inputs and depends on no ambient state.

pub mod sort;
