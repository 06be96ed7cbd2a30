//! Canonical domain model for the pitch board.
//!
//! # Responsibility
//! - Define the pitch card record and its container identity.
//! - Keep one storage shape usable by reconciliation, projection and
//!   persistence without data copying.
//!
//! # Invariants
//! - Every pitch is identified by a stable `PitchId`.
//! - Order keys are meaningful only within one container.

pub mod container;
pub mod pitch;
