//! Drop-event reconciliation.
//!
//! # Responsibility
//! - Turn a raw drag-and-drop event into at most one container/order-key
//!   update for the dragged pitch.
//! - Absorb non-fatal drop conditions as explicit no-op outcomes so a drag
//!   gesture never crashes the host event loop.
//!
//! # Invariants
//! - Reconciliation never mutates state; it only describes the update.
//! - Unknown destinations are diagnosed, never thrown.

pub mod drag;
