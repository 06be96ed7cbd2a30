//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the board.
//! - Isolate SQLite query details from reconciliation and service code.
//!
//! # Invariants
//! - Write paths must enforce `Pitch::validate()` before persistence.
//! - Container and order key are always written together; a partial move is
//!   never observable.

pub mod board_repo;
