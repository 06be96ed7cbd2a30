//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate reconciliation and repository calls into use-case APIs.
//! - Keep UI layers decoupled from storage and ordering details.

pub mod board_service;
