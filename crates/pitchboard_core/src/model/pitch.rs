//! Pitch domain model.
//!
//! # Responsibility
//! - Define the canonical pitch card record shared by reconciliation,
//!   projection and persistence.
//! - Provide the effective-order-key fallback chain used everywhere a sort
//!   key is read.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another pitch.
//! - `order_key`, when present, is a finite number; non-finite values are
//!   rejected at validation time instead of being coerced.
//! - Timestamps are epoch milliseconds owned by the persistence layer and
//!   stay `0` until the pitch is first persisted.

use crate::model::container::ContainerId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every pitch card.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PitchId = Uuid;

/// Size estimate a voter can assign to a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appetite {
    Small,
    Medium,
    Large,
}

/// Canonical record for one votable pitch card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    /// Stable global ID used for drag events, persistence and export.
    pub uuid: PitchId,
    /// User-facing card title.
    pub title: String,
    /// Optional size estimate assigned by the voter.
    pub appetite: Option<Appetite>,
    /// Column the pitch currently lives in.
    pub container: ContainerId,
    /// Relative position within `container`. `None` until the pitch has been
    /// explicitly placed by a drop.
    pub order_key: Option<f64>,
    /// Epoch ms creation timestamp, assigned on first persistence.
    pub created_at: i64,
    /// Epoch ms last-write timestamp, assigned on every persisted write.
    pub updated_at: i64,
}

impl Pitch {
    /// Creates a new unsorted pitch with a generated stable ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            appetite: None,
            container: ContainerId::Unsorted,
            order_key: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Creates a pitch with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: PitchId, title: impl Into<String>) -> Result<Self, PitchValidationError> {
        if uuid.is_nil() {
            return Err(PitchValidationError::NilUuid);
        }
        let mut pitch = Self::new(title);
        pitch.uuid = uuid;
        Ok(pitch)
    }

    /// Checks record-level invariants before persistence.
    ///
    /// # Errors
    /// - `NilUuid` when the ID is the nil UUID.
    /// - `BlankTitle` when the title is empty after trim.
    /// - `NonFiniteOrderKey` when an assigned order key is NaN or infinite.
    pub fn validate(&self) -> Result<(), PitchValidationError> {
        if self.uuid.is_nil() {
            return Err(PitchValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(PitchValidationError::BlankTitle);
        }
        if matches!(self.order_key, Some(key) if !key.is_finite()) {
            return Err(PitchValidationError::NonFiniteOrderKey);
        }
        Ok(())
    }

    /// Sort key used for display and neighbor extraction.
    ///
    /// Fallback chain: assigned order key, then last-write timestamp, then a
    /// value derived from the first uuid byte so even never-persisted,
    /// never-placed pitches order totally.
    pub fn effective_order_key(&self) -> f64 {
        if let Some(key) = self.order_key {
            return key;
        }
        if self.updated_at > 0 {
            return self.updated_at as f64;
        }
        f64::from(self.uuid.as_bytes()[0])
    }

    /// Returns whether this pitch has been explicitly placed by a drop.
    pub fn is_placed(&self) -> bool {
        self.order_key.is_some()
    }
}

/// Record-level validation failures for [`Pitch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchValidationError {
    /// The nil UUID is reserved and never a valid pitch identity.
    NilUuid,
    /// Title is empty after trimming whitespace.
    BlankTitle,
    /// An assigned order key is NaN or infinite.
    NonFiniteOrderKey,
}

impl Display for PitchValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "pitch uuid must not be nil"),
            Self::BlankTitle => write!(f, "pitch title must not be blank"),
            Self::NonFiniteOrderKey => write!(f, "pitch order key must be finite"),
        }
    }
}

impl Error for PitchValidationError {}
