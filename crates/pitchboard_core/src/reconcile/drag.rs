//! Drag-end reconciliation logic.
//!
//! # Responsibility
//! - Decide, from a drop event and the current board state, which
//!   container/order-key pair the dragged pitch should receive.
//! - Route non-fatal drop conditions to an injected diagnostics sink
//!   instead of a global console.
//!
//! # Invariants
//! - Exactly one [`OrderUpdate`] is produced per successful drop; all other
//!   paths return an explicit unchanged outcome.
//! - The dragged pitch is excluded from neighbor extraction.
//! - Only invalid numeric input propagates as an error, synchronously.

use crate::model::container::ContainerId;
use crate::model::pitch::{Pitch, PitchId};
use crate::order::key::{compute_insertion_key, OrderKeyError};
use crate::view::sort::project;
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw drop event as delivered by the drag library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    /// Pitch being dragged.
    pub pitch_uuid: PitchId,
    /// Container the drag started in.
    pub source: ContainerId,
    /// Container the pitch was released over. `None` when the pitch was
    /// dropped outside any valid target.
    pub destination: Option<ContainerId>,
    /// Insertion index within the destination container.
    pub destination_index: usize,
}

/// The single write a successful drop produces.
///
/// Container and order key must be applied together; a partial update must
/// never be observable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderUpdate {
    pub pitch_uuid: PitchId,
    pub container: ContainerId,
    pub order_key: f64,
}

/// Why a drop left the board unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Dropped outside any valid target.
    NoDestination,
    /// Dropped back onto its current position.
    SamePosition,
    /// Destination container is not exposed by the board state.
    UnknownDestination,
}

/// Outcome of reconciling one drop event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// No update should be applied.
    Unchanged(UnchangedReason),
    /// Apply this update atomically.
    Moved(OrderUpdate),
}

impl DropOutcome {
    /// Returns whether the drop left the board unchanged.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Read-only board state the reconciler works against.
pub trait BoardState {
    /// Ordered pitches of one container, or `None` when the board does not
    /// expose that container. Implementors may include the dragged pitch;
    /// the reconciler excludes it itself.
    fn container_pitches(&self, container: &ContainerId) -> Option<Vec<Pitch>>;
}

/// In-memory [`BoardState`] built from a flat pitch list.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pitches: Vec<Pitch>,
    exposed: HashSet<ContainerId>,
}

impl BoardSnapshot {
    /// Creates a snapshot exposing every container of a full board.
    pub fn new(pitches: Vec<Pitch>) -> Self {
        Self::with_exposed(pitches, ContainerId::all())
    }

    /// Creates a snapshot exposing only the given containers.
    ///
    /// Drops targeting a container outside this set reconcile to an
    /// unknown-destination no-op.
    pub fn with_exposed(
        pitches: Vec<Pitch>,
        exposed: impl IntoIterator<Item = ContainerId>,
    ) -> Self {
        Self {
            pitches,
            exposed: exposed.into_iter().collect(),
        }
    }
}

impl BoardState for BoardSnapshot {
    fn container_pitches(&self, container: &ContainerId) -> Option<Vec<Pitch>> {
        if !self.exposed.contains(container) {
            return None;
        }
        Some(project(&self.pitches, container))
    }
}

/// Non-fatal drop conditions surfaced to the diagnostics sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDiagnostic {
    /// The pitch was released outside any droppable target.
    DroppedOutside { pitch_uuid: PitchId },
    /// The destination container is unknown to the board state.
    UnknownDestination {
        pitch_uuid: PitchId,
        destination: ContainerId,
    },
}

/// Sink for drop diagnostics, injected into the reconciler.
pub trait Diagnostics {
    fn emit(&self, diagnostic: &DropDiagnostic);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn emit(&self, diagnostic: &DropDiagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Default diagnostics sink backed by the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&self, diagnostic: &DropDiagnostic) {
        match diagnostic {
            DropDiagnostic::DroppedOutside { pitch_uuid } => debug!(
                "event=drop_ignored module=reconcile status=ok reason=no_destination pitch={pitch_uuid}"
            ),
            DropDiagnostic::UnknownDestination {
                pitch_uuid,
                destination,
            } => warn!(
                "event=drop_ignored module=reconcile status=warn reason=unknown_destination pitch={pitch_uuid} destination={destination}"
            ),
        }
    }
}

/// Errors from drop reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReconcileError {
    /// Neighbor key extraction produced invalid numeric input.
    OrderKey(OrderKeyError),
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderKey(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OrderKey(err) => Some(err),
        }
    }
}

impl From<OrderKeyError> for ReconcileError {
    fn from(value: OrderKeyError) -> Self {
        Self::OrderKey(value)
    }
}

/// Reconciles drop events against a board state.
pub struct DragReconciler<D: Diagnostics = LogDiagnostics> {
    diagnostics: D,
}

impl DragReconciler<LogDiagnostics> {
    /// Creates a reconciler whose diagnostics go to the `log` crate.
    pub fn with_log_diagnostics() -> Self {
        Self::new(LogDiagnostics)
    }
}

impl<D: Diagnostics> DragReconciler<D> {
    /// Creates a reconciler with an injected diagnostics sink.
    pub fn new(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Computes the update a drop event should produce, if any.
    ///
    /// Non-fatal conditions (no destination, unchanged position, unknown
    /// destination) return [`DropOutcome::Unchanged`] and never an error.
    ///
    /// # Errors
    /// - `OrderKey` when a neighbor's effective key is NaN or infinite.
    pub fn reconcile_drop<S: BoardState>(
        &self,
        state: &S,
        event: &DropEvent,
    ) -> Result<DropOutcome, ReconcileError> {
        let Some(destination) = event.destination else {
            self.diagnostics.emit(&DropDiagnostic::DroppedOutside {
                pitch_uuid: event.pitch_uuid,
            });
            return Ok(DropOutcome::Unchanged(UnchangedReason::NoDestination));
        };

        let Some(destination_pitches) = state.container_pitches(&destination) else {
            self.diagnostics.emit(&DropDiagnostic::UnknownDestination {
                pitch_uuid: event.pitch_uuid,
                destination,
            });
            return Ok(DropOutcome::Unchanged(UnchangedReason::UnknownDestination));
        };

        if event.source == destination {
            let current_index = destination_pitches
                .iter()
                .position(|pitch| pitch.uuid == event.pitch_uuid);
            if current_index == Some(event.destination_index) {
                return Ok(DropOutcome::Unchanged(UnchangedReason::SamePosition));
            }
        }

        let mut neighbors: Vec<&Pitch> = destination_pitches
            .iter()
            .filter(|pitch| pitch.uuid != event.pitch_uuid)
            .collect();
        let split_at = event.destination_index.min(neighbors.len());
        let after = neighbors.split_off(split_at);

        let before_keys: Vec<f64> = neighbors
            .iter()
            .map(|pitch| pitch.effective_order_key())
            .collect();
        let after_keys: Vec<f64> = after
            .iter()
            .map(|pitch| pitch.effective_order_key())
            .collect();

        let order_key = compute_insertion_key(&before_keys, &after_keys)?;
        Ok(DropOutcome::Moved(OrderUpdate {
            pitch_uuid: event.pitch_uuid,
            container: destination,
            order_key,
        }))
    }
}
