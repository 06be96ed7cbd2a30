//! Board use-case service.
//!
//! # Responsibility
//! - Provide pitch create, list, appetite, drop and export operations.
//! - Apply drop results atomically and keep container key density healthy.
//!
//! # Invariants
//! - A drop mutates the board at most once, container and order key
//!   together.
//! - Rebalancing is triggered by key density, never by callers mid-drag.
//!
//! The service assumes the host delivers one drop at a time (a single UI
//! event loop). Exposing it to concurrent writers requires per-container
//! mutual exclusion around `handle_drop`, which this crate does not provide.

use crate::model::container::ContainerId;
use crate::model::pitch::{Appetite, Pitch, PitchId};
use crate::order::rebalance::needs_rebalance;
use crate::reconcile::drag::{
    BoardSnapshot, Diagnostics, DragReconciler, DropEvent, DropOutcome, LogDiagnostics,
    ReconcileError,
};
use crate::repo::board_repo::{BoardRepository, RepoError};
use crate::view::sort::project;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by board service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from board service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Repository-level failure.
    Repo(RepoError),
    /// Reconciliation-level failure.
    Reconcile(ReconcileError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "pitch title must not be blank"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Reconcile(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle => None,
            Self::Repo(err) => Some(err),
            Self::Reconcile(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ReconcileError> for ServiceError {
    fn from(value: ReconcileError) -> Self {
        Self::Reconcile(value)
    }
}

/// One exported vote line: a pitch at its position in a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    pub pitch_uuid: PitchId,
    pub title: String,
    pub appetite: Option<Appetite>,
    pub container: ContainerId,
    pub position: u32,
}

/// Exported snapshot of the voter's full board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub entries: Vec<BallotEntry>,
}

/// Board service facade.
pub struct BoardService<R: BoardRepository, D: Diagnostics = LogDiagnostics> {
    repo: R,
    reconciler: DragReconciler<D>,
}

impl<R: BoardRepository> BoardService<R, LogDiagnostics> {
    /// Creates a service whose drop diagnostics go to the `log` crate.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            reconciler: DragReconciler::with_log_diagnostics(),
        }
    }
}

impl<R: BoardRepository, D: Diagnostics> BoardService<R, D> {
    /// Creates a service with an injected drop diagnostics sink.
    pub fn with_diagnostics(repo: R, diagnostics: D) -> Self {
        Self {
            repo,
            reconciler: DragReconciler::new(diagnostics),
        }
    }

    /// Creates one pitch in the unsorted pool.
    pub fn create_pitch(
        &self,
        title: impl Into<String>,
        appetite: Option<Appetite>,
    ) -> ServiceResult<Pitch> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::InvalidTitle);
        }
        let mut pitch = Pitch::new(trimmed);
        pitch.appetite = appetite;
        self.repo.create_pitch(&pitch).map_err(Into::into)
    }

    /// Loads one pitch by id.
    pub fn get_pitch(&self, id: PitchId) -> ServiceResult<Option<Pitch>> {
        self.repo.get_pitch(id).map_err(Into::into)
    }

    /// Lists one container's pitches in display order.
    pub fn list_container(&self, container: &ContainerId) -> ServiceResult<Vec<Pitch>> {
        self.repo.list_container(container).map_err(Into::into)
    }

    /// Records the voter's size estimate for one pitch.
    pub fn set_appetite(&self, id: PitchId, appetite: Option<Appetite>) -> ServiceResult<()> {
        self.repo.set_appetite(id, appetite).map_err(Into::into)
    }

    /// Reconciles and applies one drop event.
    ///
    /// Unchanged outcomes leave the board untouched. A moved outcome is
    /// applied as a single write; when the destination container's keys have
    /// collapsed below the density threshold afterwards, the container is
    /// renumbered in the same call.
    pub fn handle_drop(&self, event: &DropEvent) -> ServiceResult<DropOutcome> {
        let snapshot = BoardSnapshot::new(self.repo.list_all()?);
        let outcome = self.reconciler.reconcile_drop(&snapshot, event)?;

        if let DropOutcome::Moved(update) = &outcome {
            self.repo.apply_order_update(update)?;
            self.maybe_rebalance(&update.container)?;
        }

        Ok(outcome)
    }

    /// Exports the full board as an ordered, serializable ballot.
    pub fn export_ballot(&self) -> ServiceResult<Ballot> {
        let pitches = self.repo.list_all()?;
        let mut entries = Vec::new();
        for container in ContainerId::all() {
            for (position, pitch) in project(&pitches, &container).iter().enumerate() {
                entries.push(BallotEntry {
                    pitch_uuid: pitch.uuid,
                    title: pitch.title.clone(),
                    appetite: pitch.appetite,
                    container,
                    position: position as u32,
                });
            }
        }
        Ok(Ballot { entries })
    }

    fn maybe_rebalance(&self, container: &ContainerId) -> ServiceResult<()> {
        let keys: Vec<f64> = self
            .repo
            .list_container(container)?
            .iter()
            .filter_map(|pitch| pitch.order_key)
            .collect();
        if !needs_rebalance(&keys) {
            return Ok(());
        }

        let renumbered = self.repo.rebalance_container(container)?;
        info!(
            "event=container_rebalanced module=service status=ok container={container} pitches={renumbered}"
        );
        Ok(())
    }
}
