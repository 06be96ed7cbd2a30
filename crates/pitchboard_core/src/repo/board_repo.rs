//! Board repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and ordering APIs over `pitches` storage.
//! - Keep SQL details and fallback-chain ordering inside the repository
//!   boundary.
//!
//! # Invariants
//! - Listing order is deterministic: `COALESCE(order_key, updated_at) ASC,
//!   updated_at ASC, uuid ASC`.
//! - `apply_order_update` writes container, order key and timestamp in one
//!   statement.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::container::ContainerId;
use crate::model::pitch::{Appetite, Pitch, PitchId, PitchValidationError};
use crate::order::rebalance::evenly_spaced_keys;
use crate::reconcile::drag::OrderUpdate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PITCH_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    appetite,
    container,
    order_key,
    created_at,
    updated_at
FROM pitches";

const DISPLAY_ORDER_SQL: &str = "COALESCE(order_key, updated_at) ASC, updated_at ASC, uuid ASC";

/// Result type used by board repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from board repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed validation before a write.
    Validation(PitchValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target pitch does not exist.
    NotFound(PitchId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "pitch not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted pitch data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PitchValidationError> for RepoError {
    fn from(value: PitchValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for board persistence.
pub trait BoardRepository {
    /// Persists one new pitch and returns the authoritative stored row.
    fn create_pitch(&self, pitch: &Pitch) -> RepoResult<Pitch>;
    /// Loads one pitch by id.
    fn get_pitch(&self, id: PitchId) -> RepoResult<Option<Pitch>>;
    /// Lists every pitch on the board.
    fn list_all(&self) -> RepoResult<Vec<Pitch>>;
    /// Lists one container's pitches in display order.
    fn list_container(&self, container: &ContainerId) -> RepoResult<Vec<Pitch>>;
    /// Applies a drop result: container, order key and timestamp together.
    fn apply_order_update(&self, update: &OrderUpdate) -> RepoResult<()>;
    /// Records the voter's size estimate for one pitch.
    fn set_appetite(&self, id: PitchId, appetite: Option<Appetite>) -> RepoResult<()>;
    /// Renumbers one container to evenly spaced keys. Returns the number of
    /// pitches renumbered.
    fn rebalance_container(&self, container: &ContainerId) -> RepoResult<u32>;
}

/// SQLite-backed board repository.
#[derive(Debug)]
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn create_pitch(&self, pitch: &Pitch) -> RepoResult<Pitch> {
        pitch.validate()?;
        self.conn.execute(
            "INSERT INTO pitches (uuid, title, appetite, container, order_key)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                pitch.uuid.to_string(),
                pitch.title,
                pitch.appetite.map(appetite_to_db),
                pitch.container.to_string(),
                pitch.order_key,
            ],
        )?;
        load_required_pitch(self.conn, pitch.uuid)
    }

    fn get_pitch(&self, id: PitchId) -> RepoResult<Option<Pitch>> {
        let sql = format!("{PITCH_SELECT_SQL} WHERE uuid = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pitch_row(row)?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Pitch>> {
        let sql = format!("{PITCH_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_pitch_row(row)?);
        }
        Ok(items)
    }

    fn list_container(&self, container: &ContainerId) -> RepoResult<Vec<Pitch>> {
        let sql = format!("{PITCH_SELECT_SQL} WHERE container = ?1 ORDER BY {DISPLAY_ORDER_SQL};");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([container.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_pitch_row(row)?);
        }
        Ok(items)
    }

    fn apply_order_update(&self, update: &OrderUpdate) -> RepoResult<()> {
        if !update.order_key.is_finite() {
            return Err(RepoError::Validation(
                PitchValidationError::NonFiniteOrderKey,
            ));
        }
        let changed = self.conn.execute(
            "UPDATE pitches
             SET container = ?2,
                 order_key = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                update.pitch_uuid.to_string(),
                update.container.to_string(),
                update.order_key,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(update.pitch_uuid));
        }
        Ok(())
    }

    fn set_appetite(&self, id: PitchId, appetite: Option<Appetite>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pitches
             SET appetite = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), appetite.map(appetite_to_db)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn rebalance_container(&self, container: &ContainerId) -> RepoResult<u32> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let sql = format!("SELECT uuid FROM pitches WHERE container = ?1 ORDER BY {DISPLAY_ORDER_SQL};");
        let ids = {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query([container.to_string()])?;
            let mut ids: Vec<PitchId> = Vec::new();
            while let Some(row) = rows.next()? {
                let uuid_text: String = row.get(0)?;
                ids.push(parse_uuid(&uuid_text)?);
            }
            ids
        };

        let keys = evenly_spaced_keys(ids.len());
        for (id, key) in ids.iter().zip(keys) {
            tx.execute(
                "UPDATE pitches
                 SET order_key = ?2,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                params![id.to_string(), key],
            )?;
        }

        tx.commit()?;
        Ok(ids.len() as u32)
    }
}

fn load_required_pitch(conn: &Connection, id: PitchId) -> RepoResult<Pitch> {
    let sql = format!("{PITCH_SELECT_SQL} WHERE uuid = ?1;");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => parse_pitch_row(row),
        None => Err(RepoError::NotFound(id)),
    }
}

fn parse_pitch_row(row: &Row<'_>) -> RepoResult<Pitch> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text)?;

    let appetite_text: Option<String> = row.get("appetite")?;
    let appetite = match appetite_text {
        Some(text) => Some(
            parse_appetite(&text)
                .ok_or_else(|| RepoError::InvalidData(format!("invalid appetite `{text}`")))?,
        ),
        None => None,
    };

    let container_text: String = row.get("container")?;
    let container: ContainerId = container_text
        .parse()
        .map_err(|err| RepoError::InvalidData(format!("invalid container: {err}")))?;

    let order_key: Option<f64> = row.get("order_key")?;
    if matches!(order_key, Some(key) if !key.is_finite()) {
        return Err(RepoError::InvalidData(format!(
            "non-finite order key for pitch {uuid}"
        )));
    }

    Ok(Pitch {
        uuid,
        title: row.get("title")?,
        appetite,
        container,
        order_key,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_uuid(value: &str) -> RepoResult<PitchId> {
    Uuid::parse_str(value).map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}`")))
}

fn parse_appetite(value: &str) -> Option<Appetite> {
    match value {
        "small" => Some(Appetite::Small),
        "medium" => Some(Appetite::Medium),
        "large" => Some(Appetite::Large),
        _ => None,
    }
}

fn appetite_to_db(appetite: Appetite) -> &'static str {
    match appetite {
        Appetite::Small => "small",
        Appetite::Medium => "medium",
        Appetite::Large => "large",
    }
}
