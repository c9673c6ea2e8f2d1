//! Repository layer abstractions and SQLite persistence.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for habits, completion
//!   records and cached streaks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every habit-scoped query filters by `owner_id`; a foreign habit is
//!   reported exactly like a missing one.
//! - Multi-row writes (create + streak init, delete + cascade, update or
//!   toggle + streak refresh) run inside one `IMMEDIATE` transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use crate::streak::engine::StreakState;
use chrono::NaiveDate;
use rusqlite::{ffi, Connection};
use thiserror::Error;
use uuid::Uuid;

pub mod completion_repo;
pub mod habit_repo;
pub mod streak_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Streak recompute hook run inside a write transaction.
///
/// Receives the habit and its full completion history (ascending).
pub type Recompute<'a> = &'a dyn Fn(&Habit, &[NaiveDate]) -> StreakState;

/// Repository error for habit, completion and streak persistence.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] HabitValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("habit not found: {0}")]
    NotFound(HabitId),
    #[error("conflicting write: {0}")]
    Conflict(String),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
            ) {
                return Self::Conflict(message.clone().unwrap_or_else(|| failure.to_string()));
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed store implementing every habit repository contract.
///
/// Holds a shared connection borrow, so one store can back several services.
#[derive(Debug, Clone, Copy)]
pub struct SqliteHabitStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_stored_day(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    crate::model::day::parse_day(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid day `{value}` in {column}")))
}

pub(crate) fn to_u32(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
