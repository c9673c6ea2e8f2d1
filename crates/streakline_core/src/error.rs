//! Service-level error taxonomy.
//!
//! Callers see four outcomes: bad input, not found (missing and foreign ids
//! look identical), conflicting write, or a storage failure.

use crate::model::habit::{HabitId, HabitValidationError};
use crate::repo::RepoError;
use thiserror::Error;

pub type HabitResult<T> = Result<T, HabitError>;

#[derive(Debug, Error)]
pub enum HabitError {
    /// Malformed caller input. Never retried.
    #[error("validation failed: {0}")]
    Validation(#[from] HabitValidationError),
    /// Unknown id, or an id owned by another user.
    #[error("habit not found: {0}")]
    NotFound(HabitId),
    /// Unique constraint violation reported by storage.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl HabitError {
    /// Stable machine-readable code for logs and outer layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Repo(_) => "storage_error",
        }
    }
}

impl From<RepoError> for HabitError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Repo(other),
        }
    }
}
