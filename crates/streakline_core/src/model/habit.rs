//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit definition record owned by the registry.
//! - Validate user-supplied habit fields before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `name` is non-empty after trimming.
//! - `goal`, when set, is strictly positive.
//! - Completion data never lives on this struct; it belongs to the ledger.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

/// Opaque, already-authenticated user identity supplied by the caller.
pub type OwnerId = String;

/// Validation errors for habit fields and calendar input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    #[error("habit name cannot be empty")]
    EmptyName,
    #[error("habit goal must be greater than zero")]
    ZeroGoal,
    #[error("invalid calendar day `{0}`; expected YYYY-MM-DD")]
    InvalidDay(String),
    #[error("invalid reminder time `{0}`; expected HH:MM")]
    InvalidReminder(String),
    #[error("unknown cadence `{0}`; expected daily|weekly")]
    UnknownCadence(String),
    #[error("invalid day range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("day range spans {days} days; at most {max} allowed")]
    RangeTooLong { days: i64, max: i64 },
}

/// How often a habit is expected to be performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Streaks count consecutive calendar days.
    #[default]
    Daily,
    /// Streaks count consecutive ISO weeks with at least one completion.
    Weekly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl Display for Cadence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = HabitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(HabitValidationError::UnknownCadence(other.to_string())),
        }
    }
}

/// Canonical habit definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    /// Owning user. Every registry/ledger lookup is scoped by this value.
    pub owner_id: OwnerId,
    pub name: String,
    pub cadence: Cadence,
    /// Optional time-of-day reminder. Delivery is out of scope for core.
    pub reminder: Option<NaiveTime>,
    /// Optional completion target for goal-count progress.
    pub goal: Option<u32>,
    /// Archived habits keep their history but are not active.
    pub archived: bool,
    /// Calendar day the habit was registered on.
    pub created_on: NaiveDate,
}

impl Habit {
    /// Creates a habit with a generated stable ID.
    pub fn new(
        owner_id: impl Into<OwnerId>,
        name: impl Into<String>,
        cadence: Cadence,
        created_on: NaiveDate,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), owner_id, name, cadence, created_on)
    }

    /// Creates a habit with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: HabitId,
        owner_id: impl Into<OwnerId>,
        name: impl Into<String>,
        cadence: Cadence,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.into(),
            name: name.into().trim().to_string(),
            cadence,
            reminder: None,
            goal: None,
            archived: false,
            created_on,
        }
    }

    /// Validates user-editable fields.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.goal == Some(0) {
            return Err(HabitValidationError::ZeroGoal);
        }
        Ok(())
    }

    /// Returns whether this habit counts toward the daily aggregate of `day`.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        !self.archived && self.created_on <= day
    }

    /// Applies a partial update. Validation is left to the caller.
    pub fn apply_patch(&mut self, patch: &HabitPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(cadence) = patch.cadence {
            self.cadence = cadence;
        }
        if let Some(reminder) = patch.reminder {
            self.reminder = reminder;
        }
        if let Some(goal) = patch.goal {
            self.goal = goal;
        }
    }
}

/// Creation request for a habit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub cadence: Cadence,
    pub reminder: Option<NaiveTime>,
    pub goal: Option<u32>,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for mutable habit fields.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears an optional
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub cadence: Option<Cadence>,
    pub reminder: Option<Option<NaiveTime>>,
    pub goal: Option<Option<u32>>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cadence.is_none()
            && self.reminder.is_none()
            && self.goal.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cadence, Habit, HabitPatch, HabitValidationError};
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn new_habit_trims_name_and_starts_active() {
        let habit = Habit::new("u1", "  Drink water ", Cadence::Daily, day("2024-01-01"));
        assert_eq!(habit.name, "Drink water");
        assert!(!habit.archived);
        assert!(habit.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_zero_goal() {
        let mut habit = Habit::new("u1", "   ", Cadence::Daily, day("2024-01-01"));
        assert_eq!(habit.validate(), Err(HabitValidationError::EmptyName));

        habit.name = "Read".to_string();
        habit.goal = Some(0);
        assert_eq!(habit.validate(), Err(HabitValidationError::ZeroGoal));
    }

    #[test]
    fn active_window_respects_creation_day_and_archive() {
        let mut habit = Habit::new("u1", "Stretch", Cadence::Daily, day("2024-03-10"));
        assert!(!habit.is_active_on(day("2024-03-09")));
        assert!(habit.is_active_on(day("2024-03-10")));

        habit.archived = true;
        assert!(!habit.is_active_on(day("2024-03-11")));
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut habit = Habit::new("u1", "Walk", Cadence::Daily, day("2024-01-01"));
        habit.goal = Some(10);
        habit.apply_patch(&HabitPatch {
            cadence: Some(Cadence::Weekly),
            goal: Some(None),
            ..HabitPatch::default()
        });
        assert_eq!(habit.cadence, Cadence::Weekly);
        assert_eq!(habit.goal, None);
        assert_eq!(habit.name, "Walk");
    }

    #[test]
    fn cadence_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<Cadence>(), Ok(Cadence::Weekly));
        assert!(matches!(
            "monthly".parse::<Cadence>(),
            Err(HabitValidationError::UnknownCadence(_))
        ));
    }
}
