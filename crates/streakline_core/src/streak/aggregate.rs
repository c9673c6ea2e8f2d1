//! Per-day aggregate across all of an owner's active habits.
//!
//! A day is `complete` when every habit active on that day has a completion
//! record, `incomplete` when at least one does not, and has no status when
//! no habit was active.

use crate::model::habit::{Habit, HabitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ring status of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Complete,
    Incomplete,
}

/// Aggregate for one day and one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub day: NaiveDate,
    /// `None` when the owner had no active habit that day.
    pub status: Option<DayStatus>,
    /// Habits active on `day`.
    pub active: u32,
    /// Active habits with a completion record on `day`.
    pub completed: u32,
}

/// Completion keys (habit, day) loaded for an aggregate window.
pub type CompletionSet = HashSet<(HabitId, NaiveDate)>;

/// Aggregates one day from the owner's habits and the loaded completions.
pub fn aggregate_day(
    day: NaiveDate,
    habits: &[Habit],
    completions: &CompletionSet,
) -> DayAggregate {
    let mut active = 0;
    let mut completed = 0;
    for habit in habits.iter().filter(|habit| habit.is_active_on(day)) {
        active += 1;
        if completions.contains(&(habit.id, day)) {
            completed += 1;
        }
    }

    let status = match (active, completed) {
        (0, _) => None,
        (active, completed) if active == completed => Some(DayStatus::Complete),
        _ => Some(DayStatus::Incomplete),
    };

    DayAggregate {
        day,
        status,
        active,
        completed,
    }
}
