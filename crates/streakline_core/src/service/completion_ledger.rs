//! Completion ledger use-case service.
//!
//! # Responsibility
//! - Toggle per-day completion records for owned habits.
//! - Serve bounded, most-recent-first completion listings for calendars.
//! - Project goal-count progress from the ledger.
//!
//! # Invariants
//! - `toggle` is its own inverse: two toggles of the same day leave ledger
//!   and streak unchanged.
//! - The listing window bounds display only; streaks always see full
//!   history.
//! - Future days are accepted; temporal policy belongs to callers.

use crate::clock::DayClock;
use crate::error::{HabitError, HabitResult};
use crate::model::day::parse_day;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use crate::repo::completion_repo::{CompletionRepository, ToggleOutcome};
use crate::repo::habit_repo::HabitRepository;
use crate::streak::engine::compute_streak;
use crate::streak::progress::GoalProgress;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_COMPLETION_WINDOW: u32 = 31;
pub const MAX_COMPLETION_WINDOW: u32 = 366;

/// One calendar entry of a completion listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub day: NaiveDate,
    pub completed: bool,
}

/// Ledger facade over habit and completion repositories.
pub struct CompletionLedger<R, C>
where
    R: HabitRepository + CompletionRepository,
    C: DayClock,
{
    repo: R,
    clock: C,
    window: u32,
}

impl<R, C> CompletionLedger<R, C>
where
    R: HabitRepository + CompletionRepository,
    C: DayClock,
{
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            window: DEFAULT_COMPLETION_WINDOW,
        }
    }

    /// Overrides the default listing window (clamped to 1..=366).
    pub fn with_window(mut self, window: u32) -> Self {
        self.window = window.clamp(1, MAX_COMPLETION_WINDOW);
        self
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// Flips the completion of `day` (today when `None`).
    ///
    /// The habit's streak is recomputed in the same transaction as the
    /// ledger write.
    pub fn toggle(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        day: Option<NaiveDate>,
    ) -> HabitResult<ToggleOutcome> {
        let today = self.clock.today();
        let day = day.unwrap_or(today);
        let recompute =
            |habit: &Habit, history: &[NaiveDate]| compute_streak(history, habit.cadence, today);
        Ok(self
            .repo
            .toggle_completion(habit_id, owner_id, day, &recompute)?)
    }

    /// Same as `toggle`, accepting the day as ISO text.
    pub fn toggle_str(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        day: Option<&str>,
    ) -> HabitResult<ToggleOutcome> {
        let day = day.map(parse_day).transpose()?;
        self.toggle(habit_id, owner_id, day)
    }

    /// Lists recorded completion days, most recent first.
    ///
    /// `limit` defaults to the configured window and clamps to 366.
    pub fn list_completions(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        limit: Option<u32>,
    ) -> HabitResult<Vec<CompletionEntry>> {
        self.require(habit_id, owner_id)?;
        let limit = normalize_completion_limit(limit, self.window);
        let days = self.repo.recent_completion_days(habit_id, limit)?;
        Ok(days
            .into_iter()
            .map(|day| CompletionEntry {
                day,
                completed: true,
            })
            .collect())
    }

    /// Materializes `days` consecutive entries ending at `end_day`, most
    /// recent first, reporting absent days as not completed.
    pub fn completion_window(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        end_day: NaiveDate,
        days: u32,
    ) -> HabitResult<Vec<CompletionEntry>> {
        self.require(habit_id, owner_id)?;
        let span = normalize_completion_limit(Some(days), self.window);
        let start_day = end_day
            .checked_sub_days(Days::new(u64::from(span - 1)))
            .ok_or(HabitValidationError::InvalidDay(end_day.to_string()))?;

        let recorded: HashSet<NaiveDate> = self
            .repo
            .completion_days_between(habit_id, start_day, end_day)?
            .into_iter()
            .collect();
        Ok((0..span)
            .filter_map(|offset| end_day.checked_sub_days(Days::new(u64::from(offset))))
            .map(|day| CompletionEntry {
                day,
                completed: recorded.contains(&day),
            })
            .collect())
    }

    /// Returns whether a record exists for (habit, day).
    pub fn is_completed(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        day: NaiveDate,
    ) -> HabitResult<bool> {
        self.require(habit_id, owner_id)?;
        Ok(self.repo.is_completed(habit_id, day)?)
    }

    /// Goal-count progress over every completion record of the habit.
    pub fn goal_progress(&self, habit_id: HabitId, owner_id: &str) -> HabitResult<GoalProgress> {
        let habit = self.require(habit_id, owner_id)?;
        let completed = self.repo.count_completions(habit_id)?;
        Ok(GoalProgress::new(completed, habit.goal))
    }

    fn require(&self, habit_id: HabitId, owner_id: &str) -> HabitResult<Habit> {
        self.repo
            .get_habit(habit_id, owner_id)?
            .ok_or(HabitError::NotFound(habit_id))
    }
}

/// Normalizes a listing limit: `None`/0 use `default`, values clamp to 366.
pub fn normalize_completion_limit(limit: Option<u32>, default: u32) -> u32 {
    match limit {
        None | Some(0) => default.clamp(1, MAX_COMPLETION_WINDOW),
        Some(value) => value.min(MAX_COMPLETION_WINDOW),
    }
}
