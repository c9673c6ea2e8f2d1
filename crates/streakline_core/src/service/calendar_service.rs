//! Daily aggregate ("calendar ring") service.
//!
//! # Responsibility
//! - Report whether all of an owner's active habits were completed on a
//!   day, for single days, week rows and bounded ranges.
//!
//! # Invariants
//! - Ranges are inclusive and limited to `MAX_RANGE_DAYS`.
//! - Only the caller's habits are considered.

use crate::clock::DayClock;
use crate::error::HabitResult;
use crate::model::day::week_start_sunday;
use crate::model::habit::{Habit, HabitValidationError};
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::habit_repo::{HabitListQuery, HabitRepository};
use crate::streak::aggregate::{aggregate_day, CompletionSet, DayAggregate, DayStatus};
use chrono::{Days, NaiveDate};

pub const MAX_RANGE_DAYS: i64 = 366;

pub struct CalendarService<R, C>
where
    R: HabitRepository + CompletionRepository,
    C: DayClock,
{
    repo: R,
    clock: C,
}

impl<R, C> CalendarService<R, C>
where
    R: HabitRepository + CompletionRepository,
    C: DayClock,
{
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Aggregate status of `day` (today when `None`).
    pub fn day_status(
        &self,
        owner_id: &str,
        day: Option<NaiveDate>,
    ) -> HabitResult<Option<DayStatus>> {
        let day = day.unwrap_or_else(|| self.clock.today());
        Ok(self.day_aggregate(owner_id, day)?.status)
    }

    pub fn day_aggregate(&self, owner_id: &str, day: NaiveDate) -> HabitResult<DayAggregate> {
        let (habits, completions) = self.load_window(owner_id, day, day)?;
        Ok(aggregate_day(day, &habits, &completions))
    }

    /// Sunday..Saturday row containing `anchor` (today when `None`).
    pub fn week_rings(
        &self,
        owner_id: &str,
        anchor: Option<NaiveDate>,
    ) -> HabitResult<Vec<DayAggregate>> {
        let anchor = anchor.unwrap_or_else(|| self.clock.today());
        let sunday = week_start_sunday(anchor);
        let saturday = sunday
            .checked_add_days(Days::new(6))
            .ok_or(HabitValidationError::InvalidDay(anchor.to_string()))?;
        self.range_status(owner_id, sunday, saturday)
    }

    /// Aggregates every day of `from..=to`, oldest first.
    pub fn range_status(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HabitResult<Vec<DayAggregate>> {
        if from > to {
            return Err(HabitValidationError::InvalidRange { from, to }.into());
        }
        let days = (to - from).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(HabitValidationError::RangeTooLong {
                days,
                max: MAX_RANGE_DAYS,
            }
            .into());
        }

        let (habits, completions) = self.load_window(owner_id, from, to)?;
        Ok(from
            .iter_days()
            .take_while(|day| *day <= to)
            .map(|day| aggregate_day(day, &habits, &completions))
            .collect())
    }

    fn load_window(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HabitResult<(Vec<Habit>, CompletionSet)> {
        let habits = self.repo.list_habits(&HabitListQuery::active(owner_id))?;
        let completions = self
            .repo
            .owner_completions_between(owner_id, from, to)?
            .into_iter()
            .collect();
        Ok((habits, completions))
    }
}
