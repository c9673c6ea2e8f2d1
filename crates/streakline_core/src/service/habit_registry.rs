//! Habit registry use-case service.
//!
//! # Responsibility
//! - Create, update, archive and delete habit definitions.
//! - Enforce owner scoping on every call.
//!
//! # Invariants
//! - A habit is never observable without its streak row.
//! - Deletion leaves no completion or streak rows behind.
//! - Updates store a streak derived under the habit's new cadence.

use crate::clock::DayClock;
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Cadence, Habit, HabitId, HabitPatch, NewHabit};
use crate::repo::habit_repo::{HabitListQuery, HabitRepository};
use crate::streak::engine::compute_streak;
use chrono::{NaiveDate, NaiveTime};

/// Registry facade over a habit repository.
pub struct HabitRegistry<R: HabitRepository, C: DayClock> {
    repo: R,
    clock: C,
}

impl<R: HabitRepository, C: DayClock> HabitRegistry<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Registers a habit with an empty streak.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    pub fn create_habit(
        &self,
        owner_id: &str,
        name: &str,
        cadence: Cadence,
        reminder: Option<NaiveTime>,
    ) -> HabitResult<Habit> {
        self.create_habit_with(
            owner_id,
            NewHabit {
                name: name.to_string(),
                cadence,
                reminder,
                goal: None,
            },
        )
    }

    /// Registers a habit from a full creation request.
    pub fn create_habit_with(&self, owner_id: &str, request: NewHabit) -> HabitResult<Habit> {
        let mut habit = Habit::new(owner_id, request.name, request.cadence, self.clock.today());
        habit.reminder = request.reminder;
        habit.goal = request.goal;
        habit.validate()?;

        self.repo.create_habit(&habit)?;
        self.require(habit.id, owner_id)
    }

    /// Applies a partial update and returns the stored habit.
    pub fn update_habit(
        &self,
        id: HabitId,
        owner_id: &str,
        patch: &HabitPatch,
    ) -> HabitResult<Habit> {
        let mut habit = self.require(id, owner_id)?;
        if patch.is_empty() {
            return Ok(habit);
        }

        habit.apply_patch(patch);
        habit.validate()?;
        self.store_update(&habit)?;
        self.require(id, owner_id)
    }

    /// Deletes a habit together with its completions and streak.
    pub fn delete_habit(&self, id: HabitId, owner_id: &str) -> HabitResult<()> {
        self.repo.delete_habit(id, owner_id)?;
        Ok(())
    }

    pub fn get_habit(&self, id: HabitId, owner_id: &str) -> HabitResult<Habit> {
        self.require(id, owner_id)
    }

    /// Lists the owner's non-archived habits in creation order.
    pub fn list_habits(&self, owner_id: &str) -> HabitResult<Vec<Habit>> {
        self.list_habits_with(owner_id, false)
    }

    pub fn list_habits_with(
        &self,
        owner_id: &str,
        include_archived: bool,
    ) -> HabitResult<Vec<Habit>> {
        let query = HabitListQuery {
            owner_id: owner_id.to_string(),
            include_archived,
        };
        Ok(self.repo.list_habits(&query)?)
    }

    /// Hides a habit from the daily aggregate while keeping its history.
    pub fn archive_habit(&self, id: HabitId, owner_id: &str) -> HabitResult<Habit> {
        self.set_archived(id, owner_id, true)
    }

    pub fn restore_habit(&self, id: HabitId, owner_id: &str) -> HabitResult<Habit> {
        self.set_archived(id, owner_id, false)
    }

    fn set_archived(&self, id: HabitId, owner_id: &str, archived: bool) -> HabitResult<Habit> {
        let mut habit = self.require(id, owner_id)?;
        if habit.archived == archived {
            return Ok(habit);
        }
        habit.archived = archived;
        self.store_update(&habit)?;
        Ok(habit)
    }

    fn store_update(&self, habit: &Habit) -> HabitResult<()> {
        let today = self.clock.today();
        let recompute =
            |habit: &Habit, history: &[NaiveDate]| compute_streak(history, habit.cadence, today);
        self.repo.update_habit(habit, &recompute)?;
        Ok(())
    }

    fn require(&self, id: HabitId, owner_id: &str) -> HabitResult<Habit> {
        self.repo
            .get_habit(id, owner_id)?
            .ok_or(HabitError::NotFound(id))
    }
}
