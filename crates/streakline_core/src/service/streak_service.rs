//! Streak read/recompute service.
//!
//! # Responsibility
//! - Serve streak state derived from full ledger history for "today".
//! - Keep the cached streak row in step with that derivation.
//!
//! # Invariants
//! - `get_streak` and `recompute` return exactly what `compute_streak`
//!   yields over the ledger; the cache never wins over the ledger.

use crate::clock::DayClock;
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Habit, HabitId};
use crate::repo::streak_repo::StreakRepository;
use crate::streak::engine::{compute_streak, StreakState};
use chrono::NaiveDate;

pub struct StreakService<R: StreakRepository, C: DayClock> {
    repo: R,
    clock: C,
}

impl<R: StreakRepository, C: DayClock> StreakService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Recomputes the streak from full history and stores it.
    pub fn recompute(&self, habit_id: HabitId, owner_id: &str) -> HabitResult<StreakState> {
        let today = self.clock.today();
        let recompute =
            |habit: &Habit, history: &[NaiveDate]| compute_streak(history, habit.cadence, today);
        Ok(self.repo.refresh_streak(habit_id, owner_id, &recompute)?)
    }

    /// Returns the current streak state.
    ///
    /// Reading on a later day than the last toggle may lower `current`; the
    /// refreshed value is written back to the cache.
    pub fn get_streak(&self, habit_id: HabitId, owner_id: &str) -> HabitResult<StreakState> {
        self.recompute(habit_id, owner_id)
    }

    /// Returns the stored streak row without recomputing it.
    pub fn cached_streak(&self, habit_id: HabitId, owner_id: &str) -> HabitResult<StreakState> {
        self.repo
            .cached_streak(habit_id, owner_id)?
            .ok_or(HabitError::NotFound(habit_id))
    }
}
