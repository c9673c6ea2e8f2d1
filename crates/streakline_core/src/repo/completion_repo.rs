//! Completion ledger persistence.
//!
//! # Responsibility
//! - Own the (habit, day) completion records.
//! - Toggle a record and refresh the habit's cached streak in one
//!   transaction.
//!
//! # Invariants
//! - At most one record per (habit, day); presence means "completed".
//! - Records are inserted or deleted, never updated in place.
//! - Day values are ISO `YYYY-MM-DD`, so SQL ordering on text is
//!   chronological.

use crate::model::day::format_day;
use crate::model::habit::HabitId;
use crate::repo::habit_repo::load_owned_habit;
use crate::repo::streak_repo::write_streak;
use crate::repo::{
    parse_stored_day, parse_uuid, to_u32, Recompute, RepoError, RepoResult, SqliteHabitStore,
};
use crate::streak::engine::StreakState;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Result of one toggle, with the streak state committed alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub day: NaiveDate,
    pub completed: bool,
    pub streak: StreakState,
}

/// Repository interface for completion records.
pub trait CompletionRepository {
    /// Flips the record for (habit, day) and stores the recomputed streak.
    ///
    /// Returns `NotFound` when the habit does not belong to `owner_id`.
    fn toggle_completion(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        day: NaiveDate,
        recompute: Recompute<'_>,
    ) -> RepoResult<ToggleOutcome>;
    /// Returns whether a record exists for (habit, day).
    fn is_completed(&self, habit_id: HabitId, day: NaiveDate) -> RepoResult<bool>;
    /// Most recent completion days first, at most `limit` rows.
    fn recent_completion_days(&self, habit_id: HabitId, limit: u32) -> RepoResult<Vec<NaiveDate>>;
    /// Completion days within `from..=to`, most recent first.
    fn completion_days_between(
        &self,
        habit_id: HabitId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<NaiveDate>>;
    /// Full completion history, oldest first.
    fn completion_history(&self, habit_id: HabitId) -> RepoResult<Vec<NaiveDate>>;
    /// Number of completion records for one habit.
    fn count_completions(&self, habit_id: HabitId) -> RepoResult<u32>;
    /// All (habit, day) records of an owner's habits within `from..=to`.
    fn owner_completions_between(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<(HabitId, NaiveDate)>>;
}

impl CompletionRepository for SqliteHabitStore<'_> {
    fn toggle_completion(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        day: NaiveDate,
        recompute: Recompute<'_>,
    ) -> RepoResult<ToggleOutcome> {
        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        let habit = load_owned_habit(&tx, habit_id, owner_id)?
            .ok_or(RepoError::NotFound(habit_id))?;

        let habit_uuid = habit_id.to_string();
        let day_text = format_day(day);
        let removed = tx.execute(
            "DELETE FROM completions WHERE habit_uuid = ?1 AND day = ?2;",
            params![habit_uuid, day_text],
        )?;
        let completed = removed == 0;
        if completed {
            tx.execute(
                "INSERT INTO completions (habit_uuid, day) VALUES (?1, ?2);",
                params![habit_uuid, day_text],
            )?;
        }

        let history = load_history(&tx, habit_id)?;
        let streak = recompute(&habit, &history);
        write_streak(&tx, habit_id, &streak)?;
        tx.commit()?;

        debug!(
            "event=completion_toggle module=repo status=ok habit_id={} day={} completed={} current={} longest={}",
            habit_id, day_text, completed, streak.current, streak.longest
        );
        Ok(ToggleOutcome {
            day,
            completed,
            streak,
        })
    }

    fn is_completed(&self, habit_id: HabitId, day: NaiveDate) -> RepoResult<bool> {
        let exists: i64 = self.conn().query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM completions
                WHERE habit_uuid = ?1 AND day = ?2
            );",
            params![habit_id.to_string(), format_day(day)],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn recent_completion_days(&self, habit_id: HabitId, limit: u32) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self.conn().prepare(
            "SELECT day
             FROM completions
             WHERE habit_uuid = ?1
             ORDER BY day DESC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![habit_id.to_string(), i64::from(limit)])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            days.push(parse_stored_day(&value, "completions.day")?);
        }
        Ok(days)
    }

    fn completion_days_between(
        &self,
        habit_id: HabitId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self.conn().prepare(
            "SELECT day
             FROM completions
             WHERE habit_uuid = ?1
               AND day >= ?2
               AND day <= ?3
             ORDER BY day DESC;",
        )?;
        let mut rows = stmt.query(params![
            habit_id.to_string(),
            format_day(from),
            format_day(to)
        ])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            days.push(parse_stored_day(&value, "completions.day")?);
        }
        Ok(days)
    }

    fn completion_history(&self, habit_id: HabitId) -> RepoResult<Vec<NaiveDate>> {
        load_history(self.conn(), habit_id)
    }

    fn count_completions(&self, habit_id: HabitId) -> RepoResult<u32> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM completions WHERE habit_uuid = ?1;",
            [habit_id.to_string()],
            |row| row.get(0),
        )?;
        to_u32(count, "COUNT(completions)")
    }

    fn owner_completions_between(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<(HabitId, NaiveDate)>> {
        let mut stmt = self.conn().prepare(
            "SELECT c.habit_uuid, c.day
             FROM completions c
             INNER JOIN habits h ON h.uuid = c.habit_uuid
             WHERE h.owner_id = ?1
               AND c.day >= ?2
               AND c.day <= ?3
             ORDER BY c.day ASC, c.habit_uuid ASC;",
        )?;
        let mut rows = stmt.query(params![owner_id, format_day(from), format_day(to)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let habit_text: String = row.get(0)?;
            let day_text: String = row.get(1)?;
            records.push((
                parse_uuid(&habit_text, "completions.habit_uuid")?,
                parse_stored_day(&day_text, "completions.day")?,
            ));
        }
        Ok(records)
    }
}

/// Loads the full completion history of one habit, oldest first.
pub(crate) fn load_history(conn: &Connection, habit_id: HabitId) -> RepoResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT day
         FROM completions
         WHERE habit_uuid = ?1
         ORDER BY day ASC;",
    )?;
    let mut rows = stmt.query([habit_id.to_string()])?;
    let mut days = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        days.push(parse_stored_day(&value, "completions.day")?);
    }
    Ok(days)
}
