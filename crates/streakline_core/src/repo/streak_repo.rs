//! Cached streak state persistence.
//!
//! # Invariants
//! - One row per habit, created with the habit and removed with it.
//! - Stored values are a memoization of the ledger; `refresh_streak`
//!   overwrites them from full history whenever they drift.

use crate::model::day::format_day;
use crate::model::habit::HabitId;
use crate::repo::completion_repo::load_history;
use crate::repo::habit_repo::load_owned_habit;
use crate::repo::{parse_stored_day, to_u32, Recompute, RepoError, RepoResult, SqliteHabitStore};
use crate::streak::engine::StreakState;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for cached streak rows.
pub trait StreakRepository {
    /// Returns the stored streak row of a habit owned by `owner_id`.
    fn cached_streak(&self, habit_id: HabitId, owner_id: &str) -> RepoResult<Option<StreakState>>;
    /// Recomputes from full history and stores the result when it differs.
    fn refresh_streak(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        recompute: Recompute<'_>,
    ) -> RepoResult<StreakState>;
}

impl StreakRepository for SqliteHabitStore<'_> {
    fn cached_streak(
        &self,
        habit_id: HabitId,
        owner_id: &str,
    ) -> RepoResult<Option<StreakState>> {
        if load_owned_habit(self.conn(), habit_id, owner_id)?.is_none() {
            return Ok(None);
        }
        load_streak(self.conn(), habit_id)
    }

    fn refresh_streak(
        &self,
        habit_id: HabitId,
        owner_id: &str,
        recompute: Recompute<'_>,
    ) -> RepoResult<StreakState> {
        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        let habit = load_owned_habit(&tx, habit_id, owner_id)?
            .ok_or(RepoError::NotFound(habit_id))?;

        let history = load_history(&tx, habit_id)?;
        let fresh = recompute(&habit, &history);
        let cached = load_streak(&tx, habit_id)?;
        if cached != Some(fresh) {
            write_streak(&tx, habit_id, &fresh)?;
            info!(
                "event=streak_refresh module=repo status=ok habit_id={} current={} longest={} drifted={}",
                habit_id,
                fresh.current,
                fresh.longest,
                cached.is_some()
            );
        }
        tx.commit()?;
        Ok(fresh)
    }
}

/// Upserts the cached streak row; usable inside an open transaction.
pub(crate) fn write_streak(
    conn: &Connection,
    habit_id: HabitId,
    state: &StreakState,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO streaks (habit_uuid, current, longest, last_completed_day)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (habit_uuid) DO UPDATE SET
            current = excluded.current,
            longest = excluded.longest,
            last_completed_day = excluded.last_completed_day;",
        params![
            habit_id.to_string(),
            state.current,
            state.longest,
            state.last_completed_day.map(format_day),
        ],
    )?;
    Ok(())
}

fn load_streak(conn: &Connection, habit_id: HabitId) -> RepoResult<Option<StreakState>> {
    let row = conn
        .query_row(
            "SELECT current, longest, last_completed_day
             FROM streaks
             WHERE habit_uuid = ?1;",
            [habit_id.to_string()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((current, longest, last_completed)) = row else {
        return Ok(None);
    };
    let last_completed_day = match last_completed {
        Some(value) => Some(parse_stored_day(&value, "streaks.last_completed_day")?),
        None => None,
    };
    Ok(Some(StreakState {
        current: to_u32(current, "streaks.current")?,
        longest: to_u32(longest, "streaks.longest")?,
        last_completed_day,
    }))
}
