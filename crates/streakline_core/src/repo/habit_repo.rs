//! Habit registry persistence.
//!
//! # Responsibility
//! - Persist habit definitions scoped by owner.
//! - Keep habit lifecycle writes atomic with their dependent rows.
//!
//! # Invariants
//! - `create_habit` writes the habit and its empty streak row together.
//! - `delete_habit` removes completions, streak and habit together.
//! - `update_habit` rewrites the streak row for the new cadence in the same
//!   transaction.
//! - Write paths call `Habit::validate()` before SQL mutations.

use crate::model::day::{format_day, format_reminder, parse_reminder};
use crate::model::habit::{Cadence, Habit, HabitId};
use crate::repo::completion_repo::load_history;
use crate::repo::streak_repo::write_streak;
use crate::repo::{
    bool_to_int, parse_stored_day, parse_uuid, to_u32, Recompute, RepoError, RepoResult,
    SqliteHabitStore,
};
use crate::streak::engine::StreakState;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_id,
    name,
    cadence,
    reminder_time,
    goal,
    is_archived,
    created_on
FROM habits";

/// Query options for listing an owner's habits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitListQuery {
    pub owner_id: String,
    /// Archived habits are hidden unless requested.
    pub include_archived: bool,
}

impl HabitListQuery {
    pub fn active(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            include_archived: false,
        }
    }

    pub fn all(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            include_archived: true,
        }
    }
}

/// Repository interface for habit definitions.
pub trait HabitRepository {
    /// Inserts a habit and initializes its empty streak state.
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    /// Replaces mutable fields of a habit owned by `habit.owner_id` and
    /// stores the streak recomputed for the updated definition.
    fn update_habit(&self, habit: &Habit, recompute: Recompute<'_>) -> RepoResult<StreakState>;
    /// Gets one habit when it exists and belongs to `owner_id`.
    fn get_habit(&self, id: HabitId, owner_id: &str) -> RepoResult<Option<Habit>>;
    /// Lists an owner's habits in creation order.
    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>>;
    /// Deletes a habit with all of its completions and its streak state.
    fn delete_habit(&self, id: HabitId, owner_id: &str) -> RepoResult<()>;
}

impl HabitRepository for SqliteHabitStore<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;

        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO habits (
                uuid,
                owner_id,
                name,
                cadence,
                reminder_time,
                goal,
                is_archived,
                created_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                habit.id.to_string(),
                habit.owner_id.as_str(),
                habit.name.as_str(),
                habit.cadence.as_str(),
                habit.reminder.map(format_reminder),
                habit.goal,
                bool_to_int(habit.archived),
                format_day(habit.created_on),
            ],
        )?;
        tx.execute(
            "INSERT INTO streaks (habit_uuid, current, longest, last_completed_day)
             VALUES (?1, 0, 0, NULL);",
            [habit.id.to_string()],
        )?;
        tx.commit()?;

        info!(
            "event=habit_create module=repo status=ok habit_id={} cadence={}",
            habit.id, habit.cadence
        );
        Ok(habit.id)
    }

    fn update_habit(&self, habit: &Habit, recompute: Recompute<'_>) -> RepoResult<StreakState> {
        habit.validate()?;

        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE habits
             SET
                name = ?3,
                cadence = ?4,
                reminder_time = ?5,
                goal = ?6,
                is_archived = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND owner_id = ?2;",
            params![
                habit.id.to_string(),
                habit.owner_id.as_str(),
                habit.name.as_str(),
                habit.cadence.as_str(),
                habit.reminder.map(format_reminder),
                habit.goal,
                bool_to_int(habit.archived),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }

        let history = load_history(&tx, habit.id)?;
        let streak = recompute(habit, &history);
        write_streak(&tx, habit.id, &streak)?;
        tx.commit()?;

        info!(
            "event=habit_update module=repo status=ok habit_id={} cadence={} current={} longest={}",
            habit.id, habit.cadence, streak.current, streak.longest
        );
        Ok(streak)
    }

    fn get_habit(&self, id: HabitId, owner_id: &str) -> RepoResult<Option<Habit>> {
        load_owned_habit(self.conn(), id, owner_id)
    }

    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn().prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE owner_id = ?1
               AND (?2 = 1 OR is_archived = 0)
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query(params![
            query.owner_id.as_str(),
            bool_to_int(query.include_archived)
        ])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn delete_habit(&self, id: HabitId, owner_id: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        if load_owned_habit(&tx, id, owner_id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }

        let habit_uuid = id.to_string();
        let removed_completions =
            tx.execute("DELETE FROM completions WHERE habit_uuid = ?1;", [&habit_uuid])?;
        tx.execute("DELETE FROM streaks WHERE habit_uuid = ?1;", [&habit_uuid])?;
        tx.execute(
            "DELETE FROM habits WHERE uuid = ?1 AND owner_id = ?2;",
            params![habit_uuid, owner_id],
        )?;
        tx.commit()?;

        info!(
            "event=habit_delete module=repo status=ok habit_id={} removed_completions={}",
            id, removed_completions
        );
        Ok(())
    }
}

/// Loads a habit scoped by owner; usable inside an open transaction.
pub(crate) fn load_owned_habit(
    conn: &Connection,
    id: HabitId,
    owner_id: &str,
) -> RepoResult<Option<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "{HABIT_SELECT_SQL}
         WHERE uuid = ?1
           AND owner_id = ?2;"
    ))?;

    let mut rows = stmt.query(params![id.to_string(), owner_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_habit_row(row)?));
    }
    Ok(None)
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "habits.uuid")?;

    let cadence_text: String = row.get("cadence")?;
    let cadence = cadence_text.parse::<Cadence>().map_err(|_| {
        RepoError::InvalidData(format!("invalid cadence `{cadence_text}` in habits.cadence"))
    })?;

    let reminder = match row.get::<_, Option<String>>("reminder_time")? {
        Some(value) => Some(parse_reminder(&value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid reminder `{value}` in habits.reminder_time"
            ))
        })?),
        None => None,
    };

    let goal = match row.get::<_, Option<i64>>("goal")? {
        Some(value) => Some(to_u32(value, "habits.goal")?),
        None => None,
    };

    let archived = match row.get::<_, i64>("is_archived")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_archived value `{other}` in habits.is_archived"
            )));
        }
    };

    let created_on_text: String = row.get("created_on")?;
    let habit = Habit {
        id,
        owner_id: row.get("owner_id")?,
        name: row.get("name")?,
        cadence,
        reminder,
        goal,
        archived,
        created_on: parse_stored_day(&created_on_text, "habits.created_on")?,
    };
    habit.validate()?;
    Ok(habit)
}
