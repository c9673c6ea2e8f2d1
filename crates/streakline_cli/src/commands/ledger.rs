//! Completion, streak and goal-progress subcommands.

use super::{parse_habit_id, print_json, CliResult, Session};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use streakline_core::{parse_day, HabitId, StreakState};

#[derive(Args, Debug)]
pub struct HabitArg {
    /// Habit id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Habit id
    pub id: String,
    /// Day to toggle (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Habit id
    pub id: String,
    /// Maximum number of entries (0 uses the configured window)
    #[arg(long)]
    pub limit: Option<u32>,
    /// Emit one entry per day ending today, including missed days
    #[arg(long)]
    pub calendar: bool,
}

#[derive(Debug, Serialize)]
struct ToggleView {
    habit_id: HabitId,
    day: NaiveDate,
    completed: bool,
    streak: StreakState,
}

pub fn toggle(session: &Session, args: ToggleArgs) -> CliResult<()> {
    let id = parse_habit_id(&args.id)?;
    let day = args.day.as_deref().map(parse_day).transpose()?;
    let outcome = session.ledger()?.toggle(id, session.owner(), day)?;
    print_json(&ToggleView {
        habit_id: id,
        day: outcome.day,
        completed: outcome.completed,
        streak: outcome.streak,
    })
}

pub fn completions(session: &Session, args: CompletionsArgs) -> CliResult<()> {
    let id = parse_habit_id(&args.id)?;
    let ledger = session.ledger()?;
    let entries = if args.calendar {
        let days = args.limit.unwrap_or_else(|| ledger.window());
        let today = session.today();
        ledger.completion_window(id, session.owner(), today, days)?
    } else {
        ledger.list_completions(id, session.owner(), args.limit)?
    };
    print_json(&entries)
}

pub fn streak(session: &Session, args: HabitArg) -> CliResult<()> {
    let id = parse_habit_id(&args.id)?;
    let state = session.streaks()?.get_streak(id, session.owner())?;
    print_json(&state)
}

pub fn progress(session: &Session, args: HabitArg) -> CliResult<()> {
    let id = parse_habit_id(&args.id)?;
    let progress = session.ledger()?.goal_progress(id, session.owner())?;
    print_json(&serde_json::json!({
        "habit_id": id,
        "completed": progress.completed,
        "goal": progress.goal,
        "reached": progress.reached,
        "percent": progress.percent(),
    }))
}
