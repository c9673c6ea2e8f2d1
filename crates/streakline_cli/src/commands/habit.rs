//! `habit` subcommands.

use super::{parse_habit_id, print_json, CliResult, Session};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use streakline_core::{
    format_reminder, parse_reminder, Cadence, Habit, HabitId, HabitPatch, NewHabit,
};

#[derive(Subcommand, Debug)]
pub enum HabitAction {
    /// Register a new habit
    Add(AddArgs),
    /// List habits of the owner
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Change fields of a habit
    Update(UpdateArgs),
    /// Delete a habit with its completions and streak
    Delete { id: String },
    /// Hide a habit from daily aggregates, keeping its history
    Archive { id: String },
    /// Bring an archived habit back
    Restore { id: String },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Habit name
    pub name: String,
    /// daily or weekly
    #[arg(long, default_value = "daily")]
    pub cadence: Cadence,
    /// Reminder time (HH:MM)
    #[arg(long)]
    pub reminder: Option<String>,
    /// Target number of completions
    #[arg(long)]
    pub goal: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub cadence: Option<Cadence>,
    #[arg(long, conflicts_with = "clear_reminder")]
    pub reminder: Option<String>,
    #[arg(long)]
    pub clear_reminder: bool,
    #[arg(long, conflicts_with = "clear_goal")]
    pub goal: Option<u32>,
    #[arg(long)]
    pub clear_goal: bool,
}

/// JSON shape of a habit.
#[derive(Debug, Serialize)]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub cadence: Cadence,
    pub reminder: Option<String>,
    pub goal: Option<u32>,
    pub archived: bool,
    pub created_on: NaiveDate,
}

impl From<Habit> for HabitView {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id,
            name: habit.name,
            cadence: habit.cadence,
            reminder: habit.reminder.map(format_reminder),
            goal: habit.goal,
            archived: habit.archived,
            created_on: habit.created_on,
        }
    }
}

pub fn run(session: &Session, action: HabitAction) -> CliResult<()> {
    let registry = session.registry()?;
    let owner = session.owner();

    match action {
        HabitAction::Add(args) => {
            let request = NewHabit {
                name: args.name,
                cadence: args.cadence,
                reminder: args.reminder.as_deref().map(parse_reminder).transpose()?,
                goal: args.goal,
            };
            let habit = registry.create_habit_with(owner, request)?;
            print_json(&HabitView::from(habit))
        }
        HabitAction::List { all } => {
            let habits: Vec<HabitView> = registry
                .list_habits_with(owner, all)?
                .into_iter()
                .map(HabitView::from)
                .collect();
            print_json(&habits)
        }
        HabitAction::Update(args) => {
            let id = parse_habit_id(&args.id)?;
            let patch = build_patch(&args)?;
            let habit = registry.update_habit(id, owner, &patch)?;
            print_json(&HabitView::from(habit))
        }
        HabitAction::Delete { id } => {
            let id = parse_habit_id(&id)?;
            registry.delete_habit(id, owner)?;
            print_json(&serde_json::json!({ "id": id, "deleted": true }))
        }
        HabitAction::Archive { id } => {
            let habit = registry.archive_habit(parse_habit_id(&id)?, owner)?;
            print_json(&HabitView::from(habit))
        }
        HabitAction::Restore { id } => {
            let habit = registry.restore_habit(parse_habit_id(&id)?, owner)?;
            print_json(&HabitView::from(habit))
        }
    }
}

fn build_patch(args: &UpdateArgs) -> CliResult<HabitPatch> {
    let reminder = if args.clear_reminder {
        Some(None)
    } else {
        args.reminder
            .as_deref()
            .map(parse_reminder)
            .transpose()?
            .map(Some)
    };
    let goal = if args.clear_goal {
        Some(None)
    } else {
        args.goal.map(Some)
    };

    Ok(HabitPatch {
        name: args.name.clone(),
        cadence: args.cadence,
        reminder,
        goal,
    })
}
