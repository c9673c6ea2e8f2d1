//! `streakline` command-line front end.
//!
//! # Responsibility
//! - Parse global options and dispatch to core services.
//! - Print results as JSON on stdout; report failures on stderr with a
//!   non-zero exit status.

use clap::{Parser, Subcommand};
use std::error::Error;
use streakline_core::{HabitError, HabitValidationError};

mod commands;

use commands::GlobalArgs;

#[derive(Parser, Debug)]
#[command(name = "streakline", version, about = "Habit streak tracker")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Habit definitions
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Toggle completion of a habit for one day
    Toggle(commands::ledger::ToggleArgs),
    /// List recorded completions of a habit
    Completions(commands::ledger::CompletionsArgs),
    /// Show the current and longest streak of a habit
    Streak(commands::ledger::HabitArg),
    /// Show goal-count progress of a habit
    Progress(commands::ledger::HabitArg),
    /// Aggregate status of one day across all active habits
    Day(commands::calendar::DayArgs),
    /// Aggregate status of the Sunday..Saturday week around a day
    Week(commands::calendar::WeekArgs),
    /// Print core and CLI versions
    Version,
}

fn run(cli: Cli) -> commands::CliResult<()> {
    if let Commands::Version = cli.command {
        return commands::print_json(&serde_json::json!({
            "cli": env!("CARGO_PKG_VERSION"),
            "core": streakline_core::core_version(),
        }));
    }

    let session = commands::Session::open(&cli.global)?;
    match cli.command {
        Commands::Habit { action } => commands::habit::run(&session, action),
        Commands::Toggle(args) => commands::ledger::toggle(&session, args),
        Commands::Completions(args) => commands::ledger::completions(&session, args),
        Commands::Streak(args) => commands::ledger::streak(&session, args),
        Commands::Progress(args) => commands::ledger::progress(&session, args),
        Commands::Day(args) => commands::calendar::day(&session, args),
        Commands::Week(args) => commands::calendar::week(&session, args),
        Commands::Version => Ok(()),
    }
}

/// Stable code for errors raised by core services or by day and reminder
/// parsing done directly in the CLI.
fn error_code(err: &(dyn Error + 'static)) -> Option<&'static str> {
    if let Some(habit_err) = err.downcast_ref::<HabitError>() {
        return Some(habit_err.code());
    }
    err.downcast_ref::<HabitValidationError>()
        .map(|invalid| HabitError::from(invalid.clone()).code())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        match error_code(e.as_ref()) {
            Some(code) => eprintln!("error[{code}]: {e}"),
            None => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
