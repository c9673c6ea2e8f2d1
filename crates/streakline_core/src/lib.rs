//! Core domain logic for Streakline.
//! This crate is the single source of truth for habit, completion and
//! streak invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod streak;

pub use clock::{DayClock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig, DatabaseConfig, LedgerConfig, LoggingConfig};
pub use error::{HabitError, HabitResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::day::{format_day, format_reminder, parse_day, parse_reminder};
pub use model::habit::{Cadence, Habit, HabitId, HabitPatch, HabitValidationError, NewHabit};
pub use repo::completion_repo::{CompletionRepository, ToggleOutcome};
pub use repo::habit_repo::{HabitListQuery, HabitRepository};
pub use repo::streak_repo::StreakRepository;
pub use repo::{RepoError, RepoResult, SqliteHabitStore};
pub use service::calendar_service::CalendarService;
pub use service::completion_ledger::{CompletionEntry, CompletionLedger};
pub use service::habit_registry::HabitRegistry;
pub use service::streak_service::StreakService;
pub use streak::aggregate::{DayAggregate, DayStatus};
pub use streak::engine::{compute_streak, StreakState};
pub use streak::progress::GoalProgress;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
