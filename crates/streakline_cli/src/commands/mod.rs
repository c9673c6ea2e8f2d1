//! Command handlers and the per-invocation session they share.

use chrono::NaiveDate;
use clap::Args;
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use streakline_core::db::open_db;
use streakline_core::{
    init_logging_from_config, parse_day, CalendarService, CompletionLedger, CoreConfig,
    DayClock, FixedClock, HabitId, HabitRegistry, SqliteHabitStore, StreakService,
    SystemClock,
};

pub mod calendar;
pub mod habit;
pub mod ledger;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_OWNER: &str = "local";

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// SQLite database file (overrides `[database] path`)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Owner id every habit operation is scoped to
    #[arg(long, global = true, default_value = DEFAULT_OWNER)]
    pub owner: String,
    /// Calendar day treated as "today" (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,
}

/// Open database plus the resolved owner, day and listing window.
pub struct Session {
    conn: Connection,
    clock: FixedClock,
    owner: String,
    window: u32,
}

type Store<'a> = SqliteHabitStore<'a>;

impl Session {
    pub fn open(args: &GlobalArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => CoreConfig::load(path)?,
            None => CoreConfig::default(),
        };
        if let Some(db) = &args.db {
            config.database.path = db.clone();
        }
        init_logging_from_config(&config.logging)?;

        // One invocation sees one calendar day, even across midnight.
        let today = match args.today.as_deref() {
            Some(value) => parse_day(value)?,
            None => SystemClock.today(),
        };

        let owner = args.owner.trim();
        if owner.is_empty() {
            return Err("owner cannot be empty".into());
        }

        Ok(Self {
            conn: open_db(&config.database.path)?,
            clock: FixedClock::new(today),
            owner: owner.to_string(),
            window: config.ledger.completion_window,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn store(&self) -> CliResult<Store<'_>> {
        Ok(SqliteHabitStore::try_new(&self.conn)?)
    }

    pub fn registry(&self) -> CliResult<HabitRegistry<Store<'_>, &FixedClock>> {
        Ok(HabitRegistry::new(self.store()?, &self.clock))
    }

    pub fn ledger(&self) -> CliResult<CompletionLedger<Store<'_>, &FixedClock>> {
        Ok(CompletionLedger::new(self.store()?, &self.clock).with_window(self.window))
    }

    pub fn streaks(&self) -> CliResult<StreakService<Store<'_>, &FixedClock>> {
        Ok(StreakService::new(self.store()?, &self.clock))
    }

    pub fn calendar(&self) -> CliResult<CalendarService<Store<'_>, &FixedClock>> {
        Ok(CalendarService::new(self.store()?, &self.clock))
    }
}

pub fn parse_habit_id(value: &str) -> CliResult<HabitId> {
    HabitId::parse_str(value.trim())
        .map_err(|err| format!("invalid habit id `{value}`: {err}").into())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
