use chrono::NaiveDate;
use streakline_core::db::open_db_in_memory;
use streakline_core::{
    Cadence, CalendarService, CompletionLedger, DayStatus, FixedClock, HabitError,
    HabitRegistry, HabitValidationError, SqliteHabitStore,
};

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn owner_without_habits_has_no_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let calendar = CalendarService::new(store, &clock);

    assert_eq!(calendar.day_status("u1", None).unwrap(), None);
}

#[test]
fn day_is_complete_only_when_every_active_habit_is_done() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-02"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let calendar = CalendarService::new(store, &clock);

    let water = registry
        .create_habit("u1", "Water", Cadence::Daily, None)
        .unwrap();
    let read = registry
        .create_habit("u1", "Read", Cadence::Daily, None)
        .unwrap();

    ledger.toggle(water.id, "u1", None).unwrap();
    assert_eq!(
        calendar.day_status("u1", None).unwrap(),
        Some(DayStatus::Incomplete)
    );

    ledger.toggle(read.id, "u1", None).unwrap();
    let aggregate = calendar.day_aggregate("u1", day("2024-01-02")).unwrap();
    assert_eq!(aggregate.status, Some(DayStatus::Complete));
    assert_eq!((aggregate.active, aggregate.completed), (2, 2));

    ledger.toggle(read.id, "u1", None).unwrap();
    assert_eq!(
        calendar.day_status("u1", Some(day("2024-01-02"))).unwrap(),
        Some(DayStatus::Incomplete)
    );
}

#[test]
fn other_owners_and_archived_habits_do_not_count() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-02"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let calendar = CalendarService::new(store, &clock);

    let mine = registry
        .create_habit("u1", "Water", Cadence::Daily, None)
        .unwrap();
    let archived = registry
        .create_habit("u1", "Old habit", Cadence::Daily, None)
        .unwrap();
    registry
        .create_habit("u2", "Someone else's", Cadence::Daily, None)
        .unwrap();
    registry.archive_habit(archived.id, "u1").unwrap();

    ledger.toggle(mine.id, "u1", None).unwrap();
    assert_eq!(
        calendar.day_status("u1", None).unwrap(),
        Some(DayStatus::Complete)
    );
    assert_eq!(
        calendar.day_status("u2", None).unwrap(),
        Some(DayStatus::Incomplete)
    );
}

#[test]
fn days_before_a_habit_existed_ignore_it() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let calendar = CalendarService::new(store, &clock);

    let first = registry
        .create_habit("u1", "Water", Cadence::Daily, None)
        .unwrap();
    ledger.toggle(first.id, "u1", None).unwrap();

    clock.set(day("2024-01-03"));
    registry
        .create_habit("u1", "Read", Cadence::Daily, None)
        .unwrap();

    assert_eq!(
        calendar.day_status("u1", Some(day("2024-01-01"))).unwrap(),
        Some(DayStatus::Complete)
    );
    assert_eq!(
        calendar.day_status("u1", None).unwrap(),
        Some(DayStatus::Incomplete)
    );
}

#[test]
fn week_rings_cover_sunday_through_saturday() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-07"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let calendar = CalendarService::new(store, &clock);

    let habit = registry
        .create_habit("u1", "Water", Cadence::Daily, None)
        .unwrap();
    ledger.toggle(habit.id, "u1", Some(day("2024-01-07"))).unwrap();
    ledger.toggle(habit.id, "u1", Some(day("2024-01-09"))).unwrap();

    // Wednesday anchor; the row opens on Sunday 2024-01-07.
    let week = calendar
        .week_rings("u1", Some(day("2024-01-10")))
        .unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].day, day("2024-01-07"));
    assert_eq!(week[6].day, day("2024-01-13"));

    let statuses: Vec<_> = week.iter().map(|aggregate| aggregate.status).collect();
    assert_eq!(
        statuses,
        vec![
            Some(DayStatus::Complete),
            Some(DayStatus::Incomplete),
            Some(DayStatus::Complete),
            Some(DayStatus::Incomplete),
            Some(DayStatus::Incomplete),
            Some(DayStatus::Incomplete),
            Some(DayStatus::Incomplete),
        ]
    );
}

#[test]
fn range_status_validates_bounds() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let calendar = CalendarService::new(store, &clock);

    let reversed = calendar
        .range_status("u1", day("2024-01-05"), day("2024-01-01"))
        .unwrap_err();
    assert!(matches!(
        reversed,
        HabitError::Validation(HabitValidationError::InvalidRange { .. })
    ));

    let too_long = calendar
        .range_status("u1", day("2024-01-01"), day("2025-01-02"))
        .unwrap_err();
    assert!(matches!(
        too_long,
        HabitError::Validation(HabitValidationError::RangeTooLong { days: 368, .. })
    ));

    let leap_year = calendar
        .range_status("u1", day("2024-01-01"), day("2024-12-31"))
        .unwrap();
    assert_eq!(leap_year.len(), 366);
    assert!(leap_year.iter().all(|aggregate| aggregate.status.is_none()));
}
