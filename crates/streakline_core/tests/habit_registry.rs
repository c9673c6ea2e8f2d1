use chrono::NaiveDate;
use rusqlite::Connection;
use streakline_core::db::open_db_in_memory;
use streakline_core::{
    parse_reminder, Cadence, CompletionLedger, FixedClock, Habit, HabitError, HabitPatch,
    HabitRegistry, HabitRepository, HabitValidationError, NewHabit, SqliteHabitStore,
    StreakService, StreakState,
};
use uuid::Uuid;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn count_rows(conn: &Connection, table: &str, habit_id: Uuid) -> i64 {
    let column = if table == "habits" { "uuid" } else { "habit_uuid" };
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1;"),
        [habit_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_habit_initializes_empty_streak() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);
    let streaks = StreakService::new(store, &clock);

    let reminder = parse_reminder("07:30").unwrap();
    let habit = registry
        .create_habit("alice", " Drink water ", Cadence::Daily, Some(reminder))
        .unwrap();
    assert_eq!(habit.name, "Drink water");
    assert_eq!(habit.owner_id, "alice");
    assert_eq!(habit.reminder, Some(reminder));
    assert_eq!(habit.created_on, day("2024-01-01"));

    assert_eq!(
        streaks.cached_streak(habit.id, "alice").unwrap(),
        StreakState::empty()
    );
}

#[test]
fn create_habit_rejects_empty_name_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);

    let err = registry
        .create_habit("alice", "   ", Cadence::Daily, None)
        .unwrap_err();
    assert!(matches!(
        err,
        HabitError::Validation(HabitValidationError::EmptyName)
    ));
    assert!(registry.list_habits("alice").unwrap().is_empty());

    let zero_goal = registry
        .create_habit_with(
            "alice",
            NewHabit {
                goal: Some(0),
                ..NewHabit::named("Push-ups")
            },
        )
        .unwrap_err();
    assert!(matches!(
        zero_goal,
        HabitError::Validation(HabitValidationError::ZeroGoal)
    ));
}

#[test]
fn update_habit_applies_patch_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);

    let habit = registry
        .create_habit("alice", "Read", Cadence::Daily, None)
        .unwrap();
    let updated = registry
        .update_habit(
            habit.id,
            "alice",
            &HabitPatch {
                name: Some("Read 20 pages".to_string()),
                cadence: Some(Cadence::Weekly),
                reminder: Some(Some(parse_reminder("21:00").unwrap())),
                goal: Some(Some(30)),
            },
        )
        .unwrap();

    assert_eq!(updated.id, habit.id);
    assert_eq!(updated.name, "Read 20 pages");
    assert_eq!(updated.cadence, Cadence::Weekly);
    assert_eq!(updated.goal, Some(30));
    assert_eq!(registry.get_habit(habit.id, "alice").unwrap(), updated);

    let err = registry
        .update_habit(
            habit.id,
            "alice",
            &HabitPatch {
                name: Some(" ".to_string()),
                ..HabitPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, HabitError::Validation(_)));
    assert_eq!(registry.get_habit(habit.id, "alice").unwrap().name, "Read 20 pages");
}

#[test]
fn foreign_owner_sees_not_found_on_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let streaks = StreakService::new(store, &clock);

    let habit = registry
        .create_habit("alice", "Meditate", Cadence::Daily, None)
        .unwrap();
    let missing = Uuid::new_v4();

    let foreign = registry.get_habit(habit.id, "mallory").unwrap_err();
    let absent = registry.get_habit(missing, "alice").unwrap_err();
    assert_eq!(foreign.code(), absent.code());
    assert!(matches!(foreign, HabitError::NotFound(id) if id == habit.id));

    assert!(matches!(
        registry.update_habit(habit.id, "mallory", &HabitPatch::default()),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        registry.delete_habit(habit.id, "mallory"),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        ledger.toggle(habit.id, "mallory", None),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        ledger.list_completions(habit.id, "mallory", None),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        streaks.get_streak(habit.id, "mallory"),
        Err(HabitError::NotFound(_))
    ));
    assert!(registry.list_habits("mallory").unwrap().is_empty());

    // Completion lookups do not leak another owner's ledger.
    ledger.toggle(habit.id, "alice", None).unwrap();
    assert!(matches!(
        ledger.is_completed(habit.id, "mallory", day("2024-01-01")),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        ledger.is_completed(missing, "alice", day("2024-01-01")),
        Err(HabitError::NotFound(_))
    ));
    assert!(ledger.is_completed(habit.id, "alice", day("2024-01-01")).unwrap());
    ledger.toggle(habit.id, "alice", None).unwrap();

    // Nothing changed for the real owner.
    assert!(ledger.list_completions(habit.id, "alice", None).unwrap().is_empty());
}

#[test]
fn delete_habit_cascades_to_completions_and_streak() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-03"));
    let registry = HabitRegistry::new(store, &clock);
    let ledger = CompletionLedger::new(store, &clock);
    let streaks = StreakService::new(store, &clock);

    let habit = registry
        .create_habit("alice", "Walk", Cadence::Daily, None)
        .unwrap();
    for value in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        ledger.toggle(habit.id, "alice", Some(day(value))).unwrap();
    }
    assert_eq!(count_rows(&conn, "completions", habit.id), 3);

    registry.delete_habit(habit.id, "alice").unwrap();

    assert!(matches!(
        ledger.list_completions(habit.id, "alice", None),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        streaks.get_streak(habit.id, "alice"),
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        ledger.is_completed(habit.id, "alice", day("2024-01-02")),
        Err(HabitError::NotFound(_))
    ));
    for table in ["habits", "completions", "streaks"] {
        assert_eq!(count_rows(&conn, table, habit.id), 0, "{table} has orphans");
    }

    assert!(matches!(
        registry.delete_habit(habit.id, "alice"),
        Err(HabitError::NotFound(_))
    ));
}

#[test]
fn list_habits_hides_archived_until_restored() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();
    let clock = FixedClock::new(day("2024-01-01"));
    let registry = HabitRegistry::new(store, &clock);

    let first = registry
        .create_habit("alice", "Stretch", Cadence::Daily, None)
        .unwrap();
    let second = registry
        .create_habit("alice", "Journal", Cadence::Weekly, None)
        .unwrap();
    registry
        .create_habit("bob", "Run", Cadence::Daily, None)
        .unwrap();

    let listed: Vec<_> = registry
        .list_habits("alice")
        .unwrap()
        .into_iter()
        .map(|habit| habit.id)
        .collect();
    assert_eq!(listed, vec![first.id, second.id]);

    let archived = registry.archive_habit(first.id, "alice").unwrap();
    assert!(archived.archived);
    assert_eq!(registry.list_habits("alice").unwrap().len(), 1);
    assert_eq!(registry.list_habits_with("alice", true).unwrap().len(), 2);

    let restored = registry.restore_habit(first.id, "alice").unwrap();
    assert!(!restored.archived);
    assert_eq!(registry.list_habits("alice").unwrap().len(), 2);
}

#[test]
fn duplicate_habit_id_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteHabitStore::try_new(&conn).unwrap();

    let habit = Habit::new("alice", "Floss", Cadence::Daily, day("2024-01-01"));
    store.create_habit(&habit).unwrap();
    let err = store.create_habit(&habit).unwrap_err();
    assert!(matches!(HabitError::from(err), HabitError::Conflict(_)));

    // The failed insert rolled back; exactly one habit and one streak row remain.
    assert_eq!(count_rows(&conn, "habits", habit.id), 1);
    assert_eq!(count_rows(&conn, "streaks", habit.id), 1);
}
