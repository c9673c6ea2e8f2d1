//! Habit domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the registry, ledger and
//!   streak engine.
//! - Own input validation for habit fields and calendar days.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Calendar days carry no time component.

pub mod day;
pub mod habit;
