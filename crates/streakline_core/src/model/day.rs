//! Calendar-day and time-of-day text codecs.
//!
//! # Invariants
//! - Days are stored and exchanged as `YYYY-MM-DD` (four-digit year), so
//!   lexicographic order equals chronological order in SQL.
//! - Reminders are exchanged as `HH:MM`.

use crate::model::habit::HabitValidationError;
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

const DAY_FORMAT: &str = "%Y-%m-%d";
const REMINDER_FORMAT: &str = "%H:%M";

static ISO_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso day regex"));
static REMINDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid reminder regex"));

/// Parses a strict ISO calendar day.
///
/// Rejects times, offsets, short components and impossible dates such as
/// `2023-02-29`.
pub fn parse_day(value: &str) -> Result<NaiveDate, HabitValidationError> {
    let trimmed = value.trim();
    if !ISO_DAY_RE.is_match(trimmed) {
        return Err(HabitValidationError::InvalidDay(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
        .map_err(|_| HabitValidationError::InvalidDay(value.to_string()))
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses a `HH:MM` reminder time.
pub fn parse_reminder(value: &str) -> Result<NaiveTime, HabitValidationError> {
    let trimmed = value.trim();
    if !REMINDER_RE.is_match(trimmed) {
        return Err(HabitValidationError::InvalidReminder(value.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, REMINDER_FORMAT)
        .map_err(|_| HabitValidationError::InvalidReminder(value.to_string()))
}

pub fn format_reminder(time: NaiveTime) -> String {
    time.format(REMINDER_FORMAT).to_string()
}

/// Returns the Sunday that opens the calendar week containing `day`.
pub fn week_start_sunday(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}
