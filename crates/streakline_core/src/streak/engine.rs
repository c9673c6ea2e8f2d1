//! Streak computation over a habit's full completion history.
//!
//! # Invariants
//! - `compute_streak` is pure: the same history, cadence and `today` always
//!   yield the same `StreakState`.
//! - `longest >= current` for every returned state.
//! - `current` only counts a run that ends today or in the previous period;
//!   periods that were never toggled are never filled in.

use crate::model::habit::Cadence;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cached streak projection for one habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_completed_day: Option<NaiveDate>,
}

impl StreakState {
    /// State of a habit with no completions.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Computes the streak state from every completion day of one habit.
///
/// `days` may be unsorted and may contain days after `today`; such future
/// days count toward `longest` and `last_completed_day` but never toward
/// `current`.
pub fn compute_streak(days: &[NaiveDate], cadence: Cadence, today: NaiveDate) -> StreakState {
    let periods = sorted_periods(days, cadence);
    if periods.is_empty() {
        return StreakState::empty();
    }

    let today_period = period_index(today, cadence);
    let current = match run_length_in(&periods, today_period) {
        0 => run_length_in(&periods, today_period - 1),
        run => run,
    };

    StreakState {
        current,
        longest: longest_run(&periods),
        last_completed_day: days.iter().max().copied(),
    }
}

/// Length of the maximal run of consecutive periods ending at `end`.
///
/// Returns 0 when `end` itself has no completion.
pub fn run_length_ending_at(days: &[NaiveDate], cadence: Cadence, end: NaiveDate) -> u32 {
    let periods = sorted_periods(days, cadence);
    run_length_in(&periods, period_index(end, cadence))
}

/// Maps a day to its streak unit: the day itself, or its Monday-based week.
fn period_index(day: NaiveDate, cadence: Cadence) -> i64 {
    let ordinal = i64::from(day.num_days_from_ce());
    match cadence {
        Cadence::Daily => ordinal,
        Cadence::Weekly => {
            let monday = ordinal - i64::from(day.weekday().num_days_from_monday());
            monday.div_euclid(7)
        }
    }
}

fn sorted_periods(days: &[NaiveDate], cadence: Cadence) -> Vec<i64> {
    let mut periods: Vec<i64> = days.iter().map(|day| period_index(*day, cadence)).collect();
    periods.sort_unstable();
    periods.dedup();
    periods
}

fn run_length_in(periods: &[i64], end: i64) -> u32 {
    let Ok(mut index) = periods.binary_search(&end) else {
        return 0;
    };

    let mut run = 1;
    while index > 0 && periods[index - 1] == periods[index] - 1 {
        run += 1;
        index -= 1;
    }
    run
}

fn longest_run(periods: &[i64]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<i64> = None;

    for &period in periods {
        run = match previous {
            Some(prev) if period == prev + 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(period);
    }
    longest
}
