//! Injectable "current calendar day" source.
//!
//! Services never read the wall clock directly; they ask a `DayClock`, so
//! streak computation stays a pure function of explicit input.

use chrono::{Days, NaiveDate, Utc};
use std::cell::Cell;

/// Supplies the current calendar day.
pub trait DayClock {
    fn today(&self) -> NaiveDate;
}

impl<T: DayClock + ?Sized> DayClock for &T {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Production clock: the current UTC calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl DayClock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
    }

    /// Moves the clock forward by `days` calendar days.
    pub fn advance(&self, days: u64) {
        let current = self.today.get();
        self.today
            .set(current.checked_add_days(Days::new(days)).unwrap_or(current));
    }
}

impl DayClock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{DayClock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_advances_by_calendar_days() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        clock.advance(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let by_ref: &dyn DayClock = &clock;
        assert_eq!(by_ref.today(), clock.today());
    }
}
