use crate::domain::MonthCursor;
use chrono::{Duration, NaiveDate};

/// Which month the calendar shows. Month steps never touch the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    cursor: MonthCursor,
}

impl Navigation {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cursor: MonthCursor::containing(today),
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    /// Brings the month containing `date` on screen.
    pub fn show(&mut self, date: NaiveDate) {
        if !self.cursor.contains(date) {
            self.cursor = MonthCursor::containing(date);
        }
    }

    /// Date reached by moving `days` from `from`, for keyboard selection.
    pub fn step(from: NaiveDate, days: i64) -> NaiveDate {
        from.checked_add_signed(Duration::days(days)).unwrap_or(from)
    }
}
