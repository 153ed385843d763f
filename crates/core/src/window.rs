//! Inclusive calendar-date windows used to scope a selection.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// A date range `[start, end]`, inclusive on both ends.
///
/// Membership is decided on the calendar date of a timestamp, so every
/// event recorded on `end` is inside the window regardless of its time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form; deserialization goes through [`DateWindow::new`].
#[derive(Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for DateWindow {
    type Error = WindowError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl DateWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::Inverted` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window covering a single day.
    #[must_use]
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.contains_date(timestamp.date())
    }

    /// Number of calendar days covered.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
