//! Inclusive calendar date ranges
//!
//! A report covers whole days: the range starts at 00:00:00.000 UTC of its
//! first day and ends at 23:59:59.999 UTC of its last day, so a transaction
//! dated exactly on the last day is inside the range.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

use super::error::ReportError;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range covering `from` through `to`, both inclusive
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidRange`] if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ReportError> {
        if from > to {
            return Err(ReportError::invalid_range(from, to));
        }
        Ok(DateRange { from, to })
    }

    /// Single-day range
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            from: date,
            to: date,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// First instant of the range
    pub fn start(&self) -> DateTime<Utc> {
        start_of_day(self.from)
    }

    /// Last instant of the range (end of day of `to`, millisecond precision)
    pub fn end(&self) -> DateTime<Utc> {
        end_of_day(self.to)
    }

    /// Whether `instant` falls inside the range, bounds included
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant <= self.end()
    }
}

/// 00:00:00.000 UTC of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 UTC of `date`
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::milliseconds(MILLIS_PER_DAY - 1)
}
