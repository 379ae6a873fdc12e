//! Preset report periods
//!
//! Calendar presets start on the first day of the current month, quarter or
//! year. Trailing presets reach back a fixed span from today. Both end on
//! today, except [`ReportPeriod::LastMonth`] which covers the whole previous
//! month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::types::{DateRange, ReportError};

/// Named date range relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportPeriod {
    #[default]
    ThisMonth,
    LastMonth,
    ThisQuarter,
    ThisYear,
    PastWeek,
    PastMonth,
    PastQuarter,
    PastYear,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 8] = [
        ReportPeriod::ThisMonth,
        ReportPeriod::LastMonth,
        ReportPeriod::ThisQuarter,
        ReportPeriod::ThisYear,
        ReportPeriod::PastWeek,
        ReportPeriod::PastMonth,
        ReportPeriod::PastQuarter,
        ReportPeriod::PastYear,
    ];

    /// Resolve to a concrete range as seen on `today`
    ///
    /// Month arithmetic clamps to the end of shorter months, so `PastMonth`
    /// on March 31st starts on February 29th (or 28th).
    pub fn resolve(self, today: NaiveDate) -> Result<DateRange, ReportError> {
        let month_start = first_of_month(today);

        let (from, to) = match self {
            ReportPeriod::ThisMonth => (month_start, today),
            ReportPeriod::LastMonth => {
                let to = month_start.pred_opt().unwrap_or(month_start);
                (first_of_month(to), to)
            }
            ReportPeriod::ThisQuarter => {
                let into_quarter = Months::new(today.month0() % 3);
                (months_before(month_start, into_quarter), today)
            }
            ReportPeriod::ThisYear => {
                (months_before(month_start, Months::new(today.month0())), today)
            }
            ReportPeriod::PastWeek => (
                today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN),
                today,
            ),
            ReportPeriod::PastMonth => (months_before(today, Months::new(1)), today),
            ReportPeriod::PastQuarter => (months_before(today, Months::new(3)), today),
            ReportPeriod::PastYear => (months_before(today, Months::new(12)), today),
        };

        DateRange::new(from, to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::ThisMonth => "this-month",
            ReportPeriod::LastMonth => "last-month",
            ReportPeriod::ThisQuarter => "this-quarter",
            ReportPeriod::ThisYear => "this-year",
            ReportPeriod::PastWeek => "past-week",
            ReportPeriod::PastMonth => "past-month",
            ReportPeriod::PastQuarter => "past-quarter",
            ReportPeriod::PastYear => "past-year",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportPeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = ReportPeriod::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown period '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn months_before(date: NaiveDate, months: Months) -> NaiveDate {
    date.checked_sub_months(months).unwrap_or(NaiveDate::MIN)
}
