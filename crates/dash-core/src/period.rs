//! Calendar buckets for date-keyed aggregates.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bucket size for date-keyed aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    /// ISO 8601 week, Monday start.
    IsoWeek,
    CalendarMonth,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::IsoWeek => write!(f, "iso_week"),
            Granularity::CalendarMonth => write!(f, "calendar_month"),
        }
    }
}

/// A date bucket keyed by its first day.
///
/// Periods of the same granularity order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    granularity: Granularity,
    start: NaiveDate,
}

impl Period {
    /// The bucket of `granularity` containing `date`.
    pub fn containing(granularity: Granularity, date: NaiveDate) -> Self {
        let start = match granularity {
            Granularity::Day => date,
            Granularity::IsoWeek => {
                date - Days::new(u64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::CalendarMonth => date - Days::new(u64::from(date.day0())),
        };
        Self { granularity, start }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::containing(Granularity::Day, date)
    }

    pub fn iso_week(date: NaiveDate) -> Self {
        Self::containing(Granularity::IsoWeek, date)
    }

    pub fn month(date: NaiveDate) -> Self {
        Self::containing(Granularity::CalendarMonth, date)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// First day of the bucket.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Label: `2024-01-05`, `2024-W01` or `2024-01`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Day => self.start.format("%Y-%m-%d").to_string(),
            Granularity::IsoWeek => {
                let week = self.start.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Granularity::CalendarMonth => self.start.format("%Y-%m").to_string(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
