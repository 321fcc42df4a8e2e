//! Pure statistics over the loaded corpus.
//!
//! Everything here borrows `&[DailyRecord]` and returns plain values; the
//! report operations in `ops` decide how to render and where to write them.
//! Averages over an empty selection are `None`, never zero.

pub mod correlation;
pub mod reading;
pub mod sleep;
pub mod trend;
pub mod weekly;

use crate::errors::{AppError, AppResult};
use crate::journal_core::DailyRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Arithmetic mean, or `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use lifelog::stats::mean;
///
/// assert_eq!(mean(&[6.0, 7.5]), Some(6.75));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Rounds to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Formats decimal hours past midnight as `H:MM`, wrapping past 24.
pub fn format_clock(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let wrapped = total_minutes.rem_euclid(24 * 60);
    format!("{}:{:02}", wrapped / 60, wrapped % 60)
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// The `days` days ending on `end`, inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifelog::stats::DateWindow;
    /// use chrono::NaiveDate;
    ///
    /// let end = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    /// let window = DateWindow::trailing(end, 7);
    /// assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 1, 27).unwrap());
    /// ```
    pub fn trailing(end: NaiveDate, days: i64) -> Self {
        DateWindow {
            start: end - Duration::days(days - 1),
            end,
        }
    }

    /// The Monday-to-Sunday week before the week containing `date`.
    pub fn calendar_week_before(date: NaiveDate) -> Self {
        let days_from_monday = i64::from(date.weekday().num_days_from_monday());
        let start = date - Duration::days(days_from_monday + 7);
        DateWindow {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The window of the same length immediately before this one.
    pub fn preceding(&self) -> Self {
        let length = (self.end - self.start).num_days() + 1;
        DateWindow::trailing(self.start - Duration::days(1), length)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The records dated inside the window.
    pub fn select<'a>(&self, records: &'a [DailyRecord]) -> Vec<&'a DailyRecord> {
        records.iter().filter(|r| self.contains(r.date)).collect()
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Builds a month, rejecting month numbers outside 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses a `YYYY-MM` argument.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` if the string is not a valid month.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifelog::stats::YearMonth;
    ///
    /// let month = YearMonth::parse("2026-01").unwrap();
    /// assert_eq!(month.previous().to_string(), "2025-12");
    /// assert!(YearMonth::parse("2026-13").is_err());
    /// ```
    pub fn parse(s: &str) -> AppResult<Self> {
        let invalid = || AppError::Journal(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The records dated inside the month.
    pub fn select(self, records: &[DailyRecord]) -> Vec<&DailyRecord> {
        records.iter().filter(|r| self.contains(r.date)).collect()
    }

    /// The distinct months present in the records, ascending.
    pub fn all_in(records: &[DailyRecord]) -> Vec<YearMonth> {
        let mut months: Vec<YearMonth> = records.iter().map(|r| YearMonth::of(r.date)).collect();
        months.sort();
        months.dedup();
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sleep hours of the records that have them.
pub(crate) fn sleep_hours<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    records.into_iter().filter_map(|r| r.sleep_hours).collect()
}

/// Sleep scores of the records that have them.
pub(crate) fn scores<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    records
        .into_iter()
        .filter_map(|r| r.score())
        .map(f64::from)
        .collect()
}

/// The first record with the highest key.
pub(crate) fn first_max_by<'a, F>(records: &[&'a DailyRecord], key: F) -> Option<&'a DailyRecord>
where
    F: Fn(&DailyRecord) -> u8,
{
    records.iter().copied().fold(None, |best, record| match best {
        Some(current) if key(current) >= key(record) => Some(current),
        _ => Some(record),
    })
}

/// The first record with the lowest key.
pub(crate) fn first_min_by<'a, F>(records: &[&'a DailyRecord], key: F) -> Option<&'a DailyRecord>
where
    F: Fn(&DailyRecord) -> u8,
{
    records.iter().copied().fold(None, |best, record| match best {
        Some(current) if key(current) <= key(record) => Some(current),
        _ => Some(record),
    })
}
