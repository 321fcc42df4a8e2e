//! Summary of the previous Monday-to-Sunday week.

use super::{first_max_by, first_min_by, mean, round_to, scores, sleep_hours, DateWindow};
use crate::constants::SLEEP_GOAL_HOURS;
use crate::journal_core::DailyRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// A notable night of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightSummary {
    pub date: NaiveDate,
    pub hours: f64,
    pub score: Option<u8>,
}

impl NightSummary {
    fn of(record: &DailyRecord) -> Option<Self> {
        Some(NightSummary {
            date: record.date,
            hours: record.sleep_hours?,
            score: record.score(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub window: (NaiveDate, NaiveDate),
    /// ISO week number and year of the week's Monday.
    pub week_number: u32,
    pub year: i32,
    /// Days of the week with any record.
    pub days: usize,
    pub avg_hours: Option<f64>,
    pub avg_score: Option<f64>,
    pub best: Option<NightSummary>,
    pub worst: Option<NightSummary>,
    pub days_7h_plus: usize,
    pub exercise_days: usize,
    pub avg_steps: Option<f64>,
    pub step_days: usize,
    pub books_touched: usize,
    pub finished: Vec<String>,
}

impl WeeklySummary {
    /// Summarises the calendar week before the one containing `today`.
    ///
    /// Returns `None` when that week has no records.
    pub fn build(records: &[DailyRecord], today: NaiveDate) -> Option<Self> {
        let window = DateWindow::calendar_week_before(today);
        let week = window.select(records);
        if week.is_empty() {
            return None;
        }

        let slept: Vec<&DailyRecord> = week
            .iter()
            .copied()
            .filter(|r| r.sleep_hours.is_some())
            .collect();
        let hours = sleep_hours(slept.iter().copied());
        let steps: Vec<f64> = week
            .iter()
            .filter_map(|r| r.tracked_steps())
            .map(|s| s as f64)
            .collect();

        let mut touched = BTreeSet::new();
        let mut finished = Vec::new();
        for book in week.iter().flat_map(|r| &r.books) {
            touched.insert(book.title.as_str());
            if book.finished {
                finished.push(book.title.clone());
            }
        }

        let iso = window.start.iso_week();
        Some(WeeklySummary {
            window: (window.start, window.end),
            week_number: iso.week(),
            year: iso.year(),
            days: week.len(),
            avg_hours: mean(&hours).map(|h| round_to(h, 1)),
            avg_score: mean(&scores(slept.iter().copied())).map(|s| round_to(s, 1)),
            best: first_max_by(&slept, |r| r.score().unwrap_or(0)).and_then(NightSummary::of),
            worst: first_min_by(&slept, |r| r.score().unwrap_or(100)).and_then(NightSummary::of),
            days_7h_plus: hours.iter().filter(|h| **h >= SLEEP_GOAL_HOURS).count(),
            exercise_days: week.iter().filter(|r| r.has_exercise()).count(),
            avg_steps: mean(&steps).map(f64::round),
            step_days: steps.len(),
            books_touched: touched.len(),
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_summarises_previous_calendar_week() {
        // Week of 2026-01-26 (Mon) to 2026-02-01 (Sun); today is Wednesday 02-04
        let records = vec![
            sleep(date(2026, 1, 25), 9.0),
            with_exercise(scored(date(2026, 1, 26), 7.0, 80), 10),
            with_steps(scored(date(2026, 1, 28), 6.0, 92), 6000),
            with_book(sleep(date(2026, 2, 1), 8.0), "Book A", true),
            with_book(DailyRecord::new(date(2026, 1, 30)), "Book B", false),
            sleep(date(2026, 2, 2), 4.0),
        ];

        let summary = WeeklySummary::build(&records, date(2026, 2, 4)).unwrap();

        assert_eq!(summary.window, (date(2026, 1, 26), date(2026, 2, 1)));
        assert_eq!(summary.week_number, 5);
        assert_eq!(summary.year, 2026);
        assert_eq!(summary.days, 4);
        assert_eq!(summary.avg_hours, Some(7.0));
        assert_eq!(summary.avg_score, Some(86.0));
        assert_eq!(summary.best.as_ref().unwrap().date, date(2026, 1, 28));
        assert_eq!(summary.worst.as_ref().unwrap().date, date(2026, 1, 26));
        assert_eq!(summary.days_7h_plus, 2);
        assert_eq!(summary.exercise_days, 1);
        assert_eq!(summary.avg_steps, Some(6000.0));
        assert_eq!(summary.books_touched, 2);
        assert_eq!(summary.finished, vec!["Book A".to_string()]);
    }

    #[test]
    fn test_empty_week_is_none() {
        let records = vec![sleep(date(2026, 2, 2), 7.0)];
        assert!(WeeklySummary::build(&records, date(2026, 2, 4)).is_none());
    }
}
