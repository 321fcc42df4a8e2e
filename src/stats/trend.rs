//! Month-over-month statistics.

use super::{mean, round_to, scores, sleep_hours, YearMonth};
use crate::constants::{SLEEP_GOAL_HOURS, UNCHANGED_EPSILON};
use crate::errors::{AppError, AppResult};
use crate::journal_core::DailyRecord;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSleep {
    pub avg_hours: Option<f64>,
    pub avg_score: Option<f64>,
    pub days_7h: usize,
    pub days_7h_pct: Option<f64>,
    pub avg_deep: Option<f64>,
    pub tracked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthExercise {
    pub days: usize,
    /// Share of the month's recorded days with exercise, in percent.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSteps {
    pub avg: Option<f64>,
    pub tracked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthReading {
    /// Distinct titles mentioned.
    pub touched: usize,
    pub finished: usize,
    /// Finished titles without their author suffix, in order of finishing.
    pub finished_titles: Vec<String>,
}

/// Aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub month: YearMonth,
    /// Days with any record.
    pub days: usize,
    pub sleep: MonthSleep,
    pub exercise: MonthExercise,
    pub steps: MonthSteps,
    pub reading: MonthReading,
}

impl MonthStats {
    /// Aggregates the records of `month`; `None` when it has none.
    pub fn compute(records: &[DailyRecord], month: YearMonth) -> Option<Self> {
        let in_month = month.select(records);
        if in_month.is_empty() {
            return None;
        }
        let days = in_month.len();

        let hours = sleep_hours(in_month.iter().copied());
        let days_7h = hours.iter().filter(|h| **h >= SLEEP_GOAL_HOURS).count();
        let deep: Vec<f64> = in_month.iter().filter_map(|r| r.deep_hours()).collect();

        let exercise_days = in_month.iter().filter(|r| r.has_exercise()).count();

        let steps: Vec<f64> = in_month
            .iter()
            .filter_map(|r| r.tracked_steps())
            .map(|s| s as f64)
            .collect();

        let mut touched = BTreeSet::new();
        let mut finished_titles = Vec::new();
        for book in in_month.iter().flat_map(|r| &r.books) {
            touched.insert(book.title.as_str());
            if book.finished {
                finished_titles.push(book.short_title().to_string());
            }
        }

        Some(MonthStats {
            month,
            days,
            sleep: MonthSleep {
                avg_hours: mean(&hours).map(|h| round_to(h, 1)),
                avg_score: mean(&scores(in_month.iter().copied())).map(|s| round_to(s, 1)),
                days_7h,
                days_7h_pct: (!hours.is_empty())
                    .then(|| (days_7h as f64 / hours.len() as f64 * 100.0).round()),
                avg_deep: mean(&deep).map(|d| round_to(d, 1)),
                tracked: hours.len(),
            },
            exercise: MonthExercise {
                days: exercise_days,
                rate: (exercise_days as f64 / days as f64 * 100.0).round(),
            },
            steps: MonthSteps {
                avg: mean(&steps).map(f64::round),
                tracked: steps.len(),
            },
            reading: MonthReading {
                touched: touched.len(),
                finished: finished_titles.len(),
                finished_titles,
            },
        })
    }
}

/// How a metric moved against the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Improved,
    Declined,
    Unchanged,
    /// The previous value is missing or zero.
    NoComparison,
}

/// One metric compared with the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub change: Option<f64>,
    /// Change relative to the previous value, in percent.
    pub percent: Option<f64>,
    pub direction: Direction,
}

impl MetricDelta {
    /// Compares two values of a metric.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifelog::stats::trend::{Direction, MetricDelta};
    ///
    /// let delta = MetricDelta::compare(Some(7.2), Some(6.0), true);
    /// assert_eq!(delta.direction, Direction::Improved);
    ///
    /// let missing = MetricDelta::compare(Some(7.2), Some(0.0), true);
    /// assert_eq!(missing.direction, Direction::NoComparison);
    /// ```
    pub fn compare(current: Option<f64>, previous: Option<f64>, higher_is_better: bool) -> Self {
        let comparable = current.zip(previous.filter(|p| *p != 0.0));
        let Some((cur, prev)) = comparable else {
            return MetricDelta {
                current,
                previous,
                change: None,
                percent: None,
                direction: Direction::NoComparison,
            };
        };

        let change = cur - prev;
        let direction = if change.abs() < UNCHANGED_EPSILON {
            Direction::Unchanged
        } else if (change > 0.0) == higher_is_better {
            Direction::Improved
        } else {
            Direction::Declined
        };

        MetricDelta {
            current,
            previous,
            change: Some(change),
            percent: Some(change / prev * 100.0),
            direction,
        }
    }
}

/// The metrics shown in the trend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    SleepHours,
    SleepScore,
    SevenHourRate,
    DeepSleep,
    ExerciseDays,
    ExerciseRate,
    AverageSteps,
    BooksFinished,
    BooksTouched,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::SleepHours => "Average sleep",
            Metric::SleepScore => "Average score",
            Metric::SevenHourRate => "Nights with 7h+",
            Metric::DeepSleep => "Average deep sleep",
            Metric::ExerciseDays => "Exercise days",
            Metric::ExerciseRate => "Exercise rate",
            Metric::AverageSteps => "Average steps",
            Metric::BooksFinished => "Books finished",
            Metric::BooksTouched => "Books in progress",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::SleepHours | Metric::DeepSleep => "h",
            Metric::SleepScore => " pts",
            Metric::SevenHourRate | Metric::ExerciseRate => "%",
            Metric::ExerciseDays => " days",
            Metric::AverageSteps => " steps",
            Metric::BooksFinished | Metric::BooksTouched => " books",
        }
    }

    fn value(self, stats: &MonthStats) -> Option<f64> {
        match self {
            Metric::SleepHours => stats.sleep.avg_hours,
            Metric::SleepScore => stats.sleep.avg_score,
            Metric::SevenHourRate => stats.sleep.days_7h_pct,
            Metric::DeepSleep => stats.sleep.avg_deep,
            Metric::ExerciseDays => Some(stats.exercise.days as f64),
            Metric::ExerciseRate => Some(stats.exercise.rate),
            Metric::AverageSteps => stats.steps.avg,
            Metric::BooksFinished => Some(stats.reading.finished as f64),
            Metric::BooksTouched => Some(stats.reading.touched as f64),
        }
    }
}

/// Metrics that decide the overall verdict.
const VERDICT_METRICS: [Metric; 5] = [
    Metric::SleepHours,
    Metric::SleepScore,
    Metric::ExerciseDays,
    Metric::AverageSteps,
    Metric::BooksFinished,
];

/// Overall movement across the headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendVerdict {
    pub improved: usize,
    pub declined: usize,
}

impl TrendVerdict {
    pub fn overall(&self) -> Direction {
        use std::cmp::Ordering;
        match self.improved.cmp(&self.declined) {
            Ordering::Greater => Direction::Improved,
            Ordering::Less => Direction::Declined,
            Ordering::Equal => Direction::Unchanged,
        }
    }
}

/// A month compared with the month before it in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub current: MonthStats,
    pub previous: Option<MonthStats>,
    pub rows: Vec<(Metric, MetricDelta)>,
    /// `None` when there is no previous month to compare with.
    pub verdict: Option<TrendVerdict>,
}

impl MonthlyTrend {
    /// Compares `target` (default: the latest month in the corpus) with the
    /// closest earlier month that has records.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Report` when the corpus is empty or has no records
    /// for the requested month.
    pub fn build(records: &[DailyRecord], target: Option<YearMonth>) -> AppResult<Self> {
        let months = YearMonth::all_in(records);
        let target = match target.or_else(|| months.last().copied()) {
            Some(month) => month,
            None => {
                return Err(AppError::Report(
                    "No journal data to build a monthly trend from".to_string(),
                ))
            }
        };

        let idx = months
            .iter()
            .position(|m| *m == target)
            .ok_or_else(|| AppError::Report(format!("No journal data for {}", target)))?;

        let current = MonthStats::compute(records, target)
            .ok_or_else(|| AppError::Report(format!("No journal data for {}", target)))?;
        let previous = idx
            .checked_sub(1)
            .and_then(|prev| MonthStats::compute(records, months[prev]));

        let mut rows: Vec<(Metric, MetricDelta)> = [
            Metric::SleepHours,
            Metric::SleepScore,
            Metric::SevenHourRate,
        ]
        .into_iter()
        .map(|metric| (metric, compare(metric, &current, previous.as_ref())))
        .collect();
        if current.sleep.avg_deep.is_some() {
            rows.push((
                Metric::DeepSleep,
                compare(Metric::DeepSleep, &current, previous.as_ref()),
            ));
        }
        rows.extend(
            [
                Metric::ExerciseDays,
                Metric::ExerciseRate,
                Metric::AverageSteps,
                Metric::BooksFinished,
                Metric::BooksTouched,
            ]
            .into_iter()
            .map(|metric| (metric, compare(metric, &current, previous.as_ref()))),
        );

        let verdict = previous.as_ref().map(|_| {
            let directions: Vec<Direction> = VERDICT_METRICS
                .iter()
                .map(|metric| compare(*metric, &current, previous.as_ref()).direction)
                .collect();
            TrendVerdict {
                improved: directions
                    .iter()
                    .filter(|d| **d == Direction::Improved)
                    .count(),
                declined: directions
                    .iter()
                    .filter(|d| **d == Direction::Declined)
                    .count(),
            }
        });

        Ok(MonthlyTrend {
            current,
            previous,
            rows,
            verdict,
        })
    }
}

fn compare(metric: Metric, current: &MonthStats, previous: Option<&MonthStats>) -> MetricDelta {
    MetricDelta::compare(
        metric.value(current),
        previous.and_then(|p| metric.value(p)),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn month(s: &str) -> YearMonth {
        YearMonth::parse(s).unwrap()
    }

    #[test]
    fn test_month_stats() {
        let records = vec![
            with_exercise(scored(date(2026, 1, 1), 7.5, 90), 20),
            with_steps(sleep(date(2026, 1, 2), 6.0), 8000),
            with_book(
                with_book(sleep(date(2026, 1, 3), 8.0), "Book A - Author", true),
                "Book B",
                false,
            ),
            with_book(sleep(date(2026, 2, 1), 7.0), "Book C", true),
        ];

        let stats = MonthStats::compute(&records, month("2026-01")).unwrap();

        assert_eq!(stats.days, 3);
        assert_eq!(stats.sleep.avg_hours, Some(7.2));
        assert_eq!(stats.sleep.avg_score, Some(90.0));
        assert_eq!(stats.sleep.days_7h, 2);
        assert_eq!(stats.sleep.days_7h_pct, Some(67.0));
        assert_eq!(stats.sleep.avg_deep, None);
        assert_eq!(stats.exercise.days, 1);
        assert_eq!(stats.exercise.rate, 33.0);
        assert_eq!(stats.steps.avg, Some(8000.0));
        assert_eq!(stats.reading.touched, 2);
        assert_eq!(stats.reading.finished_titles, vec!["Book A".to_string()]);

        assert!(MonthStats::compute(&records, month("2025-12")).is_none());
    }

    #[test]
    fn test_metric_delta_directions() {
        assert_eq!(
            MetricDelta::compare(Some(5.0), Some(6.0), true).direction,
            Direction::Declined
        );
        assert_eq!(
            MetricDelta::compare(Some(5.0), Some(6.0), false).direction,
            Direction::Improved
        );
        assert_eq!(
            MetricDelta::compare(Some(6.005), Some(6.0), true).direction,
            Direction::Unchanged
        );
        assert_eq!(
            MetricDelta::compare(Some(6.0), None, true).direction,
            Direction::NoComparison
        );
        assert_eq!(
            MetricDelta::compare(None, Some(6.0), true).direction,
            Direction::NoComparison
        );

        let delta = MetricDelta::compare(Some(9.0), Some(6.0), true);
        assert_eq!(delta.change, Some(3.0));
        assert_eq!(delta.percent, Some(50.0));
    }

    #[test]
    fn test_trend_defaults_to_latest_month_and_compares_previous_present_month() {
        let records = vec![
            sleep(date(2025, 11, 3), 6.0),
            with_exercise(sleep(date(2026, 1, 3), 7.0), 10),
        ];

        let trend = MonthlyTrend::build(&records, None).unwrap();

        assert_eq!(trend.current.month, month("2026-01"));
        assert_eq!(trend.previous.as_ref().unwrap().month, month("2025-11"));
        let verdict = trend.verdict.unwrap();
        assert_eq!(verdict.improved, 1);
        assert_eq!(verdict.overall(), Direction::Improved);
    }

    #[test]
    fn test_first_month_has_no_verdict() {
        let records = vec![sleep(date(2026, 1, 3), 7.0)];
        let trend = MonthlyTrend::build(&records, Some(month("2026-01"))).unwrap();
        assert!(trend.previous.is_none());
        assert!(trend.verdict.is_none());
        assert!(trend
            .rows
            .iter()
            .all(|(_, delta)| delta.direction == Direction::NoComparison));
    }

    #[test]
    fn test_unknown_month_is_a_report_error() {
        let records = vec![sleep(date(2026, 1, 3), 7.0)];
        assert!(matches!(
            MonthlyTrend::build(&records, Some(month("2026-03"))),
            Err(AppError::Report(_))
        ));
        assert!(matches!(
            MonthlyTrend::build(&[], None),
            Err(AppError::Report(_))
        ));
    }

    #[test]
    fn test_deep_sleep_row_only_when_tracked() {
        let records = vec![with_deep(sleep(date(2026, 1, 3), 7.0), 1.2)];
        let trend = MonthlyTrend::build(&records, None).unwrap();
        assert!(trend.rows.iter().any(|(m, _)| *m == Metric::DeepSleep));

        let records = vec![sleep(date(2026, 1, 3), 7.0)];
        let trend = MonthlyTrend::build(&records, None).unwrap();
        assert!(!trend.rows.iter().any(|(m, _)| *m == Metric::DeepSleep));
    }
}
