//! The sleep report: recent week, month comparison, insights and streak.

use super::{
    first_max_by, first_min_by, format_clock, mean, round_to, scores, sleep_hours, DateWindow,
    YearMonth,
};
use crate::constants::{
    LATE_BEDTIME_HOURS, LOW_SCORE_DAYS_TRIGGER, LOW_SCORE_THRESHOLD, MIN_DEEP_SLEEP_SAMPLES,
    SLEEP_GOAL_HOURS,
};
use crate::journal_core::DailyRecord;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// Days covered by the weekly block.
const WEEK_DAYS: i64 = 7;
/// Days looked back for insights.
const INSIGHT_LOOKBACK_DAYS: i64 = 30;
/// Relative change of deep sleep counted as a trend.
const DEEP_SLEEP_TREND_RATIO: f64 = 0.15;
/// Minimum nights on a weekday before its bedtime is judged.
const MIN_WEEKDAY_BEDTIMES: usize = 2;

/// Sleep over the seven days ending on the report date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySleep {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub avg_hours: f64,
    pub avg_score: Option<f64>,
    pub days: usize,
    /// Highest score; nights without a score count as 0.
    pub best_day: NaiveDate,
    /// Lowest score; nights without a score count as 100.
    pub worst_day: NaiveDate,
    /// Change of the average against the seven days before.
    pub vs_last_week: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairComparison {
    pub this: f64,
    pub last: f64,
    pub diff: f64,
}

/// This calendar month against the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyComparison {
    pub this_month: YearMonth,
    pub last_month: YearMonth,
    pub hours: PairComparison,
    pub score: Option<PairComparison>,
    pub deep_hours: Option<PairComparison>,
}

/// An observation worth acting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    ShortSleep { avg_hours: f64 },
    LateBedtime { weekday: Weekday, avg_bedtime: f64 },
    DeepSleepDeclining { from: f64, to: f64 },
    DeepSleepImproving { from: f64, to: f64 },
    LowScores { days: usize },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::ShortSleep { avg_hours } => write!(
                f,
                "Average sleep over the last 30 days is {:.1}h, below the recommended {}h",
                avg_hours, SLEEP_GOAL_HOURS
            ),
            Insight::LateBedtime {
                weekday,
                avg_bedtime,
            } => write!(
                f,
                "Average bedtime on {} is late ({})",
                weekday_name(*weekday),
                format_clock(*avg_bedtime)
            ),
            Insight::DeepSleepDeclining { from, to } => {
                write!(f, "Deep sleep is declining ({:.1}h -> {:.1}h)", from, to)
            }
            Insight::DeepSleepImproving { from, to } => {
                write!(f, "Deep sleep is improving ({:.1}h -> {:.1}h)", from, to)
            }
            Insight::LowScores { days } => write!(
                f,
                "{} nights in the last 30 days scored below {}",
                days, LOW_SCORE_THRESHOLD
            ),
        }
    }
}

impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Weekdays in calendar order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Everything shown in the sleep report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepReport {
    pub today: NaiveDate,
    pub weekly: Option<WeeklySleep>,
    pub monthly_comparison: Option<MonthlyComparison>,
    pub insights: Vec<Insight>,
    /// Consecutive most recent nights of at least seven hours.
    pub streak_7h: usize,
}

impl SleepReport {
    /// Computes the report as seen on `today`.
    pub fn build(records: &[DailyRecord], today: NaiveDate) -> Self {
        let slept: Vec<&DailyRecord> = records
            .iter()
            .filter(|r| r.sleep_hours.is_some() && r.date <= today)
            .collect();

        SleepReport {
            today,
            weekly: weekly(&slept, today),
            monthly_comparison: monthly_comparison(&slept, today),
            insights: insights(&slept, today),
            streak_7h: streak(&slept),
        }
    }
}

fn weekly(slept: &[&DailyRecord], today: NaiveDate) -> Option<WeeklySleep> {
    let window = DateWindow::trailing(today, WEEK_DAYS);
    let week: Vec<&DailyRecord> = slept
        .iter()
        .copied()
        .filter(|r| window.contains(r.date))
        .collect();

    let avg_hours = round_to(mean(&sleep_hours(week.iter().copied()))?, 2);
    let best_day = first_max_by(&week, |r| r.score().unwrap_or(0))?.date;
    let worst_day = first_min_by(&week, |r| r.score().unwrap_or(100))?.date;

    let previous = window.preceding();
    let last_week = sleep_hours(slept.iter().copied().filter(|r| previous.contains(r.date)));
    let vs_last_week = mean(&last_week).map(|avg| round_to(avg_hours - avg, 2));

    Some(WeeklySleep {
        start: window.start,
        end: window.end,
        avg_hours,
        avg_score: mean(&scores(week.iter().copied())).map(|s| round_to(s, 1)),
        days: week.len(),
        best_day,
        worst_day,
        vs_last_week,
    })
}

fn compare(this: &[f64], last: &[f64], places: i32) -> Option<PairComparison> {
    let this = round_to(mean(this)?, places);
    let last = round_to(mean(last)?, places);
    Some(PairComparison {
        this,
        last,
        diff: round_to(this - last, places),
    })
}

fn monthly_comparison(slept: &[&DailyRecord], today: NaiveDate) -> Option<MonthlyComparison> {
    let this_month = YearMonth::of(today);
    let last_month = this_month.previous();
    let in_month = |month: YearMonth| {
        slept
            .iter()
            .copied()
            .filter(|r| month.contains(r.date))
            .collect::<Vec<_>>()
    };
    let this = in_month(this_month);
    let last = in_month(last_month);

    let deep = |records: &[&DailyRecord]| -> Vec<f64> {
        records.iter().filter_map(|r| r.deep_hours()).collect()
    };

    Some(MonthlyComparison {
        this_month,
        last_month,
        hours: compare(
            &sleep_hours(this.iter().copied()),
            &sleep_hours(last.iter().copied()),
            2,
        )?,
        score: compare(
            &scores(this.iter().copied()),
            &scores(last.iter().copied()),
            1,
        ),
        deep_hours: compare(&deep(&this), &deep(&last), 2),
    })
}

fn insights(slept: &[&DailyRecord], today: NaiveDate) -> Vec<Insight> {
    let window = DateWindow::new(today - Duration::days(INSIGHT_LOOKBACK_DAYS), today);
    let recent: Vec<&DailyRecord> = slept
        .iter()
        .copied()
        .filter(|r| window.contains(r.date))
        .collect();

    let mut found = Vec::new();
    let Some(avg_hours) = mean(&sleep_hours(recent.iter().copied())) else {
        return found;
    };

    if avg_hours < SLEEP_GOAL_HOURS {
        found.push(Insight::ShortSleep { avg_hours });
    }

    for weekday in WEEKDAYS {
        let bedtimes: Vec<f64> = recent
            .iter()
            .filter(|r| r.date.weekday() == weekday)
            .filter_map(|r| r.bedtime_hours())
            .collect();
        if bedtimes.len() < MIN_WEEKDAY_BEDTIMES {
            continue;
        }
        if let Some(avg_bedtime) = mean(&bedtimes).filter(|avg| *avg > LATE_BEDTIME_HOURS) {
            found.push(Insight::LateBedtime {
                weekday,
                avg_bedtime,
            });
        }
    }

    let deep: Vec<f64> = recent.iter().filter_map(|r| r.deep_hours()).collect();
    if deep.len() >= MIN_DEEP_SLEEP_SAMPLES {
        let (first_half, second_half) = deep.split_at(deep.len() / 2);
        if let (Some(from), Some(to)) = (mean(first_half), mean(second_half)) {
            if to < from * (1.0 - DEEP_SLEEP_TREND_RATIO) {
                found.push(Insight::DeepSleepDeclining { from, to });
            } else if to > from * (1.0 + DEEP_SLEEP_TREND_RATIO) {
                found.push(Insight::DeepSleepImproving { from, to });
            }
        }
    }

    let low_days = recent
        .iter()
        .filter_map(|r| r.score())
        .filter(|score| *score < LOW_SCORE_THRESHOLD)
        .count();
    if low_days >= LOW_SCORE_DAYS_TRIGGER {
        found.push(Insight::LowScores { days: low_days });
    }

    found
}

fn streak(slept: &[&DailyRecord]) -> usize {
    let mut newest_first: Vec<&DailyRecord> = slept.to_vec();
    newest_first.sort_by(|a, b| b.date.cmp(&a.date));
    newest_first
        .iter()
        .take_while(|r| r.sleep_hours.is_some_and(|h| h >= SLEEP_GOAL_HOURS))
        .count()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_two_day_week_average_and_best_day() {
        let records = vec![
            with_steps(scored(date(2026, 2, 1), 7.5, 88), 8000),
            sleep(date(2026, 2, 2), 6.0),
        ];

        let report = SleepReport::build(&records, date(2026, 2, 2));
        let weekly = report.weekly.unwrap();

        assert_eq!(weekly.avg_hours, 6.75);
        assert_eq!(weekly.days, 2);
        assert_eq!(weekly.best_day, date(2026, 2, 1));
        assert_eq!(weekly.worst_day, date(2026, 2, 1));
        assert_eq!(weekly.avg_score, Some(88.0));
        assert_eq!(weekly.vs_last_week, None);
    }

    #[test]
    fn test_worst_day_treats_missing_score_as_100() {
        let records = vec![
            scored(date(2026, 2, 1), 7.0, 95),
            sleep(date(2026, 2, 2), 7.0),
            scored(date(2026, 2, 3), 7.0, 70),
        ];
        let weekly = SleepReport::build(&records, date(2026, 2, 3)).weekly.unwrap();
        assert_eq!(weekly.best_day, date(2026, 2, 1));
        assert_eq!(weekly.worst_day, date(2026, 2, 3));
    }

    #[test]
    fn test_vs_last_week() {
        let records = vec![
            sleep(date(2026, 1, 25), 6.0),
            sleep(date(2026, 1, 26), 8.0),
            sleep(date(2026, 2, 2), 7.5),
        ];
        let weekly = SleepReport::build(&records, date(2026, 2, 2)).weekly.unwrap();
        // Window is 01-27..02-02; the preceding week holds both January nights
        assert_eq!(weekly.days, 1);
        assert_eq!(weekly.vs_last_week, Some(0.5));
    }

    #[test]
    fn test_empty_week_has_no_block() {
        let records = vec![sleep(date(2026, 1, 1), 7.0)];
        let report = SleepReport::build(&records, date(2026, 2, 2));
        assert!(report.weekly.is_none());
    }

    #[test]
    fn test_monthly_comparison_requires_both_months() {
        let only_this = vec![sleep(date(2026, 2, 1), 7.0)];
        assert!(SleepReport::build(&only_this, date(2026, 2, 2))
            .monthly_comparison
            .is_none());

        let records = vec![
            scored(date(2026, 1, 10), 6.0, 80),
            sleep(date(2026, 1, 11), 7.0),
            with_deep(scored(date(2026, 2, 1), 8.0, 90), 1.5),
        ];
        let comparison = SleepReport::build(&records, date(2026, 2, 2))
            .monthly_comparison
            .unwrap();

        assert_eq!(comparison.last_month.to_string(), "2026-01");
        assert_eq!(comparison.hours.last, 6.5);
        assert_eq!(comparison.hours.diff, 1.5);
        assert_eq!(comparison.score.unwrap().diff, 10.0);
        assert!(comparison.deep_hours.is_none());
    }

    #[test]
    fn test_short_sleep_and_low_score_insights() {
        let today = date(2026, 2, 28);
        let records: Vec<DailyRecord> = (1..=6)
            .map(|day| scored(date(2026, 2, day), 6.0, 70))
            .collect();

        let insights = SleepReport::build(&records, today).insights;

        assert!(insights.contains(&Insight::ShortSleep { avg_hours: 6.0 }));
        assert!(insights.contains(&Insight::LowScores { days: 6 }));
    }

    #[test]
    fn test_late_bedtime_needs_two_samples() {
        // 2026-02-02 and 2026-02-09 are Mondays
        let records = vec![
            with_bedtime(sleep(date(2026, 2, 2), 7.0), 0, 30),
            with_bedtime(sleep(date(2026, 2, 9), 7.0), 23, 50),
            with_bedtime(sleep(date(2026, 2, 3), 7.0), 1, 0),
        ];

        let insights = SleepReport::build(&records, date(2026, 2, 10)).insights;

        assert_eq!(insights.len(), 1);
        match &insights[0] {
            Insight::LateBedtime {
                weekday,
                avg_bedtime,
            } => {
                assert_eq!(*weekday, Weekday::Mon);
                assert!((avg_bedtime - 24.166).abs() < 0.01);
            }
            other => panic!("Unexpected insight {:?}", other),
        }
        assert_eq!(insights[0].to_string(), "Average bedtime on Monday is late (0:10)");
    }

    #[test]
    fn test_deep_sleep_trend() {
        let records: Vec<DailyRecord> = (1..=14)
            .map(|day| {
                let deep = if day <= 7 { 2.0 } else { 1.0 };
                with_deep(sleep(date(2026, 2, day), 7.0), deep)
            })
            .collect();

        let insights = SleepReport::build(&records, date(2026, 2, 14)).insights;
        assert_eq!(
            insights,
            vec![Insight::DeepSleepDeclining { from: 2.0, to: 1.0 }]
        );
    }

    #[test]
    fn test_streak_stops_at_first_short_night() {
        let records = vec![
            sleep(date(2026, 2, 1), 8.0),
            sleep(date(2026, 2, 2), 6.5),
            sleep(date(2026, 2, 3), 7.0),
            sleep(date(2026, 2, 5), 7.2),
        ];
        assert_eq!(SleepReport::build(&records, date(2026, 2, 5)).streak_7h, 2);
        assert_eq!(SleepReport::build(&[], date(2026, 2, 5)).streak_7h, 0);
    }

    #[test]
    fn test_report_is_deterministic() {
        let records = vec![
            scored(date(2026, 2, 1), 7.5, 88),
            sleep(date(2026, 2, 2), 6.0),
        ];
        let first = SleepReport::build(&records, date(2026, 2, 2));
        let second = SleepReport::build(&records, date(2026, 2, 2));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
