//! The month-over-month trend report.

use super::{footer, generated_now, write_report};
use crate::config::Config;
use crate::constants::MONTHLY_TREND_SUBDIR;
use crate::errors::AppResult;
use crate::journal_core::DailyRecord;
use crate::stats::trend::{Direction, Metric, MetricDelta, MonthlyTrend};
use crate::stats::YearMonth;
use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::info;

const SECTIONS: [(&str, &[Metric]); 4] = [
    (
        "Sleep",
        &[
            Metric::SleepHours,
            Metric::SleepScore,
            Metric::SevenHourRate,
            Metric::DeepSleep,
        ],
    ),
    ("Exercise", &[Metric::ExerciseDays, Metric::ExerciseRate]),
    ("Steps", &[Metric::AverageSteps]),
    ("Reading", &[Metric::BooksFinished, Metric::BooksTouched]),
];

fn precision(metric: Metric) -> usize {
    match metric {
        Metric::SleepHours | Metric::SleepScore | Metric::DeepSleep => 1,
        _ => 0,
    }
}

fn value(metric: Metric, value: Option<f64>) -> String {
    value.map_or_else(
        || "-".to_string(),
        |v| format!("{:.*}{}", precision(metric), v, metric.unit()),
    )
}

fn change(metric: Metric, delta: &MetricDelta) -> String {
    let Some(diff) = delta.change else {
        return "-".to_string();
    };
    let icon = match delta.direction {
        Direction::Improved => "🟢",
        Direction::Declined => "🔴",
        Direction::Unchanged | Direction::NoComparison => "⚪",
    };
    let sign = if diff > 0.0 { "+" } else { "" };
    let mut text = format!(
        "{} {}{:.*}{}",
        icon,
        sign,
        precision(metric).max(1),
        diff,
        metric.unit()
    );
    if let Some(percent) = delta.percent {
        text.push_str(&format!(" ({}{:.0}%)", sign, percent));
    }
    text
}

/// Renders the trend report.
pub fn render_monthly_trend(trend: &MonthlyTrend, generated_at: NaiveDateTime) -> String {
    let month = trend.current.month;
    let mut md = format!(
        "---\ntags: [monthly-trend, generated]\nmonth: {month}\n---\n\n# Monthly trend {month}\n"
    );
    match &trend.previous {
        Some(previous) => {
            md.push_str(&format!("> **{}** vs **{}**\n\n", month, previous.month));
        }
        None => {
            md.push_str(&format!("> **{}** (no earlier month to compare)\n\n", month));
        }
    }

    for (title, metrics) in SECTIONS {
        let rows: Vec<&(Metric, MetricDelta)> = trend
            .rows
            .iter()
            .filter(|(metric, _)| metrics.contains(metric))
            .collect();
        if rows.is_empty() {
            continue;
        }
        md.push_str(&format!(
            "## {}\n\n| Metric | This month | Last month | Change |\n|------|------|------|------|\n",
            title
        ));
        for (metric, delta) in rows {
            md.push_str(&format!(
                "| {} | **{}** | {} | {} |\n",
                metric.label(),
                value(*metric, delta.current),
                value(*metric, delta.previous),
                change(*metric, delta)
            ));
        }
        md.push('\n');
    }

    if !trend.current.reading.finished_titles.is_empty() {
        md.push_str("### Finished this month\n");
        for title in &trend.current.reading.finished_titles {
            md.push_str(&format!("- {}\n", title));
        }
        md.push('\n');
    }

    if let Some(verdict) = &trend.verdict {
        md.push_str("## Overall\n\n");
        let line = match verdict.overall() {
            Direction::Improved => format!(
                "🟢 **Improving overall**: {} metrics up, {} down",
                verdict.improved, verdict.declined
            ),
            Direction::Declined => format!(
                "🔴 **Slightly down**: {} metrics down, {} up",
                verdict.declined, verdict.improved
            ),
            Direction::Unchanged | Direction::NoComparison => {
                "⚪ **Flat**: no major change".to_string()
            }
        };
        md.push_str(&format!("{}\n\n", line));
    }

    md.push_str(&footer(generated_at));
    md
}

/// Writes `monthly-trend/monthly-trend_<YYYY-MM>.md` for `target`, or for the
/// latest month in the corpus.
///
/// # Errors
///
/// Returns `AppError::Report` when the month has no records.
pub fn generate_monthly_trend(
    config: &Config,
    records: &[DailyRecord],
    target: Option<YearMonth>,
) -> AppResult<(MonthlyTrend, PathBuf)> {
    let trend = MonthlyTrend::build(records, target)?;
    let month = trend.current.month;
    info!(
        "Monthly trend for {} against {}",
        month,
        trend
            .previous
            .as_ref()
            .map_or_else(|| "nothing".to_string(), |p| p.month.to_string())
    );

    let path = config
        .vault_dir
        .join(MONTHLY_TREND_SUBDIR)
        .join(format!("monthly-trend_{}.md", month));
    write_report(&path, &render_monthly_trend(&trend, generated_now()))?;
    info!("Monthly trend written: {}", path.display());
    Ok((trend, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::journal_core::BookMention;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn record(y: i32, m: u32, d: u32, hours: f64) -> DailyRecord {
        let mut record = DailyRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        record.sleep_hours = Some(hours);
        record
    }

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_render_with_previous_month() {
        let mut finished = record(2026, 2, 10, 8.0);
        finished.books.push(BookMention {
            title: "Book A - Author".to_string(),
            finished: true,
        });
        let records = vec![record(2026, 1, 10, 6.0), finished];
        let trend = MonthlyTrend::build(&records, None).unwrap();

        let md = render_monthly_trend(&trend, generated());

        assert!(md.contains("# Monthly trend 2026-02\n> **2026-02** vs **2026-01**"));
        assert!(md.contains("| Average sleep | **8.0h** | 6.0h | 🟢 +2.0h (+33%) |"));
        assert!(md.contains("### Finished this month\n- Book A\n"));
        assert!(md.contains("## Overall"));
        assert!(md.ends_with("*Generated: 2026-03-01 09:00*\n"));
    }

    #[test]
    fn test_render_without_previous_month() {
        let trend = MonthlyTrend::build(&[record(2026, 2, 10, 7.0)], None).unwrap();
        let md = render_monthly_trend(&trend, generated());

        assert!(md.contains("(no earlier month to compare)"));
        assert!(md.contains("| Average sleep | **7.0h** | - | - |"));
        assert!(!md.contains("## Overall"));
    }

    #[test]
    fn test_generate_writes_into_trend_directory() {
        let dir = tempdir().unwrap();
        let config = Config::for_vault(dir.path().to_path_buf(), dir.path().join("journal"));

        let (_, path) =
            generate_monthly_trend(&config, &[record(2026, 2, 10, 7.0)], None).unwrap();

        assert_eq!(
            path,
            dir.path().join("monthly-trend").join("monthly-trend_2026-02.md")
        );
        assert!(fs::read_to_string(&path).unwrap().contains("2026-02"));
    }

    #[test]
    fn test_unknown_month_is_report_error() {
        let dir = tempdir().unwrap();
        let config = Config::for_vault(dir.path().to_path_buf(), dir.path().join("journal"));
        let target = YearMonth::new(2025, 12);

        let result = generate_monthly_trend(&config, &[record(2026, 2, 10, 7.0)], target);
        assert!(matches!(result, Err(AppError::Report(_))));
    }
}
