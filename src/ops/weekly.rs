//! The weekly report for the previous calendar week.

use super::{footer, generated_now, write_report};
use crate::config::Config;
use crate::errors::AppResult;
use crate::journal_core::DailyRecord;
use crate::stats::weekly::{NightSummary, WeeklySummary};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use tracing::{info, warn};

fn night_row(label: &str, night: &NightSummary) -> String {
    let score = night
        .score
        .map_or_else(|| "-".to_string(), |score| score.to_string());
    format!(
        "| {} | {} ({:.1}h, score {}) |\n",
        label, night.date, night.hours, score
    )
}

fn or_dash(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

/// Renders the weekly report.
pub fn render_weekly_report(summary: &WeeklySummary, generated_at: NaiveDateTime) -> String {
    let (start, end) = summary.window;
    let mut md = format!(
        "---\ntags: [weekly-report, generated]\nweek: {week}\nyear: {year}\n---\n\n# Weekly report W{week}\n**{start} ~ {end}**\n\n",
        week = summary.week_number,
        year = summary.year,
    );

    md.push_str("## Sleep\n| Item | Value |\n|------|-----|\n");
    md.push_str(&format!("| Average sleep | **{}h** |\n", or_dash(summary.avg_hours, 1)));
    md.push_str(&format!("| Average score | **{}** |\n", or_dash(summary.avg_score, 1)));
    md.push_str(&format!(
        "| Nights with 7h+ | {}/{} days |\n",
        summary.days_7h_plus, summary.days
    ));
    if let Some(best) = &summary.best {
        md.push_str(&night_row("Best", best));
    }
    if let Some(worst) = &summary.worst {
        md.push_str(&night_row("Worst", worst));
    }

    md.push_str(&format!(
        "\n## Exercise\n- Workouts: **{} days** / {} days\n",
        summary.exercise_days, summary.days
    ));
    md.push_str(&format!(
        "\n## Steps\n- Average: **{} steps** ({} days tracked)\n",
        or_dash(summary.avg_steps, 0),
        summary.step_days
    ));
    md.push_str(&format!(
        "\n## Reading\n- Books read: **{}**\n",
        summary.books_touched
    ));
    if !summary.finished.is_empty() {
        md.push_str("- Finished:\n");
        for title in &summary.finished {
            md.push_str(&format!("  - ✅ {}\n", title));
        }
    }

    md.push('\n');
    md.push_str(&footer(generated_at));
    md
}

/// Writes `weekly-report_W<ww>_<yyyy>.md` for the week before `today`.
///
/// Returns `Ok(None)` when that week has no records.
pub fn generate_weekly_report(
    config: &Config,
    records: &[DailyRecord],
    today: NaiveDate,
) -> AppResult<Option<(WeeklySummary, PathBuf)>> {
    let Some(summary) = WeeklySummary::build(records, today) else {
        warn!("No journal data for the week before {}", today);
        return Ok(None);
    };

    let path = config.vault_dir.join(format!(
        "weekly-report_W{:02}_{}.md",
        summary.week_number, summary.year
    ));
    write_report(&path, &render_weekly_report(&summary, generated_now()))?;
    info!("Weekly report written: {}", path.display());
    Ok(Some((summary, path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(on: NaiveDate, hours: f64) -> DailyRecord {
        let mut record = DailyRecord::new(on);
        record.sleep_hours = Some(hours);
        record
    }

    #[test]
    fn test_render_weekly_report() {
        let summary = WeeklySummary::build(
            &[record(date(2026, 1, 27), 7.5), record(date(2026, 1, 28), 6.0)],
            date(2026, 2, 4),
        )
        .unwrap();
        let generated = date(2026, 2, 4).and_hms_opt(7, 0, 0).unwrap();

        let md = render_weekly_report(&summary, generated);

        assert!(md.contains("# Weekly report W5\n**2026-01-26 ~ 2026-02-01**"));
        assert!(md.contains("| Average sleep | **6.8h** |"));
        assert!(md.contains("| Average score | **-** |"));
        assert!(md.contains("| Nights with 7h+ | 1/2 days |"));
        assert!(md.contains("| Best | 2026-01-27 (7.5h, score -) |"));
        assert!(md.contains("- Average: **- steps** (0 days tracked)"));
        assert!(!md.contains("Finished:"));
    }

    #[test]
    fn test_generate_writes_week_numbered_file() {
        let dir = tempdir().unwrap();
        let config = Config::for_vault(dir.path().to_path_buf(), dir.path().join("journal"));

        let (_, path) =
            generate_weekly_report(&config, &[record(date(2026, 1, 27), 7.5)], date(2026, 2, 4))
                .unwrap()
                .unwrap();

        assert_eq!(path, dir.path().join("weekly-report_W05_2026.md"));
        assert!(fs::read_to_string(path).unwrap().contains("W5"));
    }

    #[test]
    fn test_empty_week_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = Config::for_vault(dir.path().to_path_buf(), dir.path().join("journal"));

        let result = generate_weekly_report(&config, &[], date(2026, 2, 4)).unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
