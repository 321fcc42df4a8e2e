//! The sleep report and the HTML dashboard pages.

use super::{footer, generated_now, to_json, write_report};
use crate::config::Config;
use crate::constants::{
    DASHBOARD_PAGE_FILE, DASHBOARD_TEMPLATE_FILE, DATE_FORMAT_ISO, PLACEHOLDER_DATA_JSON,
    PLACEHOLDER_READING_JSON, PLACEHOLDER_REPORT_JSON, PLACEHOLDER_SLEEP_JSON, SLEEP_PAGE_FILE,
    SLEEP_TEMPLATE_FILE, VAULT_DASHBOARD_FILE,
};
use crate::errors::{AppError, AppResult};
use crate::journal_core::DailyRecord;
use crate::stats::reading::ReadingSummary;
use crate::stats::sleep::SleepReport;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files written by one dashboard run.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutput {
    pub sleep_report: PathBuf,
    pub pages: Vec<PathBuf>,
}

fn arrow(diff: f64) -> &'static str {
    if diff > 0.0 {
        "↑"
    } else if diff < 0.0 {
        "↓"
    } else {
        "→"
    }
}

/// Renders the Markdown sleep report.
pub fn render_sleep_report(report: &SleepReport, generated_at: NaiveDateTime) -> String {
    let date = report.today.format(DATE_FORMAT_ISO);
    let mut md = format!(
        "---\ndate: {date}\ntype: sleep-report\ntags: [sleep, report, weekly]\n---\n\n# Sleep report {date}\n\n"
    );

    if let Some(weekly) = &report.weekly {
        md.push_str("## This week\n");
        md.push_str(&format!("- **Average sleep**: {:.2}h\n", weekly.avg_hours));
        if let Some(score) = weekly.avg_score {
            md.push_str(&format!("- **Average score**: {:.1}\n", score));
        }
        if let Some(diff) = weekly.vs_last_week {
            md.push_str(&format!("- **vs last week**: {} {:.1}h\n", arrow(diff), diff.abs()));
        }
        md.push_str(&format!("- **Best night**: {}\n", weekly.best_day));
        md.push('\n');
    }

    if let Some(mc) = &report.monthly_comparison {
        md.push_str("## Compared with last month\n");
        md.push_str(&format!("| Metric | {} | {} | Diff |\n", mc.last_month, mc.this_month));
        md.push_str("|---|---|---|---|\n");
        md.push_str(&format!(
            "| Average sleep | {:.2}h | {:.2}h | {:+.2}h |\n",
            mc.hours.last, mc.hours.this, mc.hours.diff
        ));
        if let Some(score) = &mc.score {
            md.push_str(&format!(
                "| Average score | {:.1} | {:.1} | {:+.1} |\n",
                score.last, score.this, score.diff
            ));
        }
        if let Some(deep) = &mc.deep_hours {
            md.push_str(&format!(
                "| Deep sleep | {:.2}h | {:.2}h | {:+.2}h |\n",
                deep.last, deep.this, deep.diff
            ));
        }
        md.push('\n');
    }

    if !report.insights.is_empty() {
        md.push_str("## Insights\n");
        for insight in &report.insights {
            md.push_str(&format!("- {}\n", insight));
        }
        md.push('\n');
    }

    if report.streak_7h > 0 {
        md.push_str("## Streak\n");
        md.push_str(&format!(
            "- Consecutive nights of 7h or more: **{} days**\n",
            report.streak_7h
        ));
        md.push('\n');
    }

    md.push_str(&footer(generated_at));
    md
}

/// Substitutes each placeholder in `template` with its value.
///
/// ```
/// use lifelog::ops::dashboard::fill_template;
///
/// let html = fill_template("<script>const d = __DATA_JSON__;</script>", &[("__DATA_JSON__", "[1]")]);
/// assert_eq!(html, "<script>const d = [1];</script>");
/// ```
pub fn fill_template(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |html, (placeholder, value)| {
            html.replace(placeholder, value)
        })
}

fn read_template(path: &Path) -> AppResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// Writes the sleep report, the dashboard pages and, when its template
/// exists, the sleep page.
///
/// # Errors
///
/// Returns `AppError::Report` when the dashboard template is missing and
/// `AppError::Output` when a file cannot be written. Nothing is written when
/// the dashboard template is missing.
pub fn generate_dashboard(
    config: &Config,
    records: &[DailyRecord],
    reading: &ReadingSummary,
    today: NaiveDate,
) -> AppResult<DashboardOutput> {
    info!("Generating dashboard for {} ({} records)", today, records.len());

    let template_path = config.template_dir.join(DASHBOARD_TEMPLATE_FILE);
    let template = read_template(&template_path)?.ok_or_else(|| {
        AppError::Report(format!(
            "Dashboard template not found: {}",
            template_path.display()
        ))
    })?;

    let report = SleepReport::build(records, today);
    let markdown = render_sleep_report(&report, generated_now());
    let sleep_report = config
        .vault_dir
        .join(format!("sleep-report_{}.md", today.format(DATE_FORMAT_ISO)));
    write_report(&sleep_report, &markdown)?;

    let data_json = to_json(records)?;
    let report_json = to_json(&report)?;
    let reading_json = to_json(reading)?;
    let html = fill_template(
        &template,
        &[
            (PLACEHOLDER_DATA_JSON, data_json.as_str()),
            (PLACEHOLDER_REPORT_JSON, report_json.as_str()),
            (PLACEHOLDER_READING_JSON, reading_json.as_str()),
        ],
    );

    let mut pages = vec![
        config.docs_dir.join(DASHBOARD_PAGE_FILE),
        config.vault_dir.join(VAULT_DASHBOARD_FILE),
    ];
    for page in &pages {
        write_report(page, &html)?;
    }

    let sleep_template_path = config.template_dir.join(SLEEP_TEMPLATE_FILE);
    match read_template(&sleep_template_path)? {
        Some(sleep_template) => {
            let sleep_records: Vec<&DailyRecord> = records
                .iter()
                .filter(|r| r.sleep_hours.is_some() || r.score().is_some())
                .collect();
            debug!("Sleep page covers {} records", sleep_records.len());
            let sleep_json = to_json(&sleep_records)?;
            let sleep_html =
                fill_template(&sleep_template, &[(PLACEHOLDER_SLEEP_JSON, sleep_json.as_str())]);
            let sleep_page = config.docs_dir.join(SLEEP_PAGE_FILE);
            write_report(&sleep_page, &sleep_html)?;
            pages.push(sleep_page);
        }
        None => warn!(
            "Sleep template not found, skipping sleep page: {}",
            sleep_template_path.display()
        ),
    }

    info!("Dashboard written: {} pages", pages.len());
    Ok(DashboardOutput {
        sleep_report,
        pages,
    })
}
