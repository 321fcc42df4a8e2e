//! The sleep correlation report.

use super::{footer, generated_now, write_report};
use crate::config::Config;
use crate::constants::{CORRELATION_REPORT_FILE, DATE_FORMAT_ISO};
use crate::errors::AppResult;
use crate::journal_core::DailyRecord;
use crate::stats::correlation::CorrelationReport;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use tracing::info;

/// Renders the findings in impact order.
pub fn render_correlation_report(
    report: &CorrelationReport,
    today: NaiveDate,
    generated_at: NaiveDateTime,
) -> String {
    let mut md = format!(
        "---\ntags: [self-analysis, sleep, correlation]\ngenerated: {}\n---\n\n# Sleep correlation analysis\n\n",
        today.format(DATE_FORMAT_ISO)
    );
    md.push_str(&format!(
        "> What affects your sleep most, from **{} days** of data\n> (score data from {} days is used as a supplement)\n\n## Findings by impact\n\n",
        report.sleep_days, report.scored_days
    ));

    if report.findings.is_empty() {
        md.push_str("Not enough sleep data for any finding yet.\n\n");
    }
    for (rank, finding) in report.findings.iter().enumerate() {
        md.push_str(&format!("### {}. {}\n\n{}\n\n", rank + 1, finding.title, finding.insight));
        if !finding.detail.is_empty() {
            md.push_str(&format!("_{}_\n\n", finding.detail));
        }
        md.push_str(&format!("**💡 {}**\n\n---\n\n", finding.recommendation));
    }

    md.push_str(&footer(generated_at));
    md
}

/// Writes `sleep-correlation.md` into the vault.
pub fn generate_correlation_report(
    config: &Config,
    records: &[DailyRecord],
    today: NaiveDate,
) -> AppResult<(CorrelationReport, PathBuf)> {
    let report = CorrelationReport::build(records);
    info!(
        "Correlation analysis over {} nights: {} findings",
        report.sleep_days,
        report.findings.len()
    );

    let path = config.vault_dir.join(CORRELATION_REPORT_FILE);
    write_report(
        &path,
        &render_correlation_report(&report, today, generated_now()),
    )?;
    info!("Correlation report written: {}", path.display());
    Ok((report, path))
}
