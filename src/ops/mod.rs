//! High-level operations behind the lifelog subcommands.
//!
//! Each operation takes the loaded corpus (or the journal directory, for the
//! operations that amend notes), computes what it needs through `stats`, and
//! writes its output file. Rendering is kept in pure `render_*` functions so
//! the report text can be tested without touching disk.

pub mod analysis;
pub mod books;
pub mod dashboard;
pub mod monthly;
pub mod sync;
pub mod weekly;

// Re-export commonly used functions
pub use analysis::generate_correlation_report;
pub use books::{build_reading_summary, render_book_listing, returned_source};
pub use dashboard::{generate_dashboard, DashboardOutput};
pub use monthly::generate_monthly_trend;
pub use sync::{
    mark_finished_books, sync_reading_note, sync_runs, sync_steps, ReadingFix, SyncOutcome,
};
pub use weekly::generate_weekly_report;

use crate::constants::GENERATED_AT_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::journal_io::{ensure_directory_exists, write_atomic};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::path::Path;

/// Closing rule and generation timestamp shared by every Markdown report.
pub(crate) fn footer(generated_at: NaiveDateTime) -> String {
    format!(
        "---\n*Generated: {}*\n",
        generated_at.format(GENERATED_AT_FORMAT)
    )
}

pub(crate) fn generated_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Serializes report data for embedding in an HTML template.
///
/// `</` is written as `<\/` so a string value cannot close the surrounding
/// `<script>` element. Both spell the same JSON string.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Report(format!("Failed to serialize report data: {}", e)))?;
    Ok(json.replace("</", "<\\/"))
}

/// Writes a report, creating its directory first.
pub(crate) fn write_report(path: &Path, contents: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        ensure_directory_exists(parent)?;
    }
    write_atomic(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_footer_format() {
        let at = NaiveDate::from_ymd_opt(2026, 2, 4)
            .unwrap()
            .and_hms_opt(8, 30, 59)
            .unwrap();
        assert_eq!(footer(at), "---\n*Generated: 2026-02-04 08:30*\n");
    }

    #[test]
    fn test_write_report_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("report.md");

        write_report(&path, "# Report\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report\n");
    }

    #[test]
    fn test_write_report_rejects_relative_directory() {
        let result = write_report(Path::new("relative/report.md"), "x");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_to_json_of_slice() {
        assert_eq!(to_json(&[1, 2][..]).unwrap(), "[1,2]");
    }

    #[test]
    fn test_to_json_cannot_close_script_element() {
        let json = to_json(&["</script><script>alert(1)</script>"][..]).unwrap();

        assert!(!json.contains("</"));
        assert_eq!(json, r#"["<\/script><script>alert(1)<\/script>"]"#);
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["</script><script>alert(1)</script>"]);
    }
}
