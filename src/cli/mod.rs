//! Command-line interface for lifelog.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::{AppError, AppResult};
use crate::journal_core::parse_date_arg;
use crate::stats::YearMonth;
use chrono::{Duration, NaiveDate};
use clap::{Parser, Subcommand};

/// Extracts sleep, exercise, step and reading facts from a daily journal and renders reports
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON],
        global = true
    )]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write the sleep report and the HTML dashboard
    Dashboard {
        /// Report date (YYYY-MM-DD or YYYYMMDD), defaults to today
        date: Option<String>,
    },

    /// Write the report for the calendar week before DATE
    Weekly {
        /// Reference date (YYYY-MM-DD or YYYYMMDD), defaults to today
        date: Option<String>,
    },

    /// Write the month-over-month trend report
    Monthly {
        /// Target month (YYYY-MM), defaults to the latest month in the journal
        month: Option<String>,
    },

    /// Write the sleep correlation analysis
    Analyze {
        /// Report date (YYYY-MM-DD or YYYYMMDD), defaults to today
        date: Option<String>,
    },

    /// List tracked books with their reading status
    Books,

    /// Copy tracker data and reading lines into the journal
    Sync {
        /// Entry date (YYYY-MM-DD or YYYYMMDD), defaults to yesterday
        date: Option<String>,

        /// Only update the reading note
        #[arg(long)]
        skip_tracker: bool,
    },

    /// Mark books as finished when the entry body says so
    FixReading {
        /// Report the fixes without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// Name used for the root tracing span.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Dashboard { .. } => "dashboard",
            Commands::Weekly { .. } => "weekly",
            Commands::Monthly { .. } => "monthly",
            Commands::Analyze { .. } => "analyze",
            Commands::Books => "books",
            Commands::Sync { .. } => "sync",
            Commands::FixReading { .. } => "fix-reading",
        }
    }

    /// The date the command runs for.
    ///
    /// Commands without a date argument, and dated commands given none,
    /// run for `today`; `sync` defaults to the day before.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` if the date argument cannot be parsed.
    pub fn resolve_date(&self, today: NaiveDate) -> AppResult<NaiveDate> {
        let (raw, default) = match self {
            Commands::Dashboard { date } | Commands::Weekly { date } | Commands::Analyze { date } => {
                (date.as_deref(), today)
            }
            Commands::Sync { date, .. } => (date.as_deref(), today - Duration::days(1)),
            Commands::Monthly { .. } | Commands::Books | Commands::FixReading { .. } => {
                (None, today)
            }
        };
        match raw {
            Some(raw) => parse_date_arg(raw)
                .map_err(|e| AppError::Journal(format!("Invalid date format '{}': {}", raw, e))),
            None => Ok(default),
        }
    }

    /// The month requested by `monthly`, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` if the month argument is not `YYYY-MM`.
    pub fn target_month(&self) -> AppResult<Option<YearMonth>> {
        match self {
            Commands::Monthly { month: Some(raw) } => YearMonth::parse(raw).map(Some),
            _ => Ok(None),
        }
    }
}

impl CliArgs {
    pub fn json_logs(&self) -> bool {
        self.log_format == LOG_FORMAT_JSON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["lifelog", "books"]);
        assert!(!args.verbose);
        assert_eq!(args.log_format, "text");
        assert!(!args.json_logs());
        assert_eq!(args.command, Commands::Books);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["lifelog", "dashboard", "-v", "--log-format", "json"]);
        assert!(args.verbose);
        assert!(args.json_logs());
        assert_eq!(args.command.name(), "dashboard");
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let result = CliArgs::try_parse_from(["lifelog", "--log-format", "xml", "books"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["lifelog"]).is_err());
    }

    #[test]
    fn test_date_formats() {
        let iso = CliArgs::parse_from(["lifelog", "weekly", "2026-01-15"]);
        let compact = CliArgs::parse_from(["lifelog", "weekly", "20260115"]);
        let expected = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        assert_eq!(iso.command.resolve_date(today()).unwrap(), expected);
        assert_eq!(compact.command.resolve_date(today()).unwrap(), expected);
    }

    #[test]
    fn test_default_dates() {
        let dashboard = CliArgs::parse_from(["lifelog", "dashboard"]);
        assert_eq!(dashboard.command.resolve_date(today()).unwrap(), today());

        let sync = CliArgs::parse_from(["lifelog", "sync"]);
        assert_eq!(
            sync.command.resolve_date(today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_is_journal_error() {
        let args = CliArgs::parse_from(["lifelog", "analyze", "not-a-date"]);
        let error = args.command.resolve_date(today()).unwrap_err();
        assert!(matches!(error, AppError::Journal(_)));
        assert!(error.to_string().contains("Invalid date format"));
    }

    #[test]
    fn test_sync_and_fix_reading_flags() {
        let sync = CliArgs::parse_from(["lifelog", "sync", "2026-02-01", "--skip-tracker"]);
        assert_eq!(
            sync.command,
            Commands::Sync {
                date: Some("2026-02-01".to_string()),
                skip_tracker: true
            }
        );

        let fix = CliArgs::parse_from(["lifelog", "fix-reading", "--dry-run"]);
        assert_eq!(fix.command, Commands::FixReading { dry_run: true });
        assert_eq!(fix.command.name(), "fix-reading");
    }

    #[test]
    fn test_target_month() {
        let latest = CliArgs::parse_from(["lifelog", "monthly"]);
        assert_eq!(latest.command.target_month().unwrap(), None);

        let explicit = CliArgs::parse_from(["lifelog", "monthly", "2026-01"]);
        assert_eq!(
            explicit.command.target_month().unwrap(),
            YearMonth::new(2026, 1)
        );

        let invalid = CliArgs::parse_from(["lifelog", "monthly", "2026-1"]);
        assert!(invalid.command.target_month().is_err());
    }
}
