//! Error handling utilities for the lifelog application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Missing or malformed journal fields are never errors: extractors return `None`
//! and the record simply omits the field. Only conditions that would corrupt or
//! silently skew a report surface here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures talking to the external fitness tracker.
///
/// Callers treat these as recoverable: the affected day is reported as having
/// no tracker data and the rest of the run continues.
///
/// # Examples
///
/// ```
/// use lifelog::errors::TrackerError;
///
/// let error = TrackerError::InvalidResponse("HTTP 500: boom".to_string());
/// assert!(format!("{}", error).contains("HTTP 500"));
/// ```
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker API could not be reached.
    #[error("Fitness tracker API error: {0}. Check LIFELOG_TRACKER_URL and your network connection.")]
    Offline(#[source] reqwest::Error),

    /// The tracker answered with something we could not use.
    #[error("Invalid response from fitness tracker: {0}")]
    InvalidResponse(String),
}

/// Represents all possible errors that can occur in the lifelog application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use lifelog::errors::AppError;
///
/// let error = AppError::Config("Missing journal directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing journal directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use lifelog::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal-level logic (e.g., invalid date or month arguments).
    #[error("Journal logic error: {0}")]
    Journal(String),

    /// A recognized journal document could not be read.
    ///
    /// This is fatal for the run: a partially loaded corpus would skew every
    /// downstream statistic.
    #[error("Failed to read journal entry {path}: {source}. No reports were generated.")]
    Corpus {
        /// The journal document that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A report or amended journal file could not be written.
    #[error("Failed to write {path}: {source}. The output was not generated.")]
    Output {
        /// The file that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A report could not be produced from the available data or templates.
    #[error("Report error: {0}")]
    Report(String),

    /// Errors from the fitness tracker client.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use lifelog::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let app_io_error = AppError::Io(io_error);
        assert_eq!(format!("{}", app_io_error), "I/O error: permission denied");

        let journal_error = AppError::Journal("Invalid date".to_string());
        assert_eq!(
            format!("{}", journal_error),
            "Journal logic error: Invalid date"
        );

        let report_error = AppError::Report("template missing".to_string());
        assert_eq!(format!("{}", report_error), "Report error: template missing");
    }

    #[test]
    fn test_corpus_error_names_the_path() {
        let error = AppError::Corpus {
            path: PathBuf::from("/vault/journal/2026-02-01.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };

        let message = format!("{}", error);
        assert!(message.contains("/vault/journal/2026-02-01.md"));
        assert!(message.contains("permission denied"));
        assert!(message.contains("No reports were generated"));
    }

    #[test]
    fn test_output_error_source_chaining() {
        let error = AppError::Output {
            path: PathBuf::from("/vault/sleep-report.md"),
            source: io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        };

        let source = error.source().expect("output error should carry a source");
        assert_eq!(source.to_string(), "disk full");
        assert!(format!("{}", error).contains("/vault/sleep-report.md"));
    }

    #[test]
    fn test_tracker_error_conversion_to_app_error() {
        let tracker_error = TrackerError::InvalidResponse("missing totalSteps".to_string());
        let app_error: AppError = tracker_error.into();

        match &app_error {
            AppError::Tracker(TrackerError::InvalidResponse(msg)) => {
                assert_eq!(msg, "missing totalSteps");
            }
            _ => panic!("Expected AppError::Tracker variant"),
        }
        assert!(format!("{}", app_error).starts_with("Tracker error: "));
    }

    #[test]
    fn test_result_combinators() {
        let io_result: Result<(), io::Error> = Err(io::Error::other("test error"));
        let app_result: AppResult<()> = io_result.map_err(AppError::Io);

        match app_result {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), io::ErrorKind::Other);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }
}
