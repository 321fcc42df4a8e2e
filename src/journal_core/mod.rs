//! Core journal parsing without I/O operations.
//!
//! This module turns the text of one daily note into a [`DailyRecord`]. It is
//! split by concern:
//!
//! - `frontmatter`: the flat `key: value` block at the top of a note
//! - `section`: locating the reading section
//! - `fields`: independent extractors for sleep, steps, exercise and books
//! - `record`: the record type and the builder combining the extractors
//!
//! Nothing here touches the filesystem; the corpus loader in `journal_io`
//! feeds it file contents.

mod fields;
mod frontmatter;
mod record;
mod section;

use crate::constants;
use chrono::NaiveDate;

pub use fields::{
    extract_steps, first_number, inline_field, normalize_digits, parse_book_line,
    parse_duration, parse_exercise, parse_mood, parse_reading, parse_sleep_detail, parse_steps,
    parse_time_range, parse_weather,
};
pub use frontmatter::parse_frontmatter;
pub use record::{
    build_record, date_from_filename, short_title, BookMention, DailyRecord, ExerciseKind,
    SleepDetail,
};
pub use section::{extract_section, is_section_end, is_section_start, section_bounds};

/// Parses a date given on the command line in YYYY-MM-DD or YYYYMMDD format.
///
/// # Errors
///
/// Returns `chrono::ParseError` if the string matches neither format.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::parse_date_arg;
///
/// let iso = parse_date_arg("2026-02-01").unwrap();
/// let compact = parse_date_arg("20260201").unwrap();
/// assert_eq!(iso, compact);
/// assert!(parse_date_arg("yesterday").is_err());
/// ```
pub fn parse_date_arg(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_COMPACT))
}

/// Journal file name for a date, as written by the sync operations.
pub fn entry_file_name(date: NaiveDate) -> String {
    format!(
        "{}.{}",
        date.format(constants::DATE_FORMAT_ISO),
        constants::JOURNAL_FILE_EXTENSION
    )
}
