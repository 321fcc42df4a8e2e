//! The per-day record assembled from one journal document.

use super::fields::{extract_steps, parse_exercise, parse_reading, parse_sleep_detail};
use super::frontmatter::parse_frontmatter;
use super::section::extract_section;
use crate::constants::{DATE_FORMAT_ISO, SLEEP_HOURS_KEY, TITLE_AUTHOR_SEPARATOR};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Length of the `YYYY-MM-DD` prefix of a journal file name.
const DATE_PREFIX_LEN: usize = 10;

/// Kinds of bodyweight exercise counted in the frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Squat,
    Abs,
    Pushup,
}

impl ExerciseKind {
    /// Human readable name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squats",
            ExerciseKind::Abs => "sit-ups",
            ExerciseKind::Pushup => "push-ups",
        }
    }
}

/// Sleep tracker details written in the body of a note.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SleepDetail {
    /// Tracker sleep score, 0-100.
    pub score: Option<u8>,
    pub deep_hours: Option<f64>,
    pub light_hours: Option<f64>,
    pub rem_hours: Option<f64>,
    pub awake_hours: Option<f64>,
    #[serde(with = "clock")]
    pub bedtime: Option<NaiveTime>,
    #[serde(with = "clock")]
    pub waketime: Option<NaiveTime>,
    pub weather: Option<String>,
    pub mood: Option<String>,
}

impl SleepDetail {
    /// True when no detail at all was recorded.
    pub fn is_empty(&self) -> bool {
        *self == SleepDetail::default()
    }
}

/// A book mentioned in a reading section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMention {
    pub title: String,
    pub finished: bool,
}

impl BookMention {
    /// The title without its ` - Author` suffix.
    pub fn short_title(&self) -> &str {
        short_title(&self.title)
    }
}

/// Strips the ` - Author` suffix from a note title.
pub fn short_title(title: &str) -> &str {
    title
        .split(TITLE_AUTHOR_SEPARATOR)
        .next()
        .unwrap_or(title)
}

/// Everything extracted from the journal for one calendar day.
///
/// Records are built once per document and never modified afterwards; the
/// statistics borrow them as slices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Total sleep in hours from the `sleep` frontmatter key.
    pub sleep_hours: Option<f64>,
    pub sleep_detail: Option<SleepDetail>,
    pub steps: Option<u64>,
    pub exercise: Option<BTreeMap<ExerciseKind, u32>>,
    pub books: Vec<BookMention>,
}

impl DailyRecord {
    /// An empty record for `date`.
    pub fn new(date: NaiveDate) -> Self {
        DailyRecord {
            date,
            sleep_hours: None,
            sleep_detail: None,
            steps: None,
            exercise: None,
            books: Vec::new(),
        }
    }

    /// True if at least one fact was extracted.
    pub fn has_data(&self) -> bool {
        self.sleep_hours.is_some()
            || self.sleep_detail.is_some()
            || self.steps.is_some()
            || self.exercise.is_some()
            || !self.books.is_empty()
    }

    pub fn score(&self) -> Option<u8> {
        self.sleep_detail.as_ref().and_then(|detail| detail.score)
    }

    pub fn deep_hours(&self) -> Option<f64> {
        self.sleep_detail.as_ref().and_then(|detail| detail.deep_hours)
    }

    pub fn bedtime(&self) -> Option<NaiveTime> {
        self.sleep_detail.as_ref().and_then(|detail| detail.bedtime)
    }

    /// Bedtime as decimal hours where times before noon count as past
    /// midnight, so 00:30 becomes 24.5.
    pub fn bedtime_hours(&self) -> Option<f64> {
        self.bedtime().map(|time| {
            let hour = f64::from(time.hour());
            let hour = if time.hour() < 12 { hour + 24.0 } else { hour };
            hour + f64::from(time.minute()) / 60.0
        })
    }

    pub fn mood(&self) -> Option<&str> {
        self.sleep_detail
            .as_ref()
            .and_then(|detail| detail.mood.as_deref())
    }

    /// True if any exercise label was filled in, even with a zero count.
    pub fn has_exercise(&self) -> bool {
        self.exercise.is_some()
    }

    /// Step count, ignoring zero readings.
    pub fn tracked_steps(&self) -> Option<u64> {
        self.steps.filter(|steps| *steps > 0)
    }

    pub fn has_books(&self) -> bool {
        !self.books.is_empty()
    }
}

/// Serializes clock times as `HH:MM`, matching how they are written in the
/// journal.
mod clock {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

/// Extracts the date from a journal file name.
///
/// The name must start with `YYYY-MM-DD` forming a valid calendar date;
/// anything may follow.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::date_from_filename;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     date_from_filename("2026-02-01 Sunday.md"),
///     NaiveDate::from_ymd_opt(2026, 2, 1)
/// );
/// assert_eq!(date_from_filename("2026-02-30.md"), None);
/// assert_eq!(date_from_filename("notes.md"), None);
/// ```
pub fn date_from_filename(name: &str) -> Option<NaiveDate> {
    let prefix = name.get(..DATE_PREFIX_LEN)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT_ISO).ok()
}

/// Builds the record for one document.
///
/// Each extractor runs independently, so a malformed field never affects
/// the others.
pub fn build_record(date: NaiveDate, text: &str) -> DailyRecord {
    let frontmatter = parse_frontmatter(text);
    let lines: Vec<&str> = text.lines().collect();

    DailyRecord {
        date,
        sleep_hours: frontmatter
            .get(SLEEP_HOURS_KEY)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|hours| hours.is_finite() && *hours > 0.0),
        sleep_detail: parse_sleep_detail(text),
        steps: extract_steps(text),
        exercise: parse_exercise(&frontmatter),
        books: extract_section(&lines)
            .map(|section| parse_reading(&section))
            .unwrap_or_default(),
    }
}
