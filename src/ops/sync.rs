//! Operations that amend journal files: tracker steps and runs, the running
//! reading note, and finished-book marks.
//!
//! Each amendment is split into a pure text transformation and a thin file
//! wrapper, so the transformations are tested without touching disk.

use crate::config::Config;
use crate::constants::{
    FIELD_SEPARATOR, FINISHED_ALT_MARKER, FINISHED_MARKER, MOOD_LABEL, PREVIOUSLY_FINISHED_MARKER,
    RUNNING_EMOJI, RUNNING_LABEL, STEPS_LABEL, STEPS_UNIT,
};
use crate::errors::AppResult;
use crate::journal_core::{entry_file_name, is_section_start, parse_book_line, section_bounds};
use crate::journal_io::{read_entry, write_atomic, CorpusLoader};
use crate::tracker::{Activity, DailySummary, FitnessTracker};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, info, warn};

static FILLED_STEPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"歩数::\s*[0-9,]+\s*歩").expect("valid filled steps regex"));
static EMPTY_STEPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)歩数::[ \t]*$").expect("valid empty steps regex"));
static NOTE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([0-9]{4}-[0-9]{2}-[0-9]{2})\]\]").expect("valid note date regex")
});

/// Heading level that closes a reading section in the reading note copy.
const NOTE_SECTION_END: &str = "######";
/// Horizontal rule that also closes it.
const NOTE_RULE: &str = "---";
/// Separator inserted before a finished mark.
const FINISHED_SEPARATOR: &str = "\u{3000}";

/// Result of one amendment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The file was amended; the text says with what.
    Written(String),
    /// The value is already in the file.
    AlreadyPresent,
    /// No journal file exists for the date.
    MissingEntry,
    /// There was nothing to write.
    NoData,
}

/// A reading line that gained a finished mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingFix {
    pub date: NaiveDate,
    pub title: String,
    pub old_line: String,
    pub new_line: String,
}

/// Formats an integer with comma thousands separators.
///
/// ```
/// use lifelog::ops::sync::group_thousands;
///
/// assert_eq!(group_thousands(12345), "12,345");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Joins lines back, keeping the original trailing newline if there was one.
fn join_lines(lines: &[String], original: &str) -> String {
    let mut text = lines.join("\n");
    if original.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn owned_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Adds the step count to an entry.
///
/// Returns `None` when the entry already records steps or has a step field
/// that cannot be filled.
pub fn insert_steps(text: &str, steps: u64) -> Option<String> {
    if FILLED_STEPS_RE.is_match(text) {
        return None;
    }
    let field = format!("{}{}", STEPS_LABEL, FIELD_SEPARATOR);
    let line = format!("{} {}{}", field, group_thousands(steps), STEPS_UNIT);

    if text.contains(&field) {
        let filled = EMPTY_STEPS_RE.replace_all(text, line.as_str());
        return (filled != text).then(|| filled.into_owned());
    }

    let mood = format!("{}{}", MOOD_LABEL, FIELD_SEPARATOR);
    let mut lines = owned_lines(text);
    match lines.iter().position(|l| l.contains(&mood)) {
        Some(idx) => {
            lines.insert(idx + 1, line);
            Some(join_lines(&lines, text))
        }
        None => Some(format!("{}\n{}\n", text, line)),
    }
}

fn decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Formats a run as a journal line.
pub fn run_line(run: &Activity) -> String {
    let mut parts = vec![
        format!("{}km", decimal(run.distance_km())),
        format!("{}分", decimal(run.duration_min())),
    ];
    if let Some((min, sec)) = run.pace() {
        parts.push(format!("ペース{}'{:02}\"/km", min, sec));
    }
    if let Some(hr) = run.avg_hr.filter(|hr| *hr > 0) {
        parts.push(format!("❤️{}bpm", hr));
    }
    format!(
        "- {} {}{} {}",
        RUNNING_EMOJI,
        RUNNING_LABEL,
        FIELD_SEPARATOR,
        parts.join(" / ")
    )
}

/// Adds run lines after the steps line, before the reading section, or at
/// the end. Returns `None` when runs are already recorded or there are none.
pub fn insert_runs(text: &str, runs: &[&Activity]) -> Option<String> {
    let marker = format!("{}{}", RUNNING_LABEL, FIELD_SEPARATOR);
    if runs.is_empty() || text.contains(&marker) || text.contains(RUNNING_EMOJI) {
        return None;
    }
    let run_lines: Vec<String> = runs.iter().map(|run| run_line(run)).collect();

    let steps_field = format!("{}{}", STEPS_LABEL, FIELD_SEPARATOR);
    let mut lines = owned_lines(text);
    let at = lines
        .iter()
        .position(|l| l.contains(&steps_field))
        .map(|idx| idx + 1)
        .or_else(|| lines.iter().position(|l| is_section_start(l)));

    match at {
        Some(idx) => {
            lines.splice(idx..idx, run_lines);
            Some(join_lines(&lines, text))
        }
        None => Some(format!("{}\n{}\n", text.trim_end(), run_lines.join("\n"))),
    }
}

fn entry_path(config: &Config, date: NaiveDate) -> PathBuf {
    config.journal_dir.join(entry_file_name(date))
}

/// Fetches a day from the tracker, treating failures as no data.
fn fetch_summary(tracker: &dyn FitnessTracker, date: NaiveDate) -> Option<DailySummary> {
    match tracker.fetch_daily_summary(date) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Tracker unavailable for {}: {}", date, e);
            None
        }
    }
}

/// Writes the tracker's step count for `date` into its journal entry.
pub fn sync_steps(
    config: &Config,
    tracker: &dyn FitnessTracker,
    date: NaiveDate,
) -> AppResult<SyncOutcome> {
    let Some(steps) = fetch_summary(tracker, date).and_then(|s| s.steps) else {
        info!("No step data for {}", date);
        return Ok(SyncOutcome::NoData);
    };

    let path = entry_path(config, date);
    if !path.exists() {
        warn!("Journal entry not found: {}", path.display());
        return Ok(SyncOutcome::MissingEntry);
    }

    let text = read_entry(&path)?;
    match insert_steps(&text, steps) {
        Some(amended) => {
            write_atomic(&path, &amended)?;
            let detail = format!("{}{}", group_thousands(steps), STEPS_UNIT);
            info!("{}: wrote steps {}", date, detail);
            Ok(SyncOutcome::Written(detail))
        }
        None => {
            info!("{}: steps already recorded", date);
            Ok(SyncOutcome::AlreadyPresent)
        }
    }
}

/// Writes the tracker's runs for `date` into its journal entry.
pub fn sync_runs(
    config: &Config,
    tracker: &dyn FitnessTracker,
    date: NaiveDate,
) -> AppResult<SyncOutcome> {
    let Some(summary) = fetch_summary(tracker, date) else {
        return Ok(SyncOutcome::NoData);
    };
    let runs: Vec<&Activity> = summary.runs().collect();
    if runs.is_empty() {
        info!("No runs recorded for {}", date);
        return Ok(SyncOutcome::NoData);
    }

    let path = entry_path(config, date);
    if !path.exists() {
        warn!("Journal entry not found: {}", path.display());
        return Ok(SyncOutcome::MissingEntry);
    }

    let text = read_entry(&path)?;
    match insert_runs(&text, &runs) {
        Some(amended) => {
            write_atomic(&path, &amended)?;
            info!("{}: wrote {} runs", date, runs.len());
            Ok(SyncOutcome::Written(format!("{} run(s)", runs.len())))
        }
        None => {
            info!("{}: runs already recorded", date);
            Ok(SyncOutcome::AlreadyPresent)
        }
    }
}

/// Latest `[[YYYY-MM-DD]]` link in the reading note.
pub fn last_note_date(note: &str) -> Option<NaiveDate> {
    NOTE_DATE_RE
        .captures_iter(note)
        .filter_map(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
        .last()
}

/// Lines of an entry's reading section as copied into the reading note.
///
/// The copy stops at a `######` heading or a `---` rule and leaves out blank
/// lines and bare list markers.
pub fn reading_note_lines(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|line| !is_section_start(line))
        .skip(1)
        .take_while(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with(NOTE_SECTION_END) && trimmed != NOTE_RULE
        })
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && trimmed != "-"
        })
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Appends the reading sections of every entry after the note's last dated
/// block, up to and including `today`.
pub fn sync_reading_note(config: &Config, today: NaiveDate) -> AppResult<SyncOutcome> {
    let note_path = &config.reading_note_path;
    if !note_path.exists() {
        warn!("Reading note not found: {}", note_path.display());
        return Ok(SyncOutcome::NoData);
    }
    let note = read_entry(note_path)?;
    let Some(last) = last_note_date(&note) else {
        warn!("Reading note has no dated entries: {}", note_path.display());
        return Ok(SyncOutcome::NoData);
    };
    debug!("Reading note last entry: {}", last);

    let mut blocks = Vec::new();
    let mut date = last + Duration::days(1);
    while date <= today {
        let path = entry_path(config, date);
        if path.exists() {
            let lines = reading_note_lines(&read_entry(&path)?);
            if !lines.is_empty() {
                blocks.push(format!("\n[[{}]]\n{}", date, lines.join("\n")));
            }
        }
        date += Duration::days(1);
    }

    if blocks.is_empty() {
        info!("Reading note is up to date");
        return Ok(SyncOutcome::NoData);
    }

    let updated = format!("{}\n{}\n", note.trim_end(), blocks.join("\n"));
    write_atomic(note_path, &updated)?;
    info!("Added {} days to the reading note", blocks.len());
    Ok(SyncOutcome::Written(format!("{} days", blocks.len())))
}

/// True if a line outside the reading section says the book was finished.
fn finished_in_body(lines: &[String], title: &str, section: (usize, usize)) -> bool {
    lines.iter().enumerate().any(|(i, line)| {
        let in_section = i >= section.0 && i < section.1;
        !in_section
            && line.contains(title)
            && (line.contains(FINISHED_MARKER) || line.contains(FINISHED_ALT_MARKER))
            && !line.contains(PREVIOUSLY_FINISHED_MARKER)
    })
}

/// Marks reading lines as finished when the body of the entry says so.
///
/// Returns the amended text and `(title, old_line, new_line)` per fix.
pub fn mark_finished_in_text(text: &str) -> (String, Vec<(String, String, String)>) {
    let mut lines = owned_lines(text);
    let refs: Vec<&str> = text.lines().collect();
    let Some((start, end)) = section_bounds(&refs) else {
        return (text.to_string(), Vec::new());
    };
    // The sentinel line itself may carry a book link
    let section = (start - 1, end);

    let mut fixes = Vec::new();
    for i in section.0..section.1 {
        let Some(book) = parse_book_line(&lines[i]) else {
            continue;
        };
        if book.finished || !finished_in_body(&lines, &book.title, section) {
            continue;
        }
        let old_line = lines[i].clone();
        let marked = format!("]]{}{}", FINISHED_SEPARATOR, FINISHED_MARKER);
        let new_line = old_line.replacen("]]", &marked, 1);
        lines[i] = new_line.clone();
        fixes.push((book.title, old_line, new_line));
    }

    if fixes.is_empty() {
        return (text.to_string(), fixes);
    }
    (join_lines(&lines, text), fixes)
}

/// Adds missing finished marks across the corpus.
///
/// With `dry_run` the fixes are only reported.
pub fn mark_finished_books(config: &Config, dry_run: bool) -> AppResult<Vec<ReadingFix>> {
    let loader = CorpusLoader::new(config);
    let mut all_fixes = Vec::new();

    for file in loader.list_files()? {
        let text = read_entry(&file.path)?;
        let (amended, fixes) = mark_finished_in_text(&text);
        if fixes.is_empty() {
            continue;
        }
        for (title, old_line, new_line) in fixes {
            info!("{}: marking {} as finished", file.date, title);
            all_fixes.push(ReadingFix {
                date: file.date,
                title,
                old_line,
                new_line,
            });
        }
        if !dry_run {
            write_atomic(&file.path, &amended)?;
        }
    }

    info!(
        "{} reading lines fixed{}",
        all_fixes.len(),
        if dry_run { " (dry run)" } else { "" }
    );
    Ok(all_fixes)
}
