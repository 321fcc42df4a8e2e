//! Independent extractors for the facts recorded in a daily note.
//!
//! Every extractor is a pure function that returns `None` when its fact is
//! missing or malformed. None of them fail.

use super::record::{BookMention, ExerciseKind, SleepDetail};
use super::section::is_section_start;
use crate::constants::{
    FIELD_SEPARATOR, FINISHED_MARKER, HEADING_PREFIX, MOOD_LABEL, STEPS_LABEL, WEATHER_LABEL,
};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

static HOURS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*時間").expect("valid hours regex"));
static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*分").expect("valid minutes regex"));
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"睡眠スコア[：:]?\s*([0-9]+)").expect("valid score regex"));
static LABELED_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"就寝\s*([0-9]{1,2}:[0-9]{2})\s*[〜~～]\s*起床\s*([0-9]{1,2}:[0-9]{2})")
        .expect("valid labeled time range regex")
});
static BARE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2}:[0-9]{2})\s*[〜~～]\s*([0-9]{1,2}:[0-9]{2})")
        .expect("valid time range regex")
});
static STEPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\s*歩").expect("valid steps regex"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid number regex"));
static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.+?)(?:\|.+?)?\]\]").expect("valid wiki-link regex"));
static STAGE_RES: Lazy<HashMap<Stage, Regex>> = Lazy::new(|| {
    [Stage::Deep, Stage::Light, Stage::Rem, Stage::Awake]
        .into_iter()
        .map(|stage| {
            let pattern = format!(r"{}\s*([0-9時間分]+)", stage.anchor());
            (stage, Regex::new(&pattern).expect("valid sleep stage regex"))
        })
        .collect()
});

/// Characters that end the weather excerpt.
const WEATHER_TERMINATORS: &[char] = &['。', '、', '.', '!', '！'];

/// Frontmatter labels of the tracked exercises.
const EXERCISE_LABELS: &[(&str, ExerciseKind)] = &[
    ("スクワット", ExerciseKind::Squat),
    ("腹筋", ExerciseKind::Abs),
    ("腕立て伏せ", ExerciseKind::Pushup),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stage {
    Deep,
    Light,
    Rem,
    Awake,
}

impl Stage {
    fn anchor(self) -> &'static str {
        match self {
            Stage::Deep => "深い",
            Stage::Light => "ライト",
            Stage::Rem => "レム",
            Stage::Awake => "覚醒",
        }
    }
}

/// Replaces full-width digits with their ASCII counterparts.
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Returns the first run of digits in `s`, after full-width normalization.
pub fn first_number(s: &str) -> Option<u32> {
    let normalized = normalize_digits(s);
    NUMBER_RE
        .find(&normalized)
        .and_then(|m| m.as_str().parse().ok())
}

/// Sums `<N>時間` and `<N>分` tokens into fractional hours.
///
/// Either token may be missing and their order does not matter. A string
/// without either token yields `None`, never zero.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::parse_duration;
///
/// assert_eq!(parse_duration("1時間30分"), Some(1.5));
/// assert_eq!(parse_duration("45分"), Some(0.75));
/// assert_eq!(parse_duration("ぐっすり"), None);
/// ```
pub fn parse_duration(s: &str) -> Option<f64> {
    let normalized = normalize_digits(s);
    let capture = |re: &Regex| -> Option<u32> {
        re.captures(&normalized)
            .and_then(|caps| caps[1].parse().ok())
    };

    let hours = capture(&HOURS_RE);
    let minutes = capture(&MINUTES_RE);
    if hours.is_none() && minutes.is_none() {
        return None;
    }

    Some(f64::from(hours.unwrap_or(0)) + f64::from(minutes.unwrap_or(0)) / 60.0)
}

/// Returns the value written after `label::` on the first line carrying a
/// non-empty value for that label.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::inline_field;
///
/// let text = "- 天気:: 晴れ。暖かい\n- 歩数::";
/// assert_eq!(inline_field(text, "天気"), Some("晴れ。暖かい"));
/// assert_eq!(inline_field(text, "歩数"), None);
/// ```
pub fn inline_field<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let marker = format!("{}{}", label, FIELD_SEPARATOR);
    text.lines().find_map(|line| {
        let idx = line.find(&marker)?;
        let value = line[idx + marker.len()..].trim();
        (!value.is_empty()).then_some(value)
    })
}

/// Parses a step count such as `12,345歩`.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::parse_steps;
///
/// assert_eq!(parse_steps("12,345歩"), Some(12345));
/// assert_eq!(parse_steps("歩数::"), None);
/// ```
pub fn parse_steps(s: &str) -> Option<u64> {
    let normalized = normalize_digits(s);
    let caps = STEPS_RE.captures(&normalized)?;
    caps[1].replace(',', "").parse().ok()
}

/// Extracts the step count from the `歩数::` marker of a note.
pub fn extract_steps(text: &str) -> Option<u64> {
    inline_field(text, STEPS_LABEL).and_then(parse_steps)
}

/// Extracts the weather excerpt: the `天気::` value up to the first
/// sentence-ending punctuation.
pub fn parse_weather(text: &str) -> Option<String> {
    let value = inline_field(text, WEATHER_LABEL)?;
    let excerpt = value
        .split(WEATHER_TERMINATORS)
        .next()
        .unwrap_or_default()
        .trim();
    (!excerpt.is_empty()).then(|| excerpt.to_string())
}

/// Extracts the free-text mood, which may continue over several lines.
///
/// Continuation stops at the next key-value marker line or heading.
pub fn parse_mood(text: &str) -> Option<String> {
    let marker = format!("{}{}", MOOD_LABEL, FIELD_SEPARATOR);
    let mut lines = text.lines();

    let first = lines.by_ref().find_map(|line| {
        line.find(&marker)
            .map(|idx| line[idx + marker.len()..].trim())
    })?;

    let mut parts = vec![first];
    for line in lines {
        let trimmed = line.trim();
        if trimmed.contains(FIELD_SEPARATOR)
            || trimmed.starts_with(HEADING_PREFIX)
            || is_section_start(trimmed)
        {
            break;
        }
        parts.push(trimmed);
    }

    let mood = parts.join("\n").trim().to_string();
    (!mood.is_empty()).then_some(mood)
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    let (hours, minutes) = s.split_once(':')?;
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

/// Extracts the bedtime and wake time, preferring the labeled form.
pub fn parse_time_range(text: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let normalized = normalize_digits(text);
    LABELED_RANGE_RE
        .captures(&normalized)
        .or_else(|| BARE_RANGE_RE.captures(&normalized))
        .map(|caps| (parse_clock(&caps[1]), parse_clock(&caps[2])))
        .unwrap_or((None, None))
}

fn parse_stage(text: &str, stage: Stage) -> Option<f64> {
    let caps = STAGE_RES[&stage].captures(text)?;
    parse_duration(&caps[1]).map(|hours| (hours * 100.0).round() / 100.0)
}

/// Extracts the sleep tracker details written in the body of a note.
///
/// Returns `None` when none of the details are present.
pub fn parse_sleep_detail(text: &str) -> Option<SleepDetail> {
    let normalized = normalize_digits(text);
    let (bedtime, waketime) = parse_time_range(&normalized);

    let detail = SleepDetail {
        score: SCORE_RE
            .captures(&normalized)
            .and_then(|caps| caps[1].parse::<u8>().ok())
            .filter(|score| *score <= 100),
        deep_hours: parse_stage(&normalized, Stage::Deep),
        light_hours: parse_stage(&normalized, Stage::Light),
        rem_hours: parse_stage(&normalized, Stage::Rem),
        awake_hours: parse_stage(&normalized, Stage::Awake),
        bedtime,
        waketime,
        weather: parse_weather(text),
        mood: parse_mood(text),
    };

    (!detail.is_empty()).then_some(detail)
}

/// Reads the exercise repetition counts from the frontmatter.
///
/// A label with an empty value yields no entry; a non-empty value without
/// digits counts as zero repetitions.
pub fn parse_exercise(
    frontmatter: &BTreeMap<String, String>,
) -> Option<BTreeMap<ExerciseKind, u32>> {
    let exercise: BTreeMap<ExerciseKind, u32> = EXERCISE_LABELS
        .iter()
        .filter_map(|(label, kind)| {
            let value = frontmatter.get(*label)?.trim();
            (!value.is_empty()).then(|| (*kind, first_number(value).unwrap_or(0)))
        })
        .collect();

    (!exercise.is_empty()).then_some(exercise)
}

/// Extracts the book mentioned on a single reading line, if any.
pub fn parse_book_line(line: &str) -> Option<BookMention> {
    let caps = WIKI_LINK_RE.captures(line)?;
    let title = caps[1].trim();
    if title.is_empty() {
        return None;
    }
    Some(BookMention {
        title: title.to_string(),
        finished: line.contains(FINISHED_MARKER),
    })
}

/// Extracts the books mentioned in the lines of a reading section.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::parse_reading;
///
/// let books = parse_reading(&["- [[Book A]]読了", "-", "- [[Book B|B]]"]);
/// assert_eq!(books.len(), 2);
/// assert!(books[0].finished);
/// assert_eq!(books[1].title, "Book B");
/// ```
pub fn parse_reading(section: &[&str]) -> Vec<BookMention> {
    section
        .iter()
        .filter_map(|line| parse_book_line(line))
        .collect()
}
