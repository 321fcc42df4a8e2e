//! Locating the reading section of a daily note.

use crate::constants::{
    HEADING_PREFIX, LIST_ITEM_PREFIX, READING_SECTION_EMOJI, READING_SECTION_LABEL,
};

/// Returns true if the line opens the reading section.
pub fn is_section_start(line: &str) -> bool {
    line.contains(READING_SECTION_LABEL) || line.contains(READING_SECTION_EMOJI)
}

/// Returns true if the line ends a section that is already open.
///
/// Headings always end it; any other non-empty line ends it unless it is a
/// list item.
pub fn is_section_end(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(HEADING_PREFIX)
        || (!trimmed.is_empty() && !trimmed.starts_with(LIST_ITEM_PREFIX))
}

/// Locates the reading section as a half-open line index range.
///
/// The start index is the first content line after the sentinel. Only the
/// first sentinel counts; `None` means the document has no section at all.
pub fn section_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    let sentinel = lines.iter().position(|line| is_section_start(line))?;
    let start = sentinel + 1;
    let end = lines[start..]
        .iter()
        .position(|line| is_section_end(line))
        .map_or(lines.len(), |offset| start + offset);
    Some((start, end))
}

/// Returns the lines belonging to the reading section.
///
/// `None` means no sentinel was found, which is distinct from a section that
/// is present but empty (`Some` of an empty vector).
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::extract_section;
///
/// let lines = vec!["###### 📚 今日読んだ本", "- [[Book A]]", "", "Evening notes"];
/// assert_eq!(extract_section(&lines), Some(vec!["- [[Book A]]", ""]));
/// assert_eq!(extract_section(&["no books today"]), None);
/// ```
pub fn extract_section<'a>(lines: &[&'a str]) -> Option<Vec<&'a str>> {
    section_bounds(lines).map(|(start, end)| lines[start..end].to_vec())
}
