//! Reading summary for the dashboard and the terminal book listing.

use crate::config::Config;
use crate::errors::AppResult;
use crate::journal_core::DailyRecord;
use crate::stats::reading::{GenreTable, ReadingSummary};
use crate::tracker::{load_excluded_titles, JsonReturnedTitles, NoReturnedTitles, ReturnedTitles};
use std::collections::HashSet;
use tracing::{info, warn};

/// The returned-titles source configured for this run.
pub fn returned_source(config: &Config) -> Box<dyn ReturnedTitles> {
    match &config.returned_titles_path {
        Some(path) => Box::new(JsonReturnedTitles::new(path)),
        None => Box::new(NoReturnedTitles),
    }
}

/// Builds the reading summary with returned and excluded titles left out.
///
/// An unreadable or malformed returned-titles source is logged and treated
/// as empty. The excluded-titles file is still required to be readable.
pub fn build_reading_summary(
    config: &Config,
    records: &[DailyRecord],
    returned: &dyn ReturnedTitles,
) -> AppResult<ReadingSummary> {
    let returned = match returned.fetch_returned_titles() {
        Ok(titles) => titles,
        Err(e) => {
            warn!("Ignoring returned titles: {}", e);
            HashSet::new()
        }
    };
    let excluded = load_excluded_titles(config.excluded_titles_path.as_deref())?;

    let summary = ReadingSummary::build(records, &GenreTable::default(), &returned, &excluded);
    info!(
        "Reading summary: {} books, {} finished, {} returned unfinished excluded",
        summary.total, summary.finished, summary.returned_count
    );
    Ok(summary)
}

/// Renders the summary and one line per book for the terminal.
pub fn render_book_listing(summary: &ReadingSummary) -> String {
    let mut out = format!(
        "Books: {} ({} finished, {} returned unfinished excluded)\n",
        summary.total, summary.finished, summary.returned_count
    );

    let mut genres: Vec<_> = summary.genre_counts.iter().collect();
    genres.sort_by(|a, b| b.1.cmp(a.1));
    let genres: Vec<String> = genres
        .iter()
        .map(|(genre, count)| format!("{}: {}", genre, count))
        .collect();
    if !genres.is_empty() {
        out.push_str(&format!("Genres: {}\n", genres.join(", ")));
    }
    out.push_str(&format!("Average pace: {} days per book\n\n", summary.avg_pace));

    for book in &summary.books {
        let status = book
            .finished
            .map_or_else(|| "...".to_string(), |date| format!("done:{}", date));
        out.push_str(&format!(
            "{}~{} ({}d) [{}] {}\n",
            book.first_seen, book.last_seen, book.days_seen, status, book.title
        ));
    }
    out
}
