//! File-backed title lists used to leave returned library books out of the
//! reading statistics.

use super::ReturnedTitles;
use crate::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads a JSON array of titles, e.g. `["本のタイトル", "Another Book"]`.
#[derive(Debug, Clone)]
pub struct JsonReturnedTitles {
    path: PathBuf,
}

impl JsonReturnedTitles {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReturnedTitles for JsonReturnedTitles {
    /// A missing file yields the empty set.
    fn fetch_returned_titles(&self) -> AppResult<HashSet<String>> {
        let Some(contents) = read_optional(&self.path)? else {
            warn!("Returned titles file not found: {}", self.path.display());
            return Ok(HashSet::new());
        };

        let titles: Vec<String> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!(
                "Returned titles file {} is not a JSON array of strings: {}",
                self.path.display(),
                e
            ))
        })?;

        let titles: HashSet<String> = titles
            .into_iter()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();
        debug!("Loaded {} returned titles", titles.len());
        Ok(titles)
    }
}

/// Used when no returned-titles file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReturnedTitles;

impl ReturnedTitles for NoReturnedTitles {
    fn fetch_returned_titles(&self) -> AppResult<HashSet<String>> {
        Ok(HashSet::new())
    }
}

/// Loads manually excluded titles, one per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn load_excluded_titles(path: Option<&Path>) -> AppResult<HashSet<String>> {
    let Some(path) = path else {
        return Ok(HashSet::new());
    };
    let Some(contents) = read_optional(path)? else {
        warn!("Excluded titles file not found: {}", path.display());
        return Ok(HashSet::new());
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn read_optional(path: &Path) -> AppResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}
