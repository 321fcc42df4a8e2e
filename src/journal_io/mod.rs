//! Journal I/O: loading the corpus and writing generated files.
//!
//! This module contains every filesystem operation the pipeline performs:
//! listing and reading the daily notes, and writing reports and amended
//! notes atomically.

use crate::config::Config;
use crate::constants::JOURNAL_FILE_EXTENSION;
use crate::errors::{AppError, AppResult};
use crate::journal_core::{build_record, date_from_filename, DailyRecord};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A journal document recognised by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Loads every daily note of a journal directory into records.
///
/// # Examples
///
/// ```no_run
/// use lifelog::journal_io::CorpusLoader;
///
/// let records = CorpusLoader::from_dir("/home/me/vault/journal").load()?;
/// println!("{} days with data", records.len());
/// # Ok::<(), lifelog::AppError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    journal_dir: PathBuf,
}

impl CorpusLoader {
    /// Creates a loader for the configured journal directory.
    pub fn new(config: &Config) -> Self {
        Self::from_dir(&config.journal_dir)
    }

    /// Creates a loader for an explicit directory.
    pub fn from_dir(journal_dir: impl Into<PathBuf>) -> Self {
        CorpusLoader {
            journal_dir: journal_dir.into(),
        }
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    /// Lists the journal files, one per date, sorted by date.
    ///
    /// Only `*.md` files directly inside the directory whose names start with
    /// a valid `YYYY-MM-DD` date are returned. When several files share a
    /// date, the first by file name wins and the others are logged and
    /// skipped. A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Corpus` if the directory cannot be listed or a
    /// dated journal entry cannot be resolved, such as a dangling symlink.
    /// Unresolvable entries that are not journal files are logged and
    /// skipped.
    pub fn list_files(&self) -> AppResult<Vec<JournalFile>> {
        if !self.journal_dir.is_dir() {
            warn!(
                "Journal directory not found: {}",
                self.journal_dir.display()
            );
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(&self.journal_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        let mut files: Vec<(JournalFile, String)> = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf);
                    if let Some(path) = path.as_ref().filter(|p| !is_journal_path(p)) {
                        warn!("Skipping unreadable entry {}: {}", path.display(), err);
                        continue;
                    }
                    return Err(AppError::Corpus {
                        path: path.unwrap_or_else(|| self.journal_dir.clone()),
                        source: err.into(),
                    });
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(date) = journal_date(&name) else {
                continue;
            };
            files.push((
                JournalFile {
                    date,
                    path: entry.into_path(),
                },
                name,
            ));
        }

        files.sort_by(|(a, a_name), (b, b_name)| a.date.cmp(&b.date).then(a_name.cmp(b_name)));

        let mut unique: Vec<JournalFile> = Vec::with_capacity(files.len());
        for (file, _) in files {
            match unique.last() {
                Some(kept) if kept.date == file.date => {
                    warn!(
                        "Skipping {}: {} already provides the entry for {}",
                        file.path.display(),
                        kept.path.display(),
                        file.date
                    );
                }
                _ => unique.push(file),
            }
        }

        debug!("Found {} journal files", unique.len());
        Ok(unique)
    }

    /// Parses the whole corpus into records sorted by date.
    ///
    /// Records without any extracted fact are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Corpus` naming the file if any recognised journal
    /// file cannot be read, including files that are not valid UTF-8.
    pub fn load(&self) -> AppResult<Vec<DailyRecord>> {
        let files = self.list_files()?;
        let mut records = Vec::with_capacity(files.len());

        for file in &files {
            let text = read_entry(&file.path)?;
            let record = build_record(file.date, &text);
            if record.has_data() {
                records.push(record);
            } else {
                debug!("No data extracted from {}", file.path.display());
            }
        }

        info!(
            "Loaded {} records from {} journal files",
            records.len(),
            files.len()
        );
        Ok(records)
    }
}

/// Date of a journal file name: a `YYYY-MM-DD` prefix and the `.md` extension.
fn journal_date(name: &str) -> Option<NaiveDate> {
    let is_markdown = Path::new(name)
        .extension()
        .is_some_and(|ext| ext == JOURNAL_FILE_EXTENSION);
    if is_markdown {
        date_from_filename(name)
    } else {
        None
    }
}

fn is_journal_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(journal_date)
        .is_some()
}

/// Per-field counts over a loaded corpus, shown in run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub days: usize,
    pub sleep_days: usize,
    pub scored_days: usize,
    pub exercise_days: usize,
    pub step_days: usize,
    pub reading_days: usize,
    pub finished_mentions: usize,
}

impl CorpusStats {
    pub fn from_records(records: &[DailyRecord]) -> Self {
        CorpusStats {
            days: records.len(),
            sleep_days: records.iter().filter(|r| r.sleep_hours.is_some()).count(),
            scored_days: records.iter().filter(|r| r.score().is_some()).count(),
            exercise_days: records.iter().filter(|r| r.has_exercise()).count(),
            step_days: records.iter().filter(|r| r.tracked_steps().is_some()).count(),
            reading_days: records.iter().filter(|r| r.has_books()).count(),
            finished_mentions: records
                .iter()
                .flat_map(|r| &r.books)
                .filter(|b| b.finished)
                .count(),
        }
    }
}

/// Reads one journal document.
///
/// # Errors
///
/// Returns `AppError::Corpus` naming the file when it cannot be read as UTF-8
/// text.
pub fn read_entry(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|source| AppError::Corpus {
        path: path.to_path_buf(),
        source,
    })
}

/// Ensures an output directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not absolute
/// - `AppError::Output` if the directory cannot be created
pub fn ensure_directory_exists(dir: &Path) -> AppResult<()> {
    if !dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Output directory path must be absolute: {}",
            dir.display()
        )));
    }

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| AppError::Output {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Writes `contents` to `path` atomically.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial file.
///
/// # Errors
///
/// Returns `AppError::Output` naming the target if any step fails; no partial
/// file is left behind.
pub fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let output_error = |source: std::io::Error| AppError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(output_error)?;
    temp.write_all(contents.as_bytes()).map_err(output_error)?;
    temp.as_file().sync_all().map_err(output_error)?;
    temp.persist(path).map_err(|e| output_error(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
