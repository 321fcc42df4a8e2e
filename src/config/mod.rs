//! Configuration management for the lifelog application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. Every directory the pipeline touches is carried
//! here and passed into the corpus loader and report operations, so tests can point
//! them at temporary directories.
//!
//! # Environment Variables
//!
//! - `LIFELOG_JOURNAL_DIR`: Directory of daily journal files (defaults to ~/Documents/vault/journal)
//! - `LIFELOG_VAULT_DIR`: Directory receiving Markdown reports (defaults to the journal's parent)
//! - `LIFELOG_DOCS_DIR`: Directory receiving generated HTML (defaults to `<vault>/docs`)
//! - `LIFELOG_TEMPLATE_DIR`: Directory holding HTML templates (defaults to `<vault>/templates`)
//! - `LIFELOG_READING_NOTE`: Running reading log that `sync` appends to (defaults to `<vault>/reading-note.md`)
//! - `LIFELOG_RETURNED_TITLES`: JSON array of returned library titles (optional)
//! - `LIFELOG_EXCLUDED_TITLES`: Plain-text list of titles to exclude, one per line (optional)
//! - `LIFELOG_TRACKER_URL`: Base URL of the fitness tracker API (optional)
//! - `LIFELOG_TRACKER_TOKEN`: Bearer token for the fitness tracker API (optional)
//! - `HOME`: Used for expanding the default journal directory path

use crate::constants;
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for the lifelog application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use lifelog::Config;
/// use std::path::PathBuf;
///
/// let config = Config::for_vault(PathBuf::from("/vault"), PathBuf::from("/vault/journal"));
/// assert_eq!(config.docs_dir, PathBuf::from("/vault/docs"));
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory containing one `YYYY-MM-DD*.md` file per day.
    pub journal_dir: PathBuf,

    /// Directory receiving the Markdown reports.
    pub vault_dir: PathBuf,

    /// Directory receiving the generated HTML pages.
    pub docs_dir: PathBuf,

    /// Directory holding `dashboard_template.html` and `sleep_template.html`.
    pub template_dir: PathBuf,

    /// Running reading log fed from the daily reading sections.
    pub reading_note_path: PathBuf,

    /// JSON file listing library books that were returned unfinished.
    pub returned_titles_path: Option<PathBuf>,

    /// Plain-text file of titles that never count as "currently reading".
    pub excluded_titles_path: Option<PathBuf>,

    /// Base URL of the fitness tracker API.
    pub tracker_url: Option<String>,

    /// Bearer token for the fitness tracker API.
    pub tracker_token: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("journal_dir", &"[REDACTED_PATH]")
            .field("vault_dir", &"[REDACTED_PATH]")
            .field("docs_dir", &"[REDACTED_PATH]")
            .field("template_dir", &"[REDACTED_PATH]")
            .field("reading_note_path", &"[REDACTED_PATH]")
            .field("returned_titles_path", &self.returned_titles_path.is_some())
            .field("excluded_titles_path", &self.excluded_titles_path.is_some())
            .field("tracker_url", &self.tracker_url)
            .field(
                "tracker_token",
                &self
                    .tracker_token
                    .as_ref()
                    .map(|_| constants::REDACTED_PLACEHOLDER),
            )
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with empty paths and no external collaborators.
    fn default() -> Self {
        Config {
            journal_dir: PathBuf::from(""),
            vault_dir: PathBuf::from(""),
            docs_dir: PathBuf::from(""),
            template_dir: PathBuf::from(""),
            reading_note_path: PathBuf::from(""),
            returned_titles_path: None,
            excluded_titles_path: None,
            tracker_url: None,
            tracker_token: None,
        }
    }
}

impl Config {
    /// Builds a configuration rooted at a vault directory, deriving the docs,
    /// template and reading-note locations the same way `load` does.
    pub fn for_vault(vault_dir: PathBuf, journal_dir: PathBuf) -> Self {
        Config {
            docs_dir: vault_dir.join(constants::DEFAULT_DOCS_SUBDIR),
            template_dir: vault_dir.join(constants::DEFAULT_TEMPLATE_SUBDIR),
            reading_note_path: vault_dir.join(constants::DEFAULT_READING_NOTE_FILE),
            journal_dir,
            vault_dir,
            ..Config::default()
        }
    }

    /// Expands `~` and environment variable references in a configured path.
    fn expand_path(raw: &str) -> AppResult<PathBuf> {
        let expanded = shellexpand::full(raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Reads an optional variable, treating an empty value as unset.
    fn optional_var(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a path expansion fails or the journal
    /// directory resolves to an empty path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lifelog::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Loaded config: {:?}", config),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let journal_dir_str = env::var(constants::ENV_VAR_JOURNAL_DIR).unwrap_or_else(|_| {
            let home = env::var(constants::ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, constants::DEFAULT_JOURNAL_SUBDIR)
        });
        let journal_dir = Self::expand_path(&journal_dir_str)?;

        if journal_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Journal directory path is empty".to_string(),
            ));
        }

        let vault_dir = match Self::optional_var(constants::ENV_VAR_VAULT_DIR) {
            Some(raw) => Self::expand_path(&raw)?,
            None => journal_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| journal_dir.clone()),
        };

        let mut config = Config::for_vault(vault_dir, journal_dir);

        if let Some(raw) = Self::optional_var(constants::ENV_VAR_DOCS_DIR) {
            config.docs_dir = Self::expand_path(&raw)?;
        }
        if let Some(raw) = Self::optional_var(constants::ENV_VAR_TEMPLATE_DIR) {
            config.template_dir = Self::expand_path(&raw)?;
        }
        if let Some(raw) = Self::optional_var(constants::ENV_VAR_READING_NOTE) {
            config.reading_note_path = Self::expand_path(&raw)?;
        }
        if let Some(raw) = Self::optional_var(constants::ENV_VAR_RETURNED_TITLES) {
            config.returned_titles_path = Some(Self::expand_path(&raw)?);
        }
        if let Some(raw) = Self::optional_var(constants::ENV_VAR_EXCLUDED_TITLES) {
            config.excluded_titles_path = Some(Self::expand_path(&raw)?);
        }
        config.tracker_url = Self::optional_var(constants::ENV_VAR_TRACKER_URL)
            .map(|url| url.trim_end_matches('/').to_string());
        config.tracker_token = Self::optional_var(constants::ENV_VAR_TRACKER_TOKEN);

        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// Every directory must be non-empty and absolute.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the offending setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifelog::Config;
    /// use std::path::PathBuf;
    ///
    /// let valid = Config::for_vault(PathBuf::from("/vault"), PathBuf::from("/vault/journal"));
    /// assert!(valid.validate().is_ok());
    ///
    /// let invalid = Config::for_vault(PathBuf::from("vault"), PathBuf::from("vault/journal"));
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        let dirs = [
            ("Journal directory", &self.journal_dir),
            ("Vault directory", &self.vault_dir),
            ("Docs directory", &self.docs_dir),
            ("Template directory", &self.template_dir),
        ];

        for (label, dir) in dirs {
            if dir.as_os_str().is_empty() {
                return Err(AppError::Config(format!("{} path is empty", label)));
            }
            if !dir.is_absolute() {
                return Err(AppError::Config(format!(
                    "{} must be an absolute path",
                    label
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    const ALL_VARS: &[&str] = &[
        constants::ENV_VAR_JOURNAL_DIR,
        constants::ENV_VAR_VAULT_DIR,
        constants::ENV_VAR_DOCS_DIR,
        constants::ENV_VAR_TEMPLATE_DIR,
        constants::ENV_VAR_READING_NOTE,
        constants::ENV_VAR_RETURNED_TITLES,
        constants::ENV_VAR_EXCLUDED_TITLES,
        constants::ENV_VAR_TRACKER_URL,
        constants::ENV_VAR_TRACKER_TOKEN,
    ];

    fn with_clean_env<F: FnOnce()>(f: F) {
        let saved: Vec<(&str, Option<String>)> =
            ALL_VARS.iter().map(|&name| (name, env::var(name).ok())).collect();
        for name in ALL_VARS {
            env::remove_var(name);
        }

        f();

        for (name, value) in saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }

    #[test]
    fn test_debug_impl_redacts_sensitive_info() {
        let mut config = Config::for_vault(
            PathBuf::from("/home/username/private/vault"),
            PathBuf::from("/home/username/private/vault/journal"),
        );
        config.tracker_token = Some("secret-token".to_string());

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED_PATH]"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("/home/username/private"));
        assert!(!debug_output.contains("secret-token"));
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();
        assert_eq!(config.journal_dir, PathBuf::from(""));
        assert!(config.tracker_url.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_with_journal_dir_derives_vault_dirs() {
        with_clean_env(|| {
            let temp_dir = tempdir().unwrap();
            let journal = temp_dir.path().join("journal");
            env::set_var(constants::ENV_VAR_JOURNAL_DIR, &journal);

            let config = Config::load().unwrap();

            assert_eq!(config.journal_dir, journal);
            assert_eq!(config.vault_dir, temp_dir.path());
            assert_eq!(config.docs_dir, temp_dir.path().join("docs"));
            assert_eq!(config.template_dir, temp_dir.path().join("templates"));
            assert_eq!(
                config.reading_note_path,
                temp_dir.path().join("reading-note.md")
            );
            assert!(config.returned_titles_path.is_none());
        });
    }

    #[test]
    #[serial]
    fn test_load_with_explicit_overrides() {
        with_clean_env(|| {
            env::set_var(constants::ENV_VAR_JOURNAL_DIR, "/data/journal");
            env::set_var(constants::ENV_VAR_VAULT_DIR, "/data/vault");
            env::set_var(constants::ENV_VAR_DOCS_DIR, "/srv/site");
            env::set_var(constants::ENV_VAR_RETURNED_TITLES, "/data/returned.json");
            env::set_var(constants::ENV_VAR_TRACKER_URL, "http://tracker.local/api/");
            env::set_var(constants::ENV_VAR_TRACKER_TOKEN, "");

            let config = Config::load().unwrap();

            assert_eq!(config.vault_dir, PathBuf::from("/data/vault"));
            assert_eq!(config.docs_dir, PathBuf::from("/srv/site"));
            assert_eq!(config.template_dir, PathBuf::from("/data/vault/templates"));
            assert_eq!(
                config.returned_titles_path,
                Some(PathBuf::from("/data/returned.json"))
            );
            assert_eq!(config.tracker_url.as_deref(), Some("http://tracker.local/api"));
            assert!(config.tracker_token.is_none());
        });
    }

    #[test]
    fn test_validate_relative_dir() {
        let mut config = Config::for_vault(PathBuf::from("/vault"), PathBuf::from("/vault/j"));
        config.docs_dir = PathBuf::from("relative/docs");

        match config.validate() {
            Err(AppError::Config(message)) => {
                assert!(message.contains("Docs directory must be an absolute path"));
            }
            _ => panic!("Expected Config error about relative path"),
        }
    }

    #[test]
    fn test_validate_empty_journal_dir() {
        let config = Config::for_vault(PathBuf::from("/vault"), PathBuf::from(""));

        match config.validate() {
            Err(AppError::Config(message)) => {
                assert!(message.contains("Journal directory path is empty"));
            }
            _ => panic!("Expected Config error about empty journal directory"),
        }
    }
}
