//! Constants used throughout the application.
//!
//! This module contains the constants used by lifelog, organized into logical
//! groups. The journal markers are the literal strings written in the daily
//! notes, so they stay in the language the journal is kept in.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "lifelog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "Extracts sleep, exercise, step and reading facts from a daily journal and renders reports";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the directory holding one journal file per day.
pub const ENV_VAR_JOURNAL_DIR: &str = "LIFELOG_JOURNAL_DIR";
/// Environment variable for the vault directory that receives Markdown reports.
pub const ENV_VAR_VAULT_DIR: &str = "LIFELOG_VAULT_DIR";
/// Environment variable for the directory that receives generated HTML.
pub const ENV_VAR_DOCS_DIR: &str = "LIFELOG_DOCS_DIR";
/// Environment variable for the directory holding the HTML templates.
pub const ENV_VAR_TEMPLATE_DIR: &str = "LIFELOG_TEMPLATE_DIR";
/// Environment variable for the running reading log.
pub const ENV_VAR_READING_NOTE: &str = "LIFELOG_READING_NOTE";
/// Environment variable for the JSON file listing returned library titles.
pub const ENV_VAR_RETURNED_TITLES: &str = "LIFELOG_RETURNED_TITLES";
/// Environment variable for the plain-text file of manually excluded titles.
pub const ENV_VAR_EXCLUDED_TITLES: &str = "LIFELOG_EXCLUDED_TITLES";
/// Environment variable for the fitness tracker base URL.
pub const ENV_VAR_TRACKER_URL: &str = "LIFELOG_TRACKER_URL";
/// Environment variable for the fitness tracker bearer token.
pub const ENV_VAR_TRACKER_TOKEN: &str = "LIFELOG_TRACKER_TOKEN";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default journal directory relative to the user's home directory.
pub const DEFAULT_JOURNAL_SUBDIR: &str = "Documents/vault/journal";
/// Default docs sub-directory inside the vault.
pub const DEFAULT_DOCS_SUBDIR: &str = "docs";
/// Default template sub-directory inside the vault.
pub const DEFAULT_TEMPLATE_SUBDIR: &str = "templates";
/// Default reading log file name inside the vault.
pub const DEFAULT_READING_NOTE_FILE: &str = "reading-note.md";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// File extension for journal entries (without the dot).
pub const JOURNAL_FILE_EXTENSION: &str = "md";
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Timestamp format used in report footers.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

// Report outputs
/// HTML template for the dashboard, looked up in the template directory.
pub const DASHBOARD_TEMPLATE_FILE: &str = "dashboard_template.html";
/// HTML template for the sleep page, looked up in the template directory.
pub const SLEEP_TEMPLATE_FILE: &str = "sleep_template.html";
/// Dashboard page written to the docs directory.
pub const DASHBOARD_PAGE_FILE: &str = "index.html";
/// Dashboard copy written to the vault for local viewing.
pub const VAULT_DASHBOARD_FILE: &str = "sleep-dashboard.html";
/// Sleep page written to the docs directory.
pub const SLEEP_PAGE_FILE: &str = "sleep.html";
/// Correlation report written to the vault.
pub const CORRELATION_REPORT_FILE: &str = "sleep-correlation.md";
/// Vault sub-directory receiving the monthly trend reports.
pub const MONTHLY_TREND_SUBDIR: &str = "monthly-trend";
/// Template placeholder replaced by the record list.
pub const PLACEHOLDER_DATA_JSON: &str = "__DATA_JSON__";
/// Template placeholder replaced by the sleep report.
pub const PLACEHOLDER_REPORT_JSON: &str = "__REPORT_JSON__";
/// Template placeholder replaced by the reading summary.
pub const PLACEHOLDER_READING_JSON: &str = "__READING_JSON__";
/// Template placeholder replaced by the sleep records.
pub const PLACEHOLDER_SLEEP_JSON: &str = "__SLEEP_JSON__";

// Journal markup
/// Delimiter line that opens and closes the frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";
/// Prefix of a list-item line.
pub const LIST_ITEM_PREFIX: &str = "-";
/// Prefix of a heading line.
pub const HEADING_PREFIX: &str = "#";
/// Separator between a key-value marker label and its value.
pub const FIELD_SEPARATOR: &str = "::";
/// Label that starts the reading section.
pub const READING_SECTION_LABEL: &str = "今日読んだ本";
/// Emoji that also starts the reading section.
pub const READING_SECTION_EMOJI: &str = "📚";
/// Token marking a book as finished on its reading line.
pub const FINISHED_MARKER: &str = "読了";
/// Alternative wording for a finished book in free text.
pub const FINISHED_ALT_MARKER: &str = "読み終え";
/// Wording meaning "finished earlier", never a finishing event.
pub const PREVIOUSLY_FINISHED_MARKER: &str = "読了済み";
/// Frontmatter key holding the night's total sleep in hours.
pub const SLEEP_HOURS_KEY: &str = "sleep";
/// Field label for the step count.
pub const STEPS_LABEL: &str = "歩数";
/// Unit suffix of the step count.
pub const STEPS_UNIT: &str = "歩";
/// Field label for the weather line.
pub const WEATHER_LABEL: &str = "天気";
/// Field label for the mood text.
pub const MOOD_LABEL: &str = "気分";
/// Field label written for running activities.
pub const RUNNING_LABEL: &str = "ランニング";
/// Emoji written for running activities.
pub const RUNNING_EMOJI: &str = "🏃";
/// Separator between a book title and its author suffix in note names.
pub const TITLE_AUTHOR_SEPARATOR: &str = " - ";

// Statistics
/// Hours of sleep counted as a "good night".
pub const SLEEP_GOAL_HOURS: f64 = 7.0;
/// Minimum sample size per partition before score means are compared.
pub const MIN_PAIRED_SAMPLES: usize = 3;
/// Score below which a night is counted as low.
pub const LOW_SCORE_THRESHOLD: u8 = 85;
/// Number of low-score nights in 30 days that triggers an insight.
pub const LOW_SCORE_DAYS_TRIGGER: usize = 5;
/// Average bedtime (decimal hours past midnight of the previous day) counted as late.
pub const LATE_BEDTIME_HOURS: f64 = 23.5;
/// Minimum deep-sleep samples before a trend is reported.
pub const MIN_DEEP_SLEEP_SAMPLES: usize = 14;
/// Characters of a title compared when matching returned library books.
pub const RETURNED_TITLE_PREFIX_CHARS: usize = 6;
/// Differences smaller than this are reported as unchanged.
pub const UNCHANGED_EPSILON: f64 = 0.01;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "lifelog";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
