/*!
# lifelog

lifelog turns a directory of daily Markdown journal notes into sleep,
exercise, step and reading statistics, and renders them as Markdown reports
and an HTML dashboard.

## Architecture

- `journal_core`: pure parsing of one note into a [`DailyRecord`](journal_core::DailyRecord)
- `journal_io`: corpus loading and atomic file writes
- `stats`: statistics over the loaded records
- `ops`: report generation and journal amendments
- `tracker`: fitness tracker and returned-library-book sources
- `cli`, `config`, `errors`, `constants`: the ambient application plumbing

## Usage Example

```rust,no_run
use lifelog::journal_io::CorpusLoader;
use lifelog::stats::weekly::WeeklySummary;
use lifelog::Config;

fn main() -> lifelog::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let records = CorpusLoader::new(&config).load()?;
    let today = chrono::Local::now().naive_local().date();
    if let Some(week) = WeeklySummary::build(&records, today) {
        println!("Average sleep last week: {:?}", week.avg_hours);
    }
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Shared constants and journal markers
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// Parsing of individual journal notes
pub mod journal_core;
/// Corpus loading and file output
pub mod journal_io;
/// Report generation and journal amendment
pub mod ops;
/// Statistics over loaded records
pub mod stats;
/// External data sources
pub mod tracker;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
