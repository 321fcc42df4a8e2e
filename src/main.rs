/*!
# lifelog

lifelog reads a directory of daily Markdown journal notes, extracts sleep,
exercise, step and reading facts from each, and writes reports back into the
vault: the sleep report and HTML dashboard, weekly and monthly reports, and a
sleep correlation analysis. It can also amend notes with fitness tracker data.

## Usage

```
lifelog [OPTIONS] <COMMAND>

Commands:
  dashboard    Write the sleep report and the HTML dashboard
  weekly       Write the report for the calendar week before DATE
  monthly      Write the month-over-month trend report
  analyze      Write the sleep correlation analysis
  books        List tracked books with their reading status
  sync         Copy tracker data and reading lines into the journal
  fix-reading  Mark books as finished when the entry body says so

Options:
  -v, --verbose              Enable debug logging
      --log-format <FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `LIFELOG_JOURNAL_DIR`: directory of daily notes (defaults to `~/Documents/vault/journal`)
- `LIFELOG_VAULT_DIR`: report directory (defaults to the journal's parent)
- `LIFELOG_DOCS_DIR`, `LIFELOG_TEMPLATE_DIR`: HTML output and template directories
- `LIFELOG_READING_NOTE`: running reading log updated by `sync`
- `LIFELOG_RETURNED_TITLES`, `LIFELOG_EXCLUDED_TITLES`: book filters
- `LIFELOG_TRACKER_URL`, `LIFELOG_TRACKER_TOKEN`: fitness tracker API
*/

use chrono::{Local, NaiveDate};
use clap::Parser;
use lifelog::cli::{CliArgs, Commands};
use lifelog::config::Config;
use lifelog::constants::{DEFAULT_LOG_LEVEL, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use lifelog::errors::AppResult;
use lifelog::journal_core::DailyRecord;
use lifelog::journal_io::{CorpusLoader, CorpusStats};
use lifelog::ops;
use lifelog::ops::SyncOutcome;
use lifelog::tracker::{FitnessTracker, HttpTracker};
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the stderr subscriber.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, falling back
/// to info.
fn init_tracing(args: &CliArgs) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };
    let registry = tracing_subscriber::registry().with(filter);

    if args.json_logs() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn load_corpus(config: &Config) -> AppResult<Vec<DailyRecord>> {
    let records = CorpusLoader::new(config).load()?;
    let stats = CorpusStats::from_records(&records);
    debug!("Corpus: {:?}", stats);
    println!(
        "Loaded {} days (sleep {}, exercise {}, steps {}, reading {})",
        stats.days, stats.sleep_days, stats.exercise_days, stats.step_days, stats.reading_days
    );
    Ok(records)
}

fn describe(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Written(detail) => format!("written ({})", detail),
        SyncOutcome::AlreadyPresent => "already recorded".to_string(),
        SyncOutcome::MissingEntry => "no journal entry".to_string(),
        SyncOutcome::NoData => "no data".to_string(),
    }
}

fn run_sync(config: &Config, date: NaiveDate, today: NaiveDate, skip_tracker: bool) -> AppResult<()> {
    let tracker = match (&config.tracker_url, skip_tracker) {
        (_, true) => None,
        (Some(url), false) => Some(HttpTracker::new(url.as_str(), config.tracker_token.clone())),
        (None, false) => {
            warn!("Fitness tracker not configured, skipping steps and runs");
            None
        }
    };

    if let Some(tracker) = &tracker {
        let tracker: &dyn FitnessTracker = tracker;
        let steps = ops::sync_steps(config, tracker, date)?;
        println!("{} steps: {}", date, describe(&steps));
        let runs = ops::sync_runs(config, tracker, date)?;
        println!("{} runs: {}", date, describe(&runs));
    }

    let note = ops::sync_reading_note(config, today)?;
    println!("Reading note: {}", describe(&note));
    Ok(())
}

fn run(args: &CliArgs, config: &Config, today: NaiveDate) -> AppResult<()> {
    let date = args.command.resolve_date(today)?;

    match &args.command {
        Commands::Dashboard { .. } => {
            let records = load_corpus(config)?;
            let returned = ops::returned_source(config);
            let reading = ops::build_reading_summary(config, &records, returned.as_ref())?;
            let output = ops::generate_dashboard(config, &records, &reading, date)?;
            println!("Sleep report: {}", output.sleep_report.display());
            for page in &output.pages {
                println!("Page: {}", page.display());
            }
        }
        Commands::Weekly { .. } => {
            let records = load_corpus(config)?;
            match ops::generate_weekly_report(config, &records, date)? {
                Some((summary, path)) => println!(
                    "Weekly report W{} ({} days): {}",
                    summary.week_number,
                    summary.days,
                    path.display()
                ),
                None => println!("No journal data for the week before {}", date),
            }
        }
        Commands::Monthly { .. } => {
            let target = args.command.target_month()?;
            let records = load_corpus(config)?;
            let (trend, path) = ops::generate_monthly_trend(config, &records, target)?;
            println!("Monthly trend {}: {}", trend.current.month, path.display());
        }
        Commands::Analyze { .. } => {
            let records = load_corpus(config)?;
            let (report, path) = ops::generate_correlation_report(config, &records, date)?;
            println!(
                "Correlation analysis ({} nights, {} findings): {}",
                report.sleep_days,
                report.findings.len(),
                path.display()
            );
            for (rank, finding) in report.findings.iter().take(3).enumerate() {
                println!("  {}. {}: {}", rank + 1, finding.title, finding.insight);
            }
        }
        Commands::Books => {
            let records = load_corpus(config)?;
            let returned = ops::returned_source(config);
            let summary = ops::build_reading_summary(config, &records, returned.as_ref())?;
            print!("{}", ops::render_book_listing(&summary));
        }
        Commands::Sync { skip_tracker, .. } => {
            run_sync(config, date, today, *skip_tracker)?;
        }
        Commands::FixReading { dry_run } => {
            let fixes = ops::mark_finished_books(config, *dry_run)?;
            for fix in &fixes {
                println!("{}: {} -> {}", fix.date, fix.old_line.trim(), fix.new_line.trim());
            }
            let suffix = if *dry_run { " (dry run, nothing written)" } else { "" };
            println!("{} reading lines fixed{}", fixes.len(), suffix);
        }
    }
    Ok(())
}

fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_tracing(&args);

    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        command = args.command.name()
    );
    let _guard = span.enter();

    // Obtain the current date once so every report in a run agrees on it
    let today = Local::now().naive_local().date();
    info!("Starting {} for {}", args.command.name(), today);

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    run(&args, &config, today)?;

    info!("Finished {}", args.command.name());
    Ok(())
}
