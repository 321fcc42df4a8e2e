use chrono::NaiveDate;
use std::fs;

use lifelog::journal_io::{CorpusLoader, CorpusStats};
use lifelog::ops::{self, SyncOutcome};
use lifelog::stats::sleep::SleepReport;
use lifelog::stats::weekly::WeeklySummary;
use lifelog::tracker::{HttpTracker, NoReturnedTitles};
use lifelog::Config;

use test_helpers::SampleVault;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config_for(vault: &SampleVault) -> Config {
    Config::for_vault(vault.root().to_path_buf(), vault.journal())
}

#[test]
fn test_two_note_corpus_sleep_report() {
    let vault = SampleVault::new();
    let records = CorpusLoader::from_dir(vault.journal()).load().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sleep_hours, Some(7.5));
    assert_eq!(records[0].score(), Some(88));
    assert_eq!(records[0].steps, Some(8000));
    assert_eq!(records[1].sleep_hours, Some(6.0));

    let report = SleepReport::build(&records, date(2026, 2, 2));
    let weekly = report.weekly.expect("two nights inside the window");
    assert_eq!(weekly.avg_hours, 6.75);
    assert_eq!(weekly.best_day, date(2026, 2, 1));
    assert_eq!(weekly.days, 2);
}

#[test]
fn test_unrecognised_files_are_ignored() {
    let vault = SampleVault::new();
    vault.write_note("README.md", "sleep: 9\n");
    vault.write_note("2026-02-03.txt", "---\nsleep: 9\n---\n");
    vault.write_note("2026-02-04_empty.md", "nothing to extract\n");

    let records = CorpusLoader::from_dir(vault.journal()).load().unwrap();

    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2026, 2, 1), date(2026, 2, 2)]);
}

#[test]
fn test_reloading_unchanged_corpus_is_stable() {
    let vault = SampleVault::new();
    let loader = CorpusLoader::from_dir(vault.journal());

    let first = loader.load().unwrap();
    let second = loader.load().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        CorpusStats::from_records(&first),
        CorpusStats::from_records(&second)
    );
    assert_eq!(
        WeeklySummary::build(&first, date(2026, 2, 9)),
        WeeklySummary::build(&second, date(2026, 2, 9))
    );
}

#[test]
fn test_reports_written_atomically_into_vault() {
    let vault = SampleVault::new();
    let config = config_for(&vault);
    let records = CorpusLoader::new(&config).load().unwrap();

    let (_, weekly) = ops::generate_weekly_report(&config, &records, date(2026, 2, 9))
        .unwrap()
        .unwrap();
    let (_, monthly) = ops::generate_monthly_trend(&config, &records, None).unwrap();
    let (_, analysis) = ops::generate_correlation_report(&config, &records, date(2026, 2, 9)).unwrap();

    for path in [weekly, monthly, analysis] {
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("*Generated: "), "{}", path.display());
    }

    let leftovers: Vec<_> = fs::read_dir(vault.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_dashboard_with_both_templates() {
    let vault = SampleVault::new();
    let config = config_for(&vault);
    fs::create_dir_all(&config.template_dir).unwrap();
    fs::write(
        config.template_dir.join("dashboard_template.html"),
        "<main>__REPORT_JSON__</main>",
    )
    .unwrap();
    fs::write(
        config.template_dir.join("sleep_template.html"),
        "<main>__SLEEP_JSON__</main>",
    )
    .unwrap();

    let records = CorpusLoader::new(&config).load().unwrap();
    let reading = ops::build_reading_summary(&config, &records, &NoReturnedTitles).unwrap();
    let output = ops::generate_dashboard(&config, &records, &reading, date(2026, 2, 2)).unwrap();

    assert_eq!(output.pages.len(), 3);
    let sleep_page = fs::read_to_string(config.docs_dir.join("sleep.html")).unwrap();
    assert!(sleep_page.contains("\"2026-02-02\""));
    assert!(!sleep_page.contains("__SLEEP_JSON__"));
    assert!(fs::read_to_string(&output.sleep_report)
        .unwrap()
        .contains("6.75h"));
}

#[test]
fn test_sync_from_mock_tracker() {
    let vault = SampleVault::new();
    let config = config_for(&vault);

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/daily/2026-02-02")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"totalSteps": 10234, "activities": [
                {"activityName": "Morning Run", "activityType": "running",
                 "distance": 5000.0, "duration": 1800.0, "averageHR": 148}
            ]}"#,
        )
        .expect(2)
        .create();
    let tracker = HttpTracker::new(server.url(), None);

    let steps = ops::sync_steps(&config, &tracker, date(2026, 2, 2)).unwrap();
    let runs = ops::sync_runs(&config, &tracker, date(2026, 2, 2)).unwrap();

    mock.assert();
    assert_eq!(steps, SyncOutcome::Written("10,234歩".to_string()));
    assert!(matches!(runs, SyncOutcome::Written(_)));
    assert_eq!(
        vault.read("journal/2026-02-02.md"),
        "---\nsleep: 6.0\n---\n# 2026-02-02\n気分:: 普通\n歩数:: 10,234歩\n- 🏃 ランニング:: 5.0km / 30.0分 / ペース6'00\"/km / ❤️148bpm\n"
    );

    let records = CorpusLoader::new(&config).load().unwrap();
    assert_eq!(records[1].steps, Some(10234));
}

#[test]
fn test_sync_with_unreachable_tracker_leaves_entry_alone() {
    let vault = SampleVault::new();
    let config = config_for(&vault);
    let tracker = HttpTracker::new("http://127.0.0.1:1", None);

    let outcome = ops::sync_steps(&config, &tracker, date(2026, 2, 2)).unwrap();

    assert_eq!(outcome, SyncOutcome::NoData);
    assert_eq!(
        vault.read("journal/2026-02-02.md"),
        test_helpers::NOTE_2026_02_02
    );
}
