//! What influences sleep duration: each finding compares sleep hours across
//! a partition of the corpus, and findings are ranked by the size of the
//! difference.

use super::sleep::{weekday_name, WEEKDAYS};
use super::{mean, YearMonth};
use crate::constants::MIN_PAIRED_SAMPLES;
use crate::journal_core::DailyRecord;
use chrono::{Datelike, Duration};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Samples needed before step counts are split into terciles.
const MIN_STEP_SAMPLES: usize = 10;
/// Consecutive night pairs needed before the rebound effect is judged.
const MIN_REBOUND_PAIRS: usize = 10;
/// Months needed before a long-term trend is reported.
const MIN_TREND_MONTHS: usize = 4;
/// Books read in a day counted as a heavy reading day.
const HEAVY_READING_BOOKS: usize = 3;
/// Fixed rank of the distribution finding, which has no natural effect size.
const DISTRIBUTION_IMPACT: f64 = 8.0;
const EARLY_BEDTIME: f64 = 23.0;
const MIDNIGHT: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    Bedtime,
    Exercise,
    Steps,
    Weekday,
    Rebound,
    Reading,
    Distribution,
    LongTermTrend,
}

/// One ranked observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub title: String,
    pub insight: String,
    pub detail: String,
    /// Size of the effect in hours, used for ranking.
    pub impact: f64,
    pub recommendation: String,
}

/// Sleep-hour ranges used for the distribution, as half-open bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HourBin {
    Under5,
    From5To6,
    From6To7,
    From7To8,
    From8To9,
    Over9,
}

impl HourBin {
    pub const ALL: [HourBin; 6] = [
        HourBin::Under5,
        HourBin::From5To6,
        HourBin::From6To7,
        HourBin::From7To8,
        HourBin::From8To9,
        HourBin::Over9,
    ];

    pub fn of(hours: f64) -> Self {
        match hours {
            h if h < 5.0 => HourBin::Under5,
            h if h < 6.0 => HourBin::From5To6,
            h if h < 7.0 => HourBin::From6To7,
            h if h < 8.0 => HourBin::From7To8,
            h if h < 9.0 => HourBin::From8To9,
            _ => HourBin::Over9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HourBin::Under5 => "<5h",
            HourBin::From5To6 => "5-6h",
            HourBin::From6To7 => "6-7h",
            HourBin::From7To8 => "7-8h",
            HourBin::From8To9 => "8-9h",
            HourBin::Over9 => "9h+",
        }
    }
}

/// The ranked findings over a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub sleep_days: usize,
    pub scored_days: usize,
    /// Sorted by impact, largest first.
    pub findings: Vec<Finding>,
}

impl CorrelationReport {
    pub fn build(records: &[DailyRecord]) -> Self {
        let slept: Vec<&DailyRecord> = records.iter().filter(|r| r.sleep_hours.is_some()).collect();

        let mut findings: Vec<Finding> = [
            bedtime_finding(&slept),
            exercise_finding(&slept),
            steps_finding(&slept),
            weekday_finding(&slept),
            rebound_finding(records),
            reading_finding(&slept),
            distribution_finding(&slept),
            long_term_finding(&slept),
        ]
        .into_iter()
        .flatten()
        .collect();

        findings.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(Ordering::Equal));

        CorrelationReport {
            sleep_days: slept.len(),
            scored_days: slept.iter().filter(|r| r.score().is_some()).count(),
            findings,
        }
    }
}

fn hours_of(records: &[&DailyRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.sleep_hours).collect()
}

fn avg_hours(records: &[&DailyRecord]) -> Option<f64> {
    mean(&hours_of(records))
}

fn scores_of(records: &[&DailyRecord]) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.score())
        .map(f64::from)
        .collect()
}

fn fmt_hours(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |h| format!("{:.1}h", h))
}

/// Score means of two partitions, only when both have enough samples.
fn paired_scores(a: &[&DailyRecord], b: &[&DailyRecord]) -> Option<(f64, f64)> {
    let (a, b) = (scores_of(a), scores_of(b));
    if a.len() < MIN_PAIRED_SAMPLES || b.len() < MIN_PAIRED_SAMPLES {
        return None;
    }
    mean(&a).zip(mean(&b))
}

/// Compares sleep on days with and without some activity.
fn paired_comparison(
    with: &[&DailyRecord],
    without: &[&DailyRecord],
    with_name: &str,
    without_name: &str,
) -> Option<(String, f64, bool)> {
    let (ha, hb) = (avg_hours(with)?, avg_hours(without)?);
    let mut insight = format!(
        "{} **{:.1}h** / {} **{:.1}h**",
        with_name, ha, without_name, hb
    );
    if let Some((sa, sb)) = paired_scores(with, without) {
        insight.push_str(&format!(" (score: {:.0} vs {:.0})", sa, sb));
    }
    Some((insight, (ha - hb).abs(), ha > hb))
}

fn bedtime_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let timed: Vec<(&DailyRecord, f64)> = slept
        .iter()
        .filter_map(|r| r.bedtime_hours().map(|bt| (*r, bt)))
        .collect();
    if timed.is_empty() {
        return None;
    }

    let bucket = |keep: fn(f64) -> bool| {
        timed
            .iter()
            .filter(|(_, bt)| keep(*bt))
            .map(|(r, _)| *r)
            .collect::<Vec<_>>()
    };
    let early = bucket(|bt| bt <= EARLY_BEDTIME);
    let mid = bucket(|bt| bt > EARLY_BEDTIME && bt <= MIDNIGHT);
    let late = bucket(|bt| bt > MIDNIGHT);
    let (eh, mh, lh) = (avg_hours(&early), avg_hours(&mid), avg_hours(&late));

    let mut insight = format!(
        "Before 23:00 **{}** ({} nights) / 23:00-24:00 **{}** ({} nights) / after midnight **{}** ({} nights)",
        fmt_hours(eh),
        early.len(),
        fmt_hours(mh),
        mid.len(),
        fmt_hours(lh),
        late.len()
    );
    if let Some((es, ls)) = paired_scores(&early, &late) {
        insight.push_str(&format!(
            "\n  Score: before 23:00 **{:.0}** / after midnight **{:.0}**",
            es, ls
        ));
    }

    let earlier_is_longer = matches!((eh, lh), (Some(e), Some(l)) if e > l);
    Some(Finding {
        kind: FindingKind::Bedtime,
        title: "Bedtime vs sleep duration".to_string(),
        insight,
        detail: String::new(),
        impact: match (eh, lh) {
            (Some(e), Some(l)) => (e - l).abs(),
            _ => 0.0,
        },
        recommendation: if earlier_is_longer {
            "Going to bed earlier means sleeping longer".to_string()
        } else {
            "Bedtime and sleep duration are only weakly related".to_string()
        },
    })
}

fn exercise_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let (with, without): (Vec<&DailyRecord>, Vec<&DailyRecord>) =
        slept.iter().copied().partition(|r| r.has_exercise());
    let (insight, impact, longer) =
        paired_comparison(&with, &without, "Exercise days", "Rest days")?;

    Some(Finding {
        kind: FindingKind::Exercise,
        title: "Exercise vs sleep".to_string(),
        insight,
        detail: format!("({} days vs {} days)", with.len(), without.len()),
        impact,
        recommendation: if longer {
            "Exercise days come with longer sleep".to_string()
        } else {
            "Exercise has little effect on sleep duration".to_string()
        },
    })
}

fn steps_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let mut stepped: Vec<&DailyRecord> = slept
        .iter()
        .copied()
        .filter(|r| r.tracked_steps().is_some())
        .collect();
    if stepped.len() < MIN_STEP_SAMPLES {
        return None;
    }
    stepped.sort_by_key(|r| r.tracked_steps());

    let n = stepped.len();
    let (low, rest) = stepped.split_at(n / 3);
    let (mid, high) = rest.split_at(2 * n / 3 - n / 3);
    let avg_steps = |records: &[&DailyRecord]| -> f64 {
        let steps: Vec<f64> = records
            .iter()
            .filter_map(|r| r.tracked_steps())
            .map(|s| s as f64)
            .collect();
        mean(&steps).unwrap_or(0.0)
    };

    let (lh, mh, hh) = (avg_hours(low)?, avg_hours(mid)?, avg_hours(high)?);
    Some(Finding {
        kind: FindingKind::Steps,
        title: "Steps vs sleep".to_string(),
        insight: format!(
            "Fewest steps ({:.0}) **{:.1}h** / middle **{:.1}h** / most steps ({:.0}) **{:.1}h**",
            avg_steps(low),
            lh,
            mh,
            avg_steps(high),
            hh
        ),
        detail: format!("({}/{}/{} days)", low.len(), mid.len(), high.len()),
        impact: (hh - lh).abs(),
        recommendation: if hh > lh {
            "Walking more comes with longer sleep".to_string()
        } else {
            "Step count has little effect on sleep duration".to_string()
        },
    })
}

fn weekday_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let averages: Vec<(chrono::Weekday, f64)> = WEEKDAYS
        .iter()
        .filter_map(|weekday| {
            let hours: Vec<f64> = slept
                .iter()
                .filter(|r| r.date.weekday() == *weekday)
                .filter_map(|r| r.sleep_hours)
                .collect();
            mean(&hours).map(|avg| (*weekday, avg))
        })
        .collect();

    let first = *averages.first()?;
    let best = averages
        .iter()
        .fold(first, |best, cur| if cur.1 > best.1 { *cur } else { best });
    let worst = averages
        .iter()
        .fold(first, |worst, cur| if cur.1 < worst.1 { *cur } else { worst });

    Some(Finding {
        kind: FindingKind::Weekday,
        title: "Weekday vs sleep duration".to_string(),
        insight: format!(
            "Best: **{} {:.1}h** / worst: **{} {:.1}h**",
            weekday_name(best.0),
            best.1,
            weekday_name(worst.0),
            worst.1
        ),
        detail: averages
            .iter()
            .map(|(weekday, avg)| format!("{}: {:.1}h", &weekday_name(*weekday)[..3], avg))
            .collect::<Vec<_>>()
            .join(" / "),
        impact: best.1 - worst.1,
        recommendation: format!(
            "Sleep tends to be short on {}. Look for the cause",
            weekday_name(worst.0)
        ),
    })
}

fn rebound_finding(records: &[DailyRecord]) -> Option<Finding> {
    let mut pairs: Vec<(f64, f64)> = records
        .windows(2)
        .filter_map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.date - prev.date != Duration::days(1) {
                return None;
            }
            prev.sleep_hours.zip(next.sleep_hours)
        })
        .collect();
    if pairs.len() < MIN_REBOUND_PAIRS {
        return None;
    }
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let n = pairs.len();
    let short = &pairs[..n / 3];
    let long = &pairs[2 * n / 3..];
    let avg_of = |pairs: &[(f64, f64)], pick: fn(&(f64, f64)) -> f64| -> f64 {
        mean(&pairs.iter().map(pick).collect::<Vec<_>>()).unwrap_or(0.0)
    };
    let short_next = avg_of(short, |p| p.1);
    let long_next = avg_of(long, |p| p.1);

    Some(Finding {
        kind: FindingKind::Rebound,
        title: "Previous night vs next night".to_string(),
        insight: format!(
            "After short nights ({:.1}h) **{:.1}h** / after long nights ({:.1}h) **{:.1}h**",
            avg_of(short, |p| p.0),
            short_next,
            avg_of(long, |p| p.0),
            long_next
        ),
        detail: format!("({}/{} pairs)", short.len(), long.len()),
        impact: (long_next - short_next).abs(),
        recommendation: if short_next > long_next {
            "A short night is followed by a longer one (rebound effect)".to_string()
        } else {
            "The previous night's sleep carries over to the next".to_string()
        },
    })
}

fn reading_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let (with, without): (Vec<&DailyRecord>, Vec<&DailyRecord>) =
        slept.iter().copied().partition(|r| r.has_books());
    let (insight, impact, longer) =
        paired_comparison(&with, &without, "Reading days", "Other days")?;

    let heavy: Vec<&DailyRecord> = with
        .iter()
        .copied()
        .filter(|r| r.books.len() >= HEAVY_READING_BOOKS)
        .collect();
    let detail = avg_hours(&heavy)
        .map(|h| {
            format!(
                "Days with {}+ books: **{:.1}h** ({} days)",
                HEAVY_READING_BOOKS,
                h,
                heavy.len()
            )
        })
        .unwrap_or_default();

    Some(Finding {
        kind: FindingKind::Reading,
        title: "Reading vs sleep".to_string(),
        insight,
        detail,
        impact,
        recommendation: if longer {
            "Reading days come with longer sleep".to_string()
        } else {
            "Reading and sleep show no direct correlation".to_string()
        },
    })
}

fn distribution_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let mut bins: BTreeMap<HourBin, Vec<&DailyRecord>> = BTreeMap::new();
    for record in slept.iter().copied() {
        if let Some(hours) = record.sleep_hours {
            bins.entry(HourBin::of(hours)).or_default().push(record);
        }
    }
    let total = slept.len() as f64;

    let mut most_common: Option<(HourBin, usize)> = None;
    let mut parts = Vec::new();
    for bin in HourBin::ALL {
        let Some(members) = bins.get(&bin) else {
            continue;
        };
        let count = members.len();
        if most_common.map_or(true, |(_, best)| count > best) {
            most_common = Some((bin, count));
        }

        let mut part = format!(
            "{}: {} days ({:.0}%)",
            bin.label(),
            count,
            count as f64 / total * 100.0
        );
        let scores = scores_of(members);
        if scores.len() >= MIN_PAIRED_SAMPLES {
            if let Some(avg) = mean(&scores) {
                part.push_str(&format!(" (avg score {:.0})", avg));
            }
        }
        parts.push(part);
    }

    let (bin, count) = most_common?;
    Some(Finding {
        kind: FindingKind::Distribution,
        title: "Sleep duration distribution".to_string(),
        insight: format!(
            "Most common range: **{}** ({} days / {:.0}%)",
            bin.label(),
            count,
            count as f64 / total * 100.0
        ),
        detail: parts.join(" / "),
        impact: DISTRIBUTION_IMPACT,
        recommendation: format!("Your main sleep zone is {}", bin.label()),
    })
}

fn long_term_finding(slept: &[&DailyRecord]) -> Option<Finding> {
    let mut by_month: BTreeMap<YearMonth, Vec<f64>> = BTreeMap::new();
    for record in slept {
        if let Some(hours) = record.sleep_hours {
            by_month
                .entry(YearMonth::of(record.date))
                .or_default()
                .push(hours);
        }
    }
    if by_month.len() < MIN_TREND_MONTHS {
        return None;
    }

    let monthly: Vec<(YearMonth, f64)> = by_month
        .iter()
        .filter_map(|(month, hours)| mean(hours).map(|avg| (*month, avg)))
        .collect();
    let averages: Vec<f64> = monthly.iter().map(|(_, avg)| *avg).collect();
    let (first, second) = averages.split_at(averages.len() / 2);
    let (first_half, second_half) = (mean(first)?, mean(second)?);

    Some(Finding {
        kind: FindingKind::LongTermTrend,
        title: "Long-term sleep trend".to_string(),
        insight: format!(
            "First half average **{:.1}h** -> second half average **{:.1}h**",
            first_half, second_half
        ),
        detail: monthly
            .iter()
            .map(|(month, avg)| format!("{}: {:.1}h", month, avg))
            .collect::<Vec<_>>()
            .join(" / "),
        impact: (second_half - first_half).abs(),
        recommendation: if second_half > first_half {
            "Sleep duration is improving".to_string()
        } else {
            "Sleep duration is declining. Keep an eye on it".to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn kinds(report: &CorrelationReport) -> Vec<FindingKind> {
        report.findings.iter().map(|f| f.kind).collect()
    }

    fn find(report: &CorrelationReport, kind: FindingKind) -> &Finding {
        report
            .findings
            .iter()
            .find(|f| f.kind == kind)
            .expect("finding should be present")
    }

    #[test]
    fn test_empty_corpus_has_no_findings() {
        let report = CorrelationReport::build(&[]);
        assert!(report.findings.is_empty());
        assert_eq!(report.sleep_days, 0);
    }

    #[test]
    fn test_findings_are_sorted_by_impact() {
        let records = vec![
            with_exercise(sleep(date(2026, 2, 2), 8.0), 10),
            sleep(date(2026, 2, 3), 6.0),
        ];
        let report = CorrelationReport::build(&records);

        let impacts: Vec<f64> = report.findings.iter().map(|f| f.impact).collect();
        let mut sorted = impacts.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(impacts, sorted);
        assert_eq!(report.findings[0].kind, FindingKind::Distribution);
    }

    #[test]
    fn test_exercise_partition_without_enough_scores() {
        let records = vec![
            with_exercise(scored(date(2026, 2, 2), 8.0, 90), 10),
            scored(date(2026, 2, 3), 6.0, 70),
            sleep(date(2026, 2, 4), 7.0),
        ];
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Exercise);

        assert_eq!(finding.impact, 1.5);
        assert!(!finding.insight.contains("score"));
        assert_eq!(finding.detail, "(1 days vs 2 days)");
    }

    #[test]
    fn test_paired_scores_need_three_per_side() {
        let mut records = Vec::new();
        for day in 1..=3 {
            records.push(with_exercise(scored(date(2026, 2, day), 8.0, 90), 5));
        }
        for day in 4..=6 {
            records.push(scored(date(2026, 2, day), 6.0, 80));
        }
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Exercise);
        assert!(finding.insight.contains("(score: 90 vs 80)"));
    }

    #[test]
    fn test_distribution_ties_go_to_first_bin() {
        let records = vec![
            sleep(date(2026, 2, 1), 8.5),
            sleep(date(2026, 2, 2), 6.5),
            sleep(date(2026, 2, 3), 8.2),
            sleep(date(2026, 2, 4), 6.1),
        ];
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Distribution);

        assert!(finding.insight.contains("**6-7h**"));
        assert_eq!(finding.detail, "6-7h: 2 days (50%) / 8-9h: 2 days (50%)");
    }

    #[test]
    fn test_hour_bins_are_half_open() {
        assert_eq!(HourBin::of(4.99), HourBin::Under5);
        assert_eq!(HourBin::of(5.0), HourBin::From5To6);
        assert_eq!(HourBin::of(7.0), HourBin::From7To8);
        assert_eq!(HourBin::of(9.0), HourBin::Over9);
    }

    #[test]
    fn test_steps_need_ten_samples() {
        let few: Vec<DailyRecord> = (1..=9)
            .map(|day| with_steps(sleep(date(2026, 2, day), 7.0), 1000 * u64::from(day)))
            .collect();
        assert!(!kinds(&CorrelationReport::build(&few)).contains(&FindingKind::Steps));

        let enough: Vec<DailyRecord> = (1..=12)
            .map(|day| {
                let hours = if day > 8 { 8.0 } else { 6.0 };
                with_steps(sleep(date(2026, 2, day), hours), 1000 * u64::from(day))
            })
            .collect();
        let report = CorrelationReport::build(&enough);
        let finding = find(&report, FindingKind::Steps);
        assert_eq!(finding.detail, "(4/4/4 days)");
        assert_eq!(finding.impact, 2.0);
    }

    #[test]
    fn test_rebound_uses_calendar_consecutive_pairs() {
        // Alternating short and long nights over 12 consecutive days gives 11 pairs
        let records: Vec<DailyRecord> = (1..=12)
            .map(|day| sleep(date(2026, 2, day), if day % 2 == 0 { 8.0 } else { 5.0 }))
            .collect();
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Rebound);
        assert!(finding.recommendation.contains("rebound"));

        // A gap breaks the pairs
        let gapped: Vec<DailyRecord> = (1..=12)
            .map(|day| sleep(date(2026, 2, day * 2), 7.0))
            .collect();
        assert!(!kinds(&CorrelationReport::build(&gapped)).contains(&FindingKind::Rebound));
    }

    #[test]
    fn test_bedtime_buckets() {
        let records = vec![
            with_bedtime(sleep(date(2026, 2, 1), 8.0), 22, 30),
            with_bedtime(sleep(date(2026, 2, 2), 7.0), 23, 30),
            with_bedtime(sleep(date(2026, 2, 3), 5.5), 1, 0),
        ];
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Bedtime);
        assert_eq!(finding.impact, 2.5);
        assert!(finding.recommendation.starts_with("Going to bed earlier"));
    }

    #[test]
    fn test_long_term_trend_needs_four_months() {
        let records = vec![
            sleep(date(2025, 11, 1), 6.0),
            sleep(date(2025, 12, 1), 6.0),
            sleep(date(2026, 1, 1), 7.0),
        ];
        assert!(
            !kinds(&CorrelationReport::build(&records)).contains(&FindingKind::LongTermTrend)
        );

        let mut records = records;
        records.push(sleep(date(2026, 2, 1), 8.0));
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::LongTermTrend);
        assert_eq!(finding.impact, 1.5);
        assert_eq!(finding.recommendation, "Sleep duration is improving");
    }

    #[test]
    fn test_reading_heavy_days_detail() {
        let mut heavy = sleep(date(2026, 2, 1), 8.0);
        for title in ["A", "B", "C"] {
            heavy = with_book(heavy, title, false);
        }
        let records = vec![heavy, sleep(date(2026, 2, 2), 6.0)];
        let report = CorrelationReport::build(&records);
        let finding = find(&report, FindingKind::Reading);
        assert_eq!(finding.detail, "Days with 3+ books: **8.0h** (1 days)");
    }
}
