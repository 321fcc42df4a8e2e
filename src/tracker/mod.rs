//! External data sources consulted by the sync and reading operations.
//!
//! Both sources sit behind narrow traits so operations can be exercised with
//! in-memory stand-ins:
//!
//! - [`FitnessTracker`]: daily step totals and recorded activities
//! - [`ReturnedTitles`]: library books that went back unfinished

pub mod http;
pub mod returned;

use crate::constants::RUNNING_LABEL;
use crate::errors::AppResult;
use crate::stats::round_to;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

pub use http::HttpTracker;
pub use returned::{load_excluded_titles, JsonReturnedTitles, NoReturnedTitles};

/// One day of tracker data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailySummary {
    #[serde(rename = "totalSteps", default)]
    pub steps: Option<u64>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl DailySummary {
    pub fn runs(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter().filter(|a| a.is_run())
    }
}

/// A recorded workout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Activity {
    #[serde(rename = "activityName", default)]
    pub name: String,
    #[serde(rename = "activityType", default)]
    pub activity_type: String,
    /// Metres.
    #[serde(rename = "distance", default)]
    pub distance_m: f64,
    /// Seconds.
    #[serde(rename = "duration", default)]
    pub duration_s: f64,
    #[serde(rename = "averageHR", default)]
    pub avg_hr: Option<u32>,
}

impl Activity {
    pub fn is_run(&self) -> bool {
        self.activity_type.to_lowercase().contains("running") || self.name.contains(RUNNING_LABEL)
    }

    pub fn distance_km(&self) -> f64 {
        round_to(self.distance_m / 1000.0, 2)
    }

    pub fn duration_min(&self) -> f64 {
        round_to(self.duration_s / 60.0, 1)
    }

    /// Minutes and seconds per kilometre, when both distance and time are known.
    pub fn pace(&self) -> Option<(u32, u32)> {
        let (km, min) = (self.distance_km(), self.duration_min());
        if km <= 0.0 || min <= 0.0 {
            return None;
        }
        let pace = min / km;
        let whole = pace.trunc();
        Some((whole as u32, ((pace - whole) * 60.0) as u32))
    }
}

/// A source of daily fitness data.
pub trait FitnessTracker {
    /// Returns `Ok(None)` when the tracker has nothing for `date`.
    fn fetch_daily_summary(&self, date: NaiveDate) -> AppResult<Option<DailySummary>>;
}

/// A source of library titles returned without being finished.
pub trait ReturnedTitles {
    fn fetch_returned_titles(&self) -> AppResult<HashSet<String>>;
}
