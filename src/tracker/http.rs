//! Blocking HTTP client for the fitness tracker API.

use super::{DailySummary, FitnessTracker};
use crate::constants::DATE_FORMAT_ISO;
use crate::errors::{AppResult, TrackerError};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

/// Client for a tracker exposing `GET {base_url}/daily/{YYYY-MM-DD}`.
pub struct HttpTracker {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpTracker {
    /// Creates a new tracker client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the tracker API (e.g., "http://127.0.0.1:8080")
    /// * `token` - Optional bearer token sent with every request
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }
}

impl FitnessTracker for HttpTracker {
    /// Fetches the summary of one day.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the tracker API is not reachable
    /// - the API answers with an error status other than 404
    /// - the body is not a daily summary
    fn fetch_daily_summary(&self, date: NaiveDate) -> AppResult<Option<DailySummary>> {
        let url = format!("{}/daily/{}", self.base_url, date.format(DATE_FORMAT_ISO));
        debug!("Fetching tracker summary: {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(TrackerError::Offline)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Tracker has no data for {}", date);
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(
                TrackerError::InvalidResponse(format!("HTTP {}: {}", status, error_text)).into(),
            );
        }

        let summary: DailySummary = response.json().map_err(|e| {
            TrackerError::InvalidResponse(format!("Failed to parse daily summary: {}", e))
        })?;

        debug!(
            "Tracker summary for {}: steps={:?}, {} activities",
            date,
            summary.steps,
            summary.activities.len()
        );
        Ok(Some(summary))
    }
}
