//! AlAdhan prayer-times API client
//!
//! This module provides functionality to fetch daily prayer times from the
//! AlAdhan API and parse them into our PrayerTimes data structure.

use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::error::{Classify, Failure};

/// Base URL for the AlAdhan API
const ALADHAN_BASE_URL: &str = "https://api.aladhan.com/v1";

/// Default calculation method (2 = Islamic Society of North America)
const DEFAULT_METHOD: u8 = 2;

/// The daily prayer schedule for one location and date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    /// The calendar date these times apply to
    pub date: NaiveDate,
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

/// Errors that can occur when fetching prayer times
#[derive(Debug, Error)]
pub enum PrayerApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP request failed with status {status}")]
    HttpStatus { status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected timing in response
    #[error("Missing expected timing in response: {0}")]
    MissingTiming(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

impl Classify for PrayerApiError {
    fn failure(&self) -> Failure {
        match self {
            Self::RequestFailed(e) => e.failure(),
            Self::HttpStatus { status } => Failure::Http { status: *status },
            other => Failure::Unknown {
                message: other.to_string(),
            },
        }
    }
}

/// Client for fetching prayer times from the AlAdhan API
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    base_url: String,
    method: u8,
}

impl Default for AladhanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AladhanClient {
    /// Create a new AladhanClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: ALADHAN_BASE_URL.to_string(),
            method: DEFAULT_METHOD,
        }
    }

    /// Create a new AladhanClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: ALADHAN_BASE_URL.to_string(),
            method: DEFAULT_METHOD,
        }
    }

    /// Create a new AladhanClient with a custom base URL
    ///
    /// Useful for testing or routing through a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a new AladhanClient with a custom calculation method
    pub fn with_method(mut self, method: u8) -> Self {
        self.method = method;
        self
    }

    /// Fetch prayer times for the given coordinates and date
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    /// * `date` - The calendar date to fetch times for
    ///
    /// # Returns
    /// * `Ok(PrayerTimes)` - Prayer schedule for the location and date
    /// * `Err(PrayerApiError)` - If the request or parsing fails
    pub async fn fetch_timings(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<PrayerTimes, PrayerApiError> {
        let url = format!(
            "{}/timings/{}?latitude={}&longitude={}&method={}",
            self.base_url,
            date.format("%d-%m-%Y"),
            lat,
            lon,
            self.method
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PrayerApiError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let api_response: AladhanResponse = serde_json::from_str(&text)?;

        parse_timings(&api_response.data.timings, date)
    }
}

/// Parse the AlAdhan timings map into a PrayerTimes struct
fn parse_timings(
    timings: &HashMap<String, String>,
    date: NaiveDate,
) -> Result<PrayerTimes, PrayerApiError> {
    let timing = |name: &str| -> Result<NaiveTime, PrayerApiError> {
        let raw = timings
            .get(name)
            .ok_or_else(|| PrayerApiError::MissingTiming(name.to_string()))?;
        parse_time(raw)
    };

    Ok(PrayerTimes {
        date,
        fajr: timing("Fajr")?,
        sunrise: timing("Sunrise")?,
        dhuhr: timing("Dhuhr")?,
        asr: timing("Asr")?,
        maghrib: timing("Maghrib")?,
        isha: timing("Isha")?,
    })
}

/// Parse a timing string in "HH:MM" format to NaiveTime
///
/// AlAdhan appends the UTC offset in some configurations (e.g., "05:02 (+03)"),
/// so everything after the first space is ignored.
fn parse_time(raw: &str) -> Result<NaiveTime, PrayerApiError> {
    let time_part = raw.split_whitespace().next().unwrap_or(raw);

    NaiveTime::parse_from_str(time_part, "%H:%M")
        .map_err(|_| PrayerApiError::InvalidTimeFormat(raw.to_string()))
}

/// AlAdhan API response structure
#[derive(Debug, Deserialize)]
struct AladhanResponse {
    data: AladhanData,
}

/// Payload portion of the AlAdhan response
#[derive(Debug, Deserialize)]
struct AladhanData {
    timings: HashMap<String, String>,
}
