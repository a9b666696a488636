//! Core data types: spots, scored conditions, hourly samples and series.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// A named surf spot with fixed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webcam: Option<String>,
}

impl Spot {
    pub fn new(name: &str, lat: f64, lon: f64, webcam: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            webcam: webcam.map(str::to_string),
        }
    }

    /// Returns `true` if the coordinates fall in the valid lat/lon ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Sea and wind state for one hour, validated for scoring.
///
/// Wind speed is always stored in km/h regardless of the unit requested
/// upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conditions {
    wave_height: f64,
    wave_period: f64,
    wind_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    swell_period: Option<f64>,
}

fn check(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidInput { field, value })
    }
}

impl Conditions {
    /// Builds conditions, rejecting negative or non-finite readings.
    pub fn new(wave_height: f64, wave_period: f64, wind_speed: f64) -> Result<Self, InvalidInput> {
        Ok(Self {
            wave_height: check("wave_height", wave_height)?,
            wave_period: check("wave_period", wave_period)?,
            wind_speed: check("wind_speed", wind_speed)?,
            swell_period: None,
        })
    }

    /// Attaches the swell-specific period, when the provider reports one.
    pub fn with_swell_period(mut self, swell_period: f64) -> Result<Self, InvalidInput> {
        self.swell_period = Some(check("swell_period", swell_period)?);
        Ok(self)
    }

    pub fn wave_height(&self) -> f64 {
        self.wave_height
    }

    pub fn wave_period(&self) -> f64 {
        self.wave_period
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn swell_period(&self) -> Option<f64> {
        self.swell_period
    }
}

/// One hourly observation produced by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub conditions: Conditions,
}

/// Samples ordered strictly by timestamp, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SampleSeries(Vec<Sample>);

impl SampleSeries {
    /// Sorts by time and drops later duplicates of the same timestamp.
    pub fn from_samples(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.time);
        samples.dedup_by_key(|s| s.time);
        Self(samples)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SampleSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Inclusive range of calendar days (UTC) requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `days` calendar days starting with the day of `now`. At least one day;
    /// the end saturates at the last representable date.
    pub fn from_today(now: DateTime<Utc>, days: u32) -> Self {
        let start = now.date_naive();
        let span = Days::new(u64::from(days.max(1)) - 1);
        Self {
            start,
            end: start.checked_add_days(span).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Truncates an instant to the start of its hour.
pub fn truncate_to_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(now)
}
