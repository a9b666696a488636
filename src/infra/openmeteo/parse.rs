//! Decoding of Open-Meteo hourly payloads into forecast rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;
use crate::services::forecast_api::{MarineRow, WindRow};

/// Format of `hourly.time` entries when `timezone=GMT` is requested.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
pub struct MarineResponse {
    pub hourly: MarineHourly,
}

#[derive(Debug, Deserialize)]
pub struct MarineHourly {
    pub time: Vec<String>,
    pub wave_height: Vec<Option<f64>>,
    pub wave_period: Vec<Option<f64>>,
    #[serde(default)]
    pub swell_wave_period: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
pub struct WindResponse {
    pub hourly: WindHourly,
}

#[derive(Debug, Deserialize)]
pub struct WindHourly {
    pub time: Vec<String>,
    pub wind_speed_10m: Vec<Option<f64>>,
}

fn parse_time(endpoint: &str, raw: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|e| FetchError::malformed(endpoint, format!("bad timestamp {raw:?}: {e}")))
}

fn check_len(endpoint: &str, field: &str, expected: usize, actual: usize) -> Result<(), FetchError> {
    if expected == actual {
        Ok(())
    } else {
        Err(FetchError::malformed(
            endpoint,
            format!("`{field}` has {actual} values for {expected} timestamps"),
        ))
    }
}

/// Decodes a marine payload.
///
/// # Errors
///
/// Returns [`FetchError::MalformedResponse`] if `hourly` is missing, a
/// timestamp does not parse, or the value arrays do not line up with `time`.
pub fn parse_marine(endpoint: &str, body: &serde_json::Value) -> Result<Vec<MarineRow>, FetchError> {
    let resp = MarineResponse::deserialize(body).map_err(|e| FetchError::malformed(endpoint, e))?;
    let hourly = resp.hourly;
    let n = hourly.time.len();

    check_len(endpoint, "wave_height", n, hourly.wave_height.len())?;
    check_len(endpoint, "wave_period", n, hourly.wave_period.len())?;
    if let Some(swell) = &hourly.swell_wave_period {
        check_len(endpoint, "swell_wave_period", n, swell.len())?;
    }

    hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            Ok(MarineRow {
                time: parse_time(endpoint, raw)?,
                wave_height: hourly.wave_height[i],
                wave_period: hourly.wave_period[i],
                swell_period: hourly.swell_wave_period.as_ref().and_then(|s| s[i]),
            })
        })
        .collect()
}

/// Decodes a wind payload, scaling speeds by `to_kmh`.
///
/// # Errors
///
/// Same conditions as [`parse_marine`].
pub fn parse_wind(
    endpoint: &str,
    body: &serde_json::Value,
    to_kmh: f64,
) -> Result<Vec<WindRow>, FetchError> {
    let resp = WindResponse::deserialize(body).map_err(|e| FetchError::malformed(endpoint, e))?;
    let hourly = resp.hourly;

    check_len(endpoint, "wind_speed_10m", hourly.time.len(), hourly.wind_speed_10m.len())?;

    hourly
        .time
        .iter()
        .zip(hourly.wind_speed_10m)
        .map(|(raw, speed)| {
            Ok(WindRow {
                time: parse_time(endpoint, raw)?,
                wind_speed: speed.map(|s| s * to_kmh),
            })
        })
        .collect()
}
