//! Output formatting and persistence for forecasts.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::{SampleSeries, Spot};
use crate::scoring::{Label, Scorer};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One scored hour, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub spot: String,
    pub time: DateTime<Utc>,
    pub wave_height: f64,
    pub wave_period: f64,
    pub swell_period: Option<f64>,
    pub wind_speed: f64,
    pub scheme: &'static str,
    pub score: i32,
    pub label: Label,
}

impl ForecastRecord {
    /// Scores every sample of `series` with `scorer`.
    pub fn from_series(spot: &Spot, series: &SampleSeries, scorer: &dyn Scorer) -> Vec<Self> {
        series
            .iter()
            .map(|s| {
                let verdict = scorer.evaluate(&s.conditions);
                ForecastRecord {
                    spot: spot.name.clone(),
                    time: s.time,
                    wave_height: s.conditions.wave_height(),
                    wave_period: s.conditions.wave_period(),
                    swell_period: s.conditions.swell_period(),
                    wind_speed: s.conditions.wind_speed(),
                    scheme: scorer.name(),
                    score: verdict.score,
                    label: verdict.label,
                }
            })
            .collect()
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends [`ForecastRecord`] rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[ForecastRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
