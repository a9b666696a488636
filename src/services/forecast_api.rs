//! Trait and row types for hourly marine and wind forecast providers.

use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::model::{DateWindow, Spot};

/// One hour of marine data. `None` means the provider had no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarineRow {
    pub time: DateTime<Utc>,
    pub wave_height: Option<f64>,
    pub wave_period: Option<f64>,
    pub swell_period: Option<f64>,
}

/// One hour of wind data, in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindRow {
    pub time: DateTime<Utc>,
    pub wind_speed: Option<f64>,
}

/// Abstraction over a forecast provider (e.g., Open-Meteo).
///
/// Both calls are idempotent reads and must report times in UTC so the
/// two series can be joined on exact timestamps.
#[async_trait::async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_marine(&self, spot: &Spot, window: DateWindow)
        -> Result<Vec<MarineRow>, FetchError>;

    async fn fetch_wind(&self, spot: &Spot, window: DateWindow) -> Result<Vec<WindRow>, FetchError>;
}
