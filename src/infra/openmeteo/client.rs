use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::parse::{parse_marine, parse_wind};
use crate::config::{ApiSettings, WindUnit};
use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_json};
use crate::model::{DateWindow, Spot};
use crate::services::forecast_api::{ForecastSource, MarineRow, WindRow};

/// Both endpoints are pinned to the same zone so their hours line up.
const TIMEZONE: &str = "GMT";

const MARINE_HOURLY: &str = "wave_height,wave_period,swell_wave_period";
const WIND_HOURLY: &str = "wind_speed_10m";

/// [`ForecastSource`] backed by the Open-Meteo marine and forecast APIs.
pub struct OpenMeteo {
    http: Box<dyn HttpClient>,
    marine_endpoint: Url,
    forecast_endpoint: Url,
    wind_unit: WindUnit,
}

impl OpenMeteo {
    /// Builds a client from configured base URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL is not a valid absolute URL.
    pub fn new(http: Box<dyn HttpClient>, settings: &ApiSettings) -> Result<Self> {
        let marine_endpoint = endpoint(&settings.marine_base_url, "v1/marine")?;
        let forecast_endpoint = endpoint(&settings.forecast_base_url, "v1/forecast")?;

        Ok(Self {
            http,
            marine_endpoint,
            forecast_endpoint,
            wind_unit: settings.wind_unit,
        })
    }

    pub fn marine_url(&self, spot: &Spot, window: DateWindow) -> Url {
        let mut url = self.marine_endpoint.clone();
        append_common(&mut url, spot, window);
        url.query_pairs_mut().append_pair("hourly", MARINE_HOURLY);
        url
    }

    pub fn wind_url(&self, spot: &Spot, window: DateWindow) -> Url {
        let mut url = self.forecast_endpoint.clone();
        append_common(&mut url, spot, window);
        url.query_pairs_mut()
            .append_pair("hourly", WIND_HOURLY)
            .append_pair("wind_speed_unit", self.wind_unit.query_value());
        url
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse(&raw).with_context(|| format!("Invalid API base URL '{base}'"))
}

fn append_common(url: &mut Url, spot: &Spot, window: DateWindow) {
    url.query_pairs_mut()
        .append_pair("latitude", &spot.lat.to_string())
        .append_pair("longitude", &spot.lon.to_string())
        .append_pair("timezone", TIMEZONE)
        .append_pair("start_date", &window.start.format("%Y-%m-%d").to_string())
        .append_pair("end_date", &window.end.format("%Y-%m-%d").to_string());
}

#[async_trait]
impl ForecastSource for OpenMeteo {
    #[tracing::instrument(skip(self, spot), fields(spot = %spot.name))]
    async fn fetch_marine(
        &self,
        spot: &Spot,
        window: DateWindow,
    ) -> Result<Vec<MarineRow>, FetchError> {
        let url = self.marine_url(spot, window);
        let body: serde_json::Value = fetch_json(self.http.as_ref(), "marine", url).await?;
        let rows = parse_marine("marine", &body)?;
        debug!(rows = rows.len(), "Marine rows decoded");
        Ok(rows)
    }

    #[tracing::instrument(skip(self, spot), fields(spot = %spot.name))]
    async fn fetch_wind(&self, spot: &Spot, window: DateWindow) -> Result<Vec<WindRow>, FetchError> {
        let url = self.wind_url(spot, window);
        let body: serde_json::Value = fetch_json(self.http.as_ref(), "wind", url).await?;
        let rows = parse_wind("wind", &body, self.wind_unit.to_kmh())?;
        debug!(rows = rows.len(), "Wind rows decoded");
        Ok(rows)
    }
}
