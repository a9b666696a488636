//! Forecast aggregation.
//!
//! Fetches marine and wind series for a spot, joins them hour by hour, and
//! selects the window a view needs. Upstream failures stop here: callers get
//! an empty series tagged with the reason instead of an error.

pub mod compare;
pub mod merge;
pub mod window;

pub use compare::{SpotRating, compare, ranked};
pub use merge::merge;
pub use window::{hour_slots, upcoming};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::model::{DateWindow, SampleSeries, Spot};
use crate::services::forecast_api::ForecastSource;

/// Result of fetching a spot: the merged series, or an empty one plus the
/// reason it is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub series: SampleSeries,
    pub failure: Option<FetchError>,
}

impl FetchOutcome {
    pub fn failed(err: FetchError) -> Self {
        Self {
            series: SampleSeries::empty(),
            failure: Some(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// What the rendering layer should show for a spot right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outlook {
    /// Upcoming samples, never empty.
    Ready(SampleSeries),
    /// The fetch worked but nothing is left at or after now.
    NoUpcomingData,
    /// The fetch failed upstream.
    Unavailable(FetchError),
}

impl Outlook {
    /// Classifies `outcome` relative to `now`, keeping at most `hours` samples.
    pub fn assess(outcome: FetchOutcome, now: DateTime<Utc>, hours: usize) -> Self {
        if let Some(err) = outcome.failure {
            return Outlook::Unavailable(err);
        }
        let next = upcoming(&outcome.series, now, hours);
        if next.is_empty() {
            Outlook::NoUpcomingData
        } else {
            Outlook::Ready(next)
        }
    }
}

/// Joins the two sub-fetches of a [`ForecastSource`] into one series.
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn ForecastSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Fetches marine and wind data for `spot` and merges them.
    ///
    /// Never fails: any upstream error yields an empty series with
    /// `failure` set.
    #[tracing::instrument(skip(self, spot), fields(spot = %spot.name))]
    pub async fn fetch_series(&self, spot: &Spot, window: DateWindow) -> FetchOutcome {
        let (marine, wind) = tokio::join!(
            self.source.fetch_marine(spot, window),
            self.source.fetch_wind(spot, window),
        );

        let (marine, wind) = match (marine, wind) {
            (Ok(m), Ok(w)) => (m, w),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, kind = e.kind(), "Forecast fetch failed");
                return FetchOutcome::failed(e);
            }
        };

        let series = merge(&marine, &wind);
        info!(
            marine_rows = marine.len(),
            wind_rows = wind.len(),
            samples = series.len(),
            "Forecast merged"
        );

        FetchOutcome {
            series,
            failure: None,
        }
    }

    /// Fetches `spot` and classifies the result for display.
    pub async fn outlook(
        &self,
        spot: &Spot,
        window: DateWindow,
        now: DateTime<Utc>,
        hours: usize,
    ) -> Outlook {
        Outlook::assess(self.fetch_series(spot, window).await, now, hours)
    }
}
