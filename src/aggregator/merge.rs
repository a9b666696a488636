use std::collections::BTreeMap;
use tracing::debug;

use crate::model::{Conditions, Sample, SampleSeries};
use crate::services::forecast_api::{MarineRow, WindRow};

/// Inner-joins marine and wind rows on exact timestamp.
///
/// An hour survives only if both sides have it and every required value is
/// present and physically valid; anything else is dropped rather than scored
/// with a default. A bad swell period only drops the swell period. When a
/// timestamp repeats, the first row wins. Output is strictly increasing.
pub fn merge(marine: &[MarineRow], wind: &[WindRow]) -> SampleSeries {
    let mut wind_by_time = BTreeMap::new();
    for row in wind {
        if let Some(speed) = row.wind_speed {
            wind_by_time.entry(row.time).or_insert(speed);
        }
    }

    let mut dropped = 0usize;
    let samples: Vec<Sample> = marine
        .iter()
        .filter_map(|row| {
            let sample = to_sample(row, wind_by_time.get(&row.time).copied());
            if sample.is_none() {
                dropped += 1;
            }
            sample
        })
        .collect();

    if dropped > 0 {
        debug!(dropped, kept = samples.len(), "Dropped incomplete hours");
    }

    SampleSeries::from_samples(samples)
}

fn to_sample(row: &MarineRow, wind_speed: Option<f64>) -> Option<Sample> {
    let conditions = Conditions::new(row.wave_height?, row.wave_period?, wind_speed?).ok()?;
    let conditions = match row.swell_period {
        Some(swell) => conditions.with_swell_period(swell).unwrap_or(conditions),
        None => conditions,
    };
    Some(Sample {
        time: row.time,
        conditions,
    })
}
