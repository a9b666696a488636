use chrono::{DateTime, Utc};

use crate::model::{SampleSeries, truncate_to_hour};

/// Hours shown in the "next 24 hours" view.
pub const DEFAULT_HOURS: usize = 24;
/// Hour strip: every third hour...
pub const DEFAULT_SLOT_STEP: usize = 3;
/// ...eight slots long.
pub const DEFAULT_SLOT_COUNT: usize = 8;

/// First `n` samples at or after `now` truncated to the hour.
///
/// Returns an empty series when nothing is left in the forecast horizon.
pub fn upcoming(series: &SampleSeries, now: DateTime<Utc>, n: usize) -> SampleSeries {
    let from = truncate_to_hour(now);
    SampleSeries::from_samples(
        series
            .iter()
            .filter(|s| s.time >= from)
            .take(n)
            .copied()
            .collect(),
    )
}

/// Every `step`-th sample, at most `count` of them, starting with the first.
pub fn hour_slots(series: &SampleSeries, step: usize, count: usize) -> SampleSeries {
    SampleSeries::from_samples(
        series
            .iter()
            .step_by(step.max(1))
            .take(count)
            .copied()
            .collect(),
    )
}
