use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{Instrument, error};

use super::{Aggregator, Outlook};
use crate::error::FetchError;
use crate::model::{DateWindow, Sample, Spot};
use crate::scoring::{Scorer, Swatch, Verdict};

/// Score of one spot at the current hour, for the map and the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotRating {
    pub spot: Spot,
    pub sample: Option<Sample>,
    pub verdict: Option<Verdict>,
    pub failure: Option<FetchError>,
}

impl SpotRating {
    fn from_outlook(spot: Spot, outlook: Outlook, scorer: &dyn Scorer) -> Self {
        match outlook {
            Outlook::Ready(series) => {
                let sample = series.first().copied();
                Self {
                    spot,
                    verdict: sample.map(|s| scorer.evaluate(&s.conditions)),
                    sample,
                    failure: None,
                }
            }
            Outlook::NoUpcomingData => Self {
                spot,
                sample: None,
                verdict: None,
                failure: None,
            },
            Outlook::Unavailable(err) => Self {
                spot,
                sample: None,
                verdict: None,
                failure: Some(err),
            },
        }
    }

    pub fn score(&self) -> Option<i32> {
        self.verdict.as_ref().map(|v| v.score)
    }

    /// Verdict color, or the gray sentinel when there is nothing to score.
    pub fn color(&self) -> Swatch {
        self.verdict
            .as_ref()
            .map(|v| v.color)
            .unwrap_or(Swatch::NO_DATA)
    }
}

/// Scores the current hour of every spot.
///
/// Spots are fetched concurrently, at most `concurrency` at a time. Each
/// branch only reads the shared source; results come back in the order of
/// `spots`.
pub async fn compare(
    aggregator: &Aggregator,
    spots: &[Spot],
    window: DateWindow,
    now: DateTime<Utc>,
    scorer: Arc<dyn Scorer>,
    concurrency: usize,
) -> Vec<SpotRating> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(spots.len());

    for spot in spots {
        let sem = semaphore.clone();
        let aggregator = aggregator.clone();
        let scorer = scorer.clone();
        let spot = spot.clone();
        let span = tracing::info_span!("compare_spot", spot = %spot.name);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await.ok();
                let outlook = aggregator.outlook(&spot, window, now, 1).await;
                SpotRating::from_outlook(spot, outlook, scorer.as_ref())
            }
            .instrument(span),
        );
        tasks.push(task);
    }

    let mut ratings = Vec::with_capacity(tasks.len());
    for (task, spot) in tasks.into_iter().zip(spots) {
        match task.await {
            Ok(rating) => ratings.push(rating),
            Err(e) => {
                error!(spot = %spot.name, error = %e, "Spot task failed");
                ratings.push(SpotRating {
                    spot: spot.clone(),
                    sample: None,
                    verdict: None,
                    failure: None,
                });
            }
        }
    }

    ratings
}

/// Best spot first; spots without a score go last, in input order.
pub fn ranked(ratings: &[SpotRating]) -> Vec<&SpotRating> {
    let mut sorted: Vec<&SpotRating> = ratings.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.score().unwrap_or(i32::MIN)));
    sorted
}
