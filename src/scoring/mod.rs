//! Surf condition scoring.
//!
//! Two independent heuristics share the [`Scorer`] capability:
//! [`NarrativeScorer`] drives the verdict panel and hour strip, while
//! [`RatingScorer`] colors the map and ranks spots against each other.
//! Their thresholds differ on purpose and are never merged.

pub mod narrative;
pub mod rating;
pub mod verdict;

pub use narrative::{NarrativeScorer, NarrativeThresholds};
pub use rating::{RatingScorer, RatingThresholds};
pub use verdict::{Label, Swatch, Verdict};

use crate::error::InvalidInput;
use crate::model::Conditions;

/// Turns one hour of conditions into a [`Verdict`]. Implementations are pure.
pub trait Scorer: Send + Sync {
    /// Stable identifier used in logs and output.
    fn name(&self) -> &'static str;

    fn evaluate(&self, conditions: &Conditions) -> Verdict;
}

/// Named selection of a scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScoringScheme {
    /// Points plus an explanation; GO / MAYBE / STAY_HOME.
    Narrative,
    /// 0-5 rating with traffic-light colors.
    Rating,
}

/// Threshold presets for both schemes, usually loaded from the config file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoringPresets {
    pub narrative: NarrativeThresholds,
    pub rating: RatingThresholds,
}

impl ScoringPresets {
    /// Builds the scorer for `scheme` with these thresholds.
    pub fn scorer(&self, scheme: ScoringScheme) -> Box<dyn Scorer> {
        match scheme {
            ScoringScheme::Narrative => Box::new(NarrativeScorer::new(self.narrative.clone())),
            ScoringScheme::Rating => Box::new(RatingScorer::new(self.rating.clone())),
        }
    }
}

/// Scores raw readings with the default thresholds of `scheme`.
///
/// # Errors
///
/// Returns [`InvalidInput`] if any reading is negative or not finite.
pub fn evaluate(
    scheme: ScoringScheme,
    wave_height: f64,
    wave_period: f64,
    wind_speed: f64,
) -> Result<Verdict, InvalidInput> {
    let conditions = Conditions::new(wave_height, wave_period, wind_speed)?;
    Ok(ScoringPresets::default().scorer(scheme).evaluate(&conditions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_dispatches_by_scheme() {
        let narrative = evaluate(ScoringScheme::Narrative, 1.5, 8.0, 18.0).unwrap();
        assert_eq!(narrative.score, 3);
        assert!(!narrative.explanation.is_empty());

        let rating = evaluate(ScoringScheme::Rating, 1.5, 8.0, 18.0).unwrap();
        assert_eq!(rating.score, 3);
        assert!(rating.explanation.is_empty());
        assert_eq!(rating.color, Swatch::Yellow);
    }

    #[test]
    fn test_schemes_disagree_on_wind() {
        // 13 km/h: neutral for the narrative scheme, calm for the rating scheme
        let narrative = evaluate(ScoringScheme::Narrative, 0.3, 6.0, 13.0).unwrap();
        let rating = evaluate(ScoringScheme::Rating, 0.3, 6.0, 13.0).unwrap();
        assert_eq!(narrative.score, 0);
        assert_eq!(rating.score, 1);
    }

    #[test]
    fn test_evaluate_rejects_negative_input() {
        let err = evaluate(ScoringScheme::Narrative, 1.0, -1.0, 5.0).unwrap_err();
        assert_eq!(err.field, "wave_period");
    }

    #[test]
    fn test_scorer_names() {
        let presets = ScoringPresets::default();
        assert_eq!(presets.scorer(ScoringScheme::Narrative).name(), "narrative");
        assert_eq!(presets.scorer(ScoringScheme::Rating).name(), "rating");
    }
}
