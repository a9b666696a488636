//! Quantitative 0-5 scheme used for map coloring and spot ranking.

use serde::{Deserialize, Serialize};

use super::Scorer;
use super::verdict::{Label, Swatch, Verdict};
use crate::model::Conditions;

/// Highest score the rating scheme can produce.
pub const MAX_RATING: i32 = 5;

/// Cut-offs for [`RatingScorer`]. Heights in meters, periods in seconds,
/// wind in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub small_min: f64,
    pub long_period_from: f64,
    pub fair_period_from: f64,
    pub calm_wind_below: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            ideal_min: 0.8,
            ideal_max: 2.0,
            small_min: 0.5,
            long_period_from: 10.0,
            fair_period_from: 7.0,
            calm_wind_below: 15.0,
        }
    }
}

/// Scores conditions on a 0..=5 scale without an explanation.
///
/// Prefers the swell period over the combined wave period when available.
#[derive(Debug, Clone, Default)]
pub struct RatingScorer {
    pub thresholds: RatingThresholds,
}

impl RatingScorer {
    pub fn new(thresholds: RatingThresholds) -> Self {
        Self { thresholds }
    }

    /// Map color for a score.
    ///
    /// | Score   | Color  |
    /// |---------|--------|
    /// | >= 4    | green  |
    /// | 2 .. 4  | yellow |
    /// | < 2     | red    |
    pub fn swatch(score: i32) -> Swatch {
        match score {
            s if s >= 4 => Swatch::Green,
            s if s >= 2 => Swatch::Yellow,
            _ => Swatch::Red,
        }
    }
}

impl Scorer for RatingScorer {
    fn name(&self) -> &'static str {
        "rating"
    }

    fn evaluate(&self, conditions: &Conditions) -> Verdict {
        let t = &self.thresholds;
        let h = conditions.wave_height();
        let p = conditions.swell_period().unwrap_or(conditions.wave_period());
        let w = conditions.wind_speed();

        let height_pts = if (t.ideal_min..=t.ideal_max).contains(&h) {
            2
        } else if (t.small_min..t.ideal_min).contains(&h) {
            1
        } else {
            0
        };

        let period_pts = if p >= t.long_period_from {
            2
        } else if p >= t.fair_period_from {
            1
        } else {
            0
        };

        let wind_pts = if w < t.calm_wind_below { 1 } else { 0 };

        let score = (height_pts + period_pts + wind_pts).min(MAX_RATING);

        Verdict {
            label: Label::from_score(score),
            score,
            explanation: String::new(),
            color: Self::swatch(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(h: f64, p: f64, w: f64) -> Verdict {
        RatingScorer::default().evaluate(&Conditions::new(h, p, w).unwrap())
    }

    #[test]
    fn test_all_factors_maxed_is_five() {
        let v = rate(1.5, 14.0, 5.0);
        assert_eq!(v.score, MAX_RATING);
        assert_eq!(v.label, Label::Go);
        assert_eq!(v.color, Swatch::Green);
        assert!(v.explanation.is_empty());
    }

    #[test]
    fn test_score_stays_in_range() {
        let heights = [0.0, 0.4, 0.5, 0.79, 0.8, 1.3, 2.0, 2.01, 6.0];
        let periods = [0.0, 6.9, 7.0, 9.9, 10.0, 20.0];
        let winds = [0.0, 14.9, 15.0, 40.0];
        for h in heights {
            for p in periods {
                for w in winds {
                    let v = rate(h, p, w);
                    assert!((0..=MAX_RATING).contains(&v.score), "{h}/{p}/{w} -> {}", v.score);
                }
            }
        }
    }

    #[test]
    fn test_wind_cutoff_differs_from_narrative() {
        assert_eq!(rate(0.0, 0.0, 14.9).score, 1);
        assert_eq!(rate(0.0, 0.0, 15.0).score, 0);
    }

    #[test]
    fn test_small_waves_score_one() {
        assert_eq!(rate(0.5, 0.0, 20.0).score, 1);
        assert_eq!(rate(0.79, 0.0, 20.0).score, 1);
        assert_eq!(rate(0.49, 0.0, 20.0).score, 0);
        assert_eq!(rate(2.01, 0.0, 20.0).score, 0);
    }

    #[test]
    fn test_swell_period_takes_precedence() {
        let c = Conditions::new(1.0, 6.0, 20.0)
            .unwrap()
            .with_swell_period(12.0)
            .unwrap();
        let v = RatingScorer::default().evaluate(&c);
        assert_eq!(v.score, 4);
    }

    #[test]
    fn test_swatch_bands() {
        assert_eq!(RatingScorer::swatch(4), Swatch::Green);
        assert_eq!(RatingScorer::swatch(3), Swatch::Yellow);
        assert_eq!(RatingScorer::swatch(2), Swatch::Yellow);
        assert_eq!(RatingScorer::swatch(1), Swatch::Red);
        assert_eq!(RatingScorer::swatch(0), Swatch::Red);
    }
}
