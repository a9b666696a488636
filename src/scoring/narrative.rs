//! Qualitative scheme: integer points plus a sentence explaining them.

use serde::{Deserialize, Serialize};

use super::Scorer;
use super::verdict::{Label, Swatch, Verdict};
use crate::model::Conditions;

/// Cut-offs for [`NarrativeScorer`]. Heights in meters, periods in seconds,
/// wind in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeThresholds {
    pub flat_below: f64,
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub strong_period_above: f64,
    pub fair_period_above: f64,
    pub light_wind_below: f64,
    pub strong_wind_above: f64,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self {
            flat_below: 0.5,
            ideal_min: 0.8,
            ideal_max: 2.0,
            strong_period_above: 9.0,
            fair_period_above: 7.0,
            light_wind_below: 12.0,
            strong_wind_above: 22.0,
        }
    }
}

/// Scores conditions on a roughly -2..=5 scale and explains the result.
///
/// | Factor | Rule                          | Points |
/// |--------|-------------------------------|--------|
/// | Height | < 0.5                         | 0      |
/// | Height | 0.8 ..= 2.0                   | +2     |
/// | Height | otherwise                     | +1     |
/// | Period | > 9                           | +2     |
/// | Period | > 7                           | +1     |
/// | Wind   | < 12                          | +1     |
/// | Wind   | > 22                          | -2     |
#[derive(Debug, Clone, Default)]
pub struct NarrativeScorer {
    pub thresholds: NarrativeThresholds,
}

impl NarrativeScorer {
    pub fn new(thresholds: NarrativeThresholds) -> Self {
        Self { thresholds }
    }

    fn lead_in(label: Label) -> &'static str {
        match label {
            Label::Go => "Great time to go because",
            Label::Maybe => "You can give it a try, although",
            Label::StayHome => "Not worth it because",
        }
    }

    fn swatch(label: Label) -> Swatch {
        match label {
            Label::Go => Swatch::Forest,
            Label::Maybe => Swatch::Sand,
            Label::StayHome => Swatch::Slate,
        }
    }
}

impl Scorer for NarrativeScorer {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn evaluate(&self, conditions: &Conditions) -> Verdict {
        let t = &self.thresholds;
        let h = conditions.wave_height();
        let p = conditions.wave_period();
        let w = conditions.wind_speed();

        let mut score = 0;
        let mut notes: Vec<&str> = Vec::with_capacity(3);

        if h < t.flat_below {
            notes.push("it is too flat");
        } else if (t.ideal_min..=t.ideal_max).contains(&h) {
            score += 2;
            notes.push("the ideal size is there");
        } else {
            score += 1;
            notes.push("there are waves present but maybe too big");
        }

        if p > t.strong_period_above {
            score += 2;
            notes.push("sets come in powerful and organized");
        } else if p > t.fair_period_above {
            score += 1;
            notes.push("the period is acceptable");
        } else {
            notes.push("sets are too close together and disorganized");
        }

        if w < t.light_wind_below {
            score += 1;
            notes.push("a very light wind keeps the water clean");
        } else if w > t.strong_wind_above {
            score -= 2;
            notes.push("the wind is ruining the wave");
        }

        let label = Label::from_score(score);
        Verdict {
            label,
            score,
            explanation: format!("{} {}.", Self::lead_in(label), notes.join(" and ")),
            color: Self::swatch(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(h: f64, p: f64, w: f64) -> Verdict {
        NarrativeScorer::default().evaluate(&Conditions::new(h, p, w).unwrap())
    }

    #[test]
    fn test_ideal_height_with_moderate_conditions_is_go() {
        for h in [0.8, 1.0, 1.4, 1.9, 2.0] {
            let v = score(h, 8.0, 10.0);
            assert!(v.score >= 4, "height {h} scored {}", v.score);
            assert_eq!(v.label, Label::Go);
        }
    }

    #[test]
    fn test_height_boundaries() {
        assert_eq!(score(0.8, 6.0, 15.0).score, 2);
        assert_eq!(score(2.0, 6.0, 15.0).score, 2);
        assert_eq!(score(0.79999, 6.0, 15.0).score, 1);
        assert_eq!(score(2.00001, 6.0, 15.0).score, 1);
        assert_eq!(score(0.49, 6.0, 15.0).score, 0);
        assert_eq!(score(0.5, 6.0, 15.0).score, 1);
    }

    #[test]
    fn test_period_boundaries() {
        assert_eq!(score(0.3, 9.0, 15.0).score, 1);
        assert_eq!(score(0.3, 9.01, 15.0).score, 2);
        assert_eq!(score(0.3, 7.0, 15.0).score, 0);
        assert_eq!(score(0.3, 7.01, 15.0).score, 1);
    }

    #[test]
    fn test_wind_boundaries() {
        assert_eq!(score(0.3, 6.0, 12.0).score, 0);
        assert_eq!(score(0.3, 6.0, 22.0).score, 0);
        assert_eq!(score(0.3, 6.0, 11.9).score, 1);
        assert_eq!(score(0.3, 6.0, 22.1).score, -2);
    }

    #[test]
    fn test_perfect_morning() {
        let v = score(1.2, 11.0, 8.0);
        assert_eq!(v.score, 5);
        assert_eq!(v.label, Label::Go);
        assert_eq!(v.color, Swatch::Forest);
        assert!(v.explanation.starts_with("Great time to go because"));
        assert!(v.explanation.contains("ideal size"));
        assert!(v.explanation.contains("light wind"));
        assert!(v.explanation.contains("organized"));
    }

    #[test]
    fn test_blown_out_flat_day() {
        let v = score(0.3, 6.0, 25.0);
        assert_eq!(v.score, -2);
        assert_eq!(v.label, Label::StayHome);
        assert_eq!(v.color, Swatch::Slate);
        assert!(v.explanation.contains("too flat"));
        assert!(v.explanation.contains("ruining the wave"));
    }

    #[test]
    fn test_passable_afternoon() {
        let v = score(1.5, 8.0, 18.0);
        assert_eq!(v.score, 3);
        assert_eq!(v.label, Label::Maybe);
        assert_eq!(v.color, Swatch::Sand);
        // neutral wind adds no note
        assert_eq!(v.explanation.matches(" and ").count(), 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let scorer = NarrativeScorer::new(NarrativeThresholds {
            strong_wind_above: 15.0,
            ..Default::default()
        });
        let v = scorer.evaluate(&Conditions::new(1.5, 8.0, 18.0).unwrap());
        assert_eq!(v.score, 1);
        assert_eq!(v.label, Label::StayHome);
    }
}
