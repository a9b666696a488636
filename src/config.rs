//! Static configuration: the spot table, scoring presets and API settings.
//!
//! The spot table and presets live in an optional JSON file:
//! ```json
//! {
//!   "spots": [
//!     { "name": "La Laja", "lat": 28.0747, "lon": -15.4123 }
//!   ],
//!   "scoring": { "rating": { "calm_wind_below": 18.0 } }
//! }
//! ```
//! Without a file the built-in Gran Canaria table is used. Either way the
//! result is installed once per process and read-only afterwards.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use crate::model::Spot;
use crate::scoring::ScoringPresets;

pub const DEFAULT_MARINE_URL: &str = "https://marine-api.open-meteo.com";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_FORECAST_DAYS: u32 = 3;
/// Furthest horizon the forecast endpoints serve.
pub const MAX_FORECAST_DAYS: u32 = 16;

static INSTALLED: OnceLock<SurfConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfConfig {
    #[serde(default = "builtin_spots")]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub scoring: ScoringPresets,
}

impl Default for SurfConfig {
    fn default() -> Self {
        Self {
            spots: builtin_spots(),
            scoring: ScoringPresets::default(),
        }
    }
}

fn builtin_spots() -> Vec<Spot> {
    const WEBCAMS: &str =
        "https://www.skylinewebcams.com/es/webcam/espana/canarias/las-palmas-gran-canaria";

    let spot = |name: &str, lat: f64, lon: f64, page: &str| Spot {
        name: name.to_string(),
        lat,
        lon,
        webcam: Some(format!("{WEBCAMS}/{page}")),
    };

    vec![
        spot("La Cícer", 28.1311, -15.4467, "la-cicer-las-canteras.html"),
        spot("El Confital", 28.1441, -15.4340, "playa-confital.html"),
        spot("La Laja", 28.0747, -15.4123, "playa-de-la-laja.html"),
        spot("San Andrés", 28.1338, -15.4660, "puerto-de-las-palmas.html"),
    ]
}

impl SurfConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: SurfConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the spot table (non-empty, unique names, valid coordinates)
    /// and that every threshold band is ordered.
    pub fn validate(&self) -> Result<()> {
        if self.spots.is_empty() {
            bail!("at least one spot must be configured");
        }

        let mut seen = HashSet::new();
        for spot in &self.spots {
            if !seen.insert(spot.name.as_str()) {
                bail!("duplicate spot name '{}'", spot.name);
            }
            if !spot.has_valid_coordinates() {
                bail!(
                    "spot '{}' has out-of-range coordinates ({}, {})",
                    spot.name,
                    spot.lat,
                    spot.lon
                );
            }
        }

        let n = &self.scoring.narrative;
        ordered(
            "narrative",
            &[
                ("flat_below", n.flat_below),
                ("ideal_min", n.ideal_min),
                ("ideal_max", n.ideal_max),
            ],
        )?;
        ordered(
            "narrative",
            &[
                ("fair_period_above", n.fair_period_above),
                ("strong_period_above", n.strong_period_above),
            ],
        )?;

        let r = &self.scoring.rating;
        ordered(
            "rating",
            &[
                ("small_min", r.small_min),
                ("ideal_min", r.ideal_min),
                ("ideal_max", r.ideal_max),
            ],
        )?;
        ordered(
            "rating",
            &[
                ("fair_period_from", r.fair_period_from),
                ("long_period_from", r.long_period_from),
            ],
        )?;

        Ok(())
    }

    /// Looks up a spot by name, ignoring case.
    pub fn spot(&self, name: &str) -> Option<&Spot> {
        self.spots
            .iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase())
    }

    /// Installs `self` as the process-wide config and returns it.
    ///
    /// The first installed value wins; later calls return it unchanged.
    pub fn install(self) -> &'static SurfConfig {
        INSTALLED.get_or_init(|| self)
    }
}

/// Fails unless the named thresholds are in non-decreasing order.
fn ordered(scheme: &str, bounds: &[(&str, f64)]) -> Result<()> {
    for pair in bounds.windows(2) {
        let (low_name, low) = pair[0];
        let (high_name, high) = pair[1];
        if low > high {
            bail!("scoring.{scheme}: {low_name} ({low}) must not exceed {high_name} ({high})");
        }
    }
    Ok(())
}

/// Returns the installed config, or the built-in one if none was installed.
pub fn current() -> &'static SurfConfig {
    INSTALLED.get_or_init(SurfConfig::default)
}

/// Unit requested from the wind endpoint. Scores always work in km/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WindUnit {
    Kmh,
    Ms,
}

impl WindUnit {
    pub fn query_value(&self) -> &'static str {
        match self {
            WindUnit::Kmh => "kmh",
            WindUnit::Ms => "ms",
        }
    }

    /// Factor converting this unit into km/h.
    pub fn to_kmh(&self) -> f64 {
        match self {
            WindUnit::Kmh => 1.0,
            WindUnit::Ms => 3.6,
        }
    }
}

/// Upstream and cache settings, filled from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub marine_base_url: String,
    pub forecast_base_url: String,
    pub api_key: Option<String>,
    pub wind_unit: WindUnit,
    pub cache_ttl: Duration,
    pub forecast_days: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            marine_base_url: DEFAULT_MARINE_URL.to_string(),
            forecast_base_url: DEFAULT_FORECAST_URL.to_string(),
            api_key: None,
            wind_unit: WindUnit::Kmh,
            cache_ttl: DEFAULT_CACHE_TTL,
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let config = SurfConfig::default();
        assert_eq!(config.spots.len(), 4);
        assert!(config.validate().is_ok());
        assert!(config.spots.iter().all(|s| s.webcam.is_some()));
    }

    #[test]
    fn test_spot_lookup_ignores_case() {
        let config = SurfConfig::default();
        let spot = config.spot("el confital").unwrap();
        assert_eq!(spot.name, "El Confital");
        assert!(config.spot("Pipeline").is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = SurfConfig::from_json("{}").unwrap();
        assert_eq!(config, SurfConfig::default());
    }

    #[test]
    fn test_partial_threshold_override() {
        let config = SurfConfig::from_json(
            r#"{
                "spots": [{ "name": "Home", "lat": 43.3, "lon": -2.0 }],
                "scoring": { "rating": { "calm_wind_below": 18.0 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.spots.len(), 1);
        assert_eq!(config.spots[0].webcam, None);
        assert_eq!(config.scoring.rating.calm_wind_below, 18.0);
        assert_eq!(config.scoring.rating.long_period_from, 10.0);
        assert_eq!(config.scoring.narrative.strong_wind_above, 22.0);
    }

    #[test]
    fn test_duplicate_spot_rejected() {
        let err = SurfConfig::from_json(
            r#"{ "spots": [
                { "name": "A", "lat": 1.0, "lon": 1.0 },
                { "name": "A", "lat": 2.0, "lon": 2.0 }
            ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        assert!(
            SurfConfig::from_json(r#"{ "spots": [{ "name": "X", "lat": 100.0, "lon": 0.0 }] }"#)
                .is_err()
        );
        assert!(SurfConfig::from_json(r#"{ "spots": [] }"#).is_err());
    }

    fn rejected(json: &str, needle: &str) {
        let err = SurfConfig::from_json(json).unwrap_err();
        assert!(
            format!("{err:#}").contains(needle),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn test_inverted_narrative_height_band_rejected() {
        rejected(
            r#"{ "scoring": { "narrative": { "ideal_min": 3.0, "ideal_max": 1.0 } } }"#,
            "ideal_min (3) must not exceed ideal_max (1)",
        );
        rejected(
            r#"{ "scoring": { "narrative": { "flat_below": 1.0 } } }"#,
            "flat_below",
        );
    }

    #[test]
    fn test_inverted_narrative_period_band_rejected() {
        rejected(
            r#"{ "scoring": { "narrative": { "fair_period_above": 10.0 } } }"#,
            "fair_period_above (10) must not exceed strong_period_above (9)",
        );
    }

    #[test]
    fn test_inverted_rating_bands_rejected() {
        rejected(
            r#"{ "scoring": { "rating": { "small_min": 0.9 } } }"#,
            "scoring.rating: small_min",
        );
        rejected(
            r#"{ "scoring": { "rating": { "ideal_max": 0.7 } } }"#,
            "ideal_min (0.8) must not exceed ideal_max (0.7)",
        );
        rejected(
            r#"{ "scoring": { "rating": { "fair_period_from": 12.0 } } }"#,
            "fair_period_from (12) must not exceed long_period_from (10)",
        );
    }

    #[test]
    fn test_equal_bounds_accepted() {
        let config = SurfConfig::from_json(
            r#"{ "scoring": { "rating": { "small_min": 0.8, "fair_period_from": 10.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.scoring.rating.small_min, 0.8);
    }

    #[test]
    fn test_example_file_loads() {
        let config = SurfConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/surf.example.json"))
            .unwrap();
        assert_eq!(config.spots.len(), 4);
        assert_eq!(config.scoring, ScoringPresets::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SurfConfig::load("/nonexistent/surf.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/surf.json"));
    }

    #[test]
    fn test_wind_unit_conversion() {
        assert_eq!(WindUnit::Kmh.to_kmh(), 1.0);
        assert_eq!(WindUnit::Ms.to_kmh(), 3.6);
        assert_eq!(WindUnit::Ms.query_value(), "ms");
    }
}
