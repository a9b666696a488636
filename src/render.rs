//! View models for the dashboard, plus a plain-text rendering of them.
//!
//! Everything here is serializable so a web front end can consume the same
//! shapes the terminal output is built from.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::aggregator::window::{DEFAULT_SLOT_COUNT, DEFAULT_SLOT_STEP};
use crate::aggregator::{Outlook, SpotRating, hour_slots, ranked};
use crate::error::FetchError;
use crate::model::{Sample, SampleSeries, Spot};
use crate::scoring::{Label, Scorer, Verdict};

pub const OFFLINE_MESSAGE: &str = "No connection to the buoy. Look out of the window.";
pub const NO_DATA_MESSAGE: &str = "No forecast for the coming hours.";

/// The big "should I go?" box for the current hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictPanel {
    pub spot: String,
    pub time: DateTime<Utc>,
    pub label: Label,
    pub headline: &'static str,
    pub score: i32,
    pub color: &'static str,
    pub explanation: String,
    pub webcam: Option<String>,
}

impl VerdictPanel {
    pub fn new(spot: &Spot, sample: &Sample, verdict: Verdict) -> Self {
        Self {
            spot: spot.name.clone(),
            time: sample.time,
            label: verdict.label,
            headline: verdict.label.headline(),
            score: verdict.score,
            color: verdict.color.hex(),
            explanation: verdict.explanation,
            webcam: spot.webcam.clone(),
        }
    }
}

/// One slot of the hour strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourChip {
    pub time_label: String,
    pub label: Label,
    pub color: &'static str,
    pub wave_height: String,
}

/// A spot on the comparison map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub spot: String,
    pub lat: f64,
    pub lon: f64,
    pub score: Option<i32>,
    pub color: &'static str,
    pub rgba: [u8; 4],
}

/// Column-oriented copy of a series for line charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub time: Vec<DateTime<Utc>>,
    pub wave_height: Vec<f64>,
    pub wave_period: Vec<f64>,
    pub wind_speed: Vec<f64>,
}

/// Everything the single-spot page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    Ready {
        panel: VerdictPanel,
        strip: Vec<HourChip>,
        chart: ChartSeries,
    },
    NoData {
        spot: String,
        message: &'static str,
    },
    Offline {
        spot: String,
        message: &'static str,
        reason: FetchError,
    },
}

/// Scores every `step`-th upcoming hour for the strip.
pub fn hour_strip(
    series: &SampleSeries,
    scorer: &dyn Scorer,
    step: usize,
    count: usize,
) -> Vec<HourChip> {
    hour_slots(series, step, count)
        .iter()
        .map(|s| {
            let verdict = scorer.evaluate(&s.conditions);
            HourChip {
                time_label: s.time.format("%H:00").to_string(),
                label: verdict.label,
                color: verdict.color.hex(),
                wave_height: format!("{:.1}m", s.conditions.wave_height()),
            }
        })
        .collect()
}

pub fn chart_series(series: &SampleSeries) -> ChartSeries {
    let mut chart = ChartSeries::default();
    for s in series {
        chart.time.push(s.time);
        chart.wave_height.push(s.conditions.wave_height());
        chart.wave_period.push(s.conditions.wave_period());
        chart.wind_speed.push(s.conditions.wind_speed());
    }
    chart
}

pub fn map_markers(ratings: &[SpotRating]) -> Vec<MapMarker> {
    ratings
        .iter()
        .map(|r| {
            let color = r.color();
            MapMarker {
                spot: r.spot.name.clone(),
                lat: r.spot.lat,
                lon: r.spot.lon,
                score: r.score(),
                color: color.hex(),
                rgba: color.rgba(),
            }
        })
        .collect()
}

/// Builds the single-spot page from an outlook.
pub fn dashboard(spot: &Spot, outlook: Outlook, scorer: &dyn Scorer) -> Dashboard {
    match outlook {
        Outlook::Ready(series) => match series.first() {
            Some(current) => Dashboard::Ready {
                panel: VerdictPanel::new(spot, current, scorer.evaluate(&current.conditions)),
                strip: hour_strip(&series, scorer, DEFAULT_SLOT_STEP, DEFAULT_SLOT_COUNT),
                chart: chart_series(&series),
            },
            None => Dashboard::NoData {
                spot: spot.name.clone(),
                message: NO_DATA_MESSAGE,
            },
        },
        Outlook::NoUpcomingData => Dashboard::NoData {
            spot: spot.name.clone(),
            message: NO_DATA_MESSAGE,
        },
        Outlook::Unavailable(reason) => Dashboard::Offline {
            spot: spot.name.clone(),
            message: OFFLINE_MESSAGE,
            reason,
        },
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dashboard::Ready {
                panel,
                strip,
                chart,
            } => {
                writeln!(f, "{} @ {}", panel.spot, panel.time.format("%Y-%m-%d %H:%M UTC"))?;
                writeln!(f, "{} ({}, score {})", panel.headline, panel.label, panel.score)?;
                writeln!(f, "{}", panel.explanation)?;
                writeln!(f)?;

                let chips: Vec<String> = strip
                    .iter()
                    .map(|c| format!("{} {} {}", c.time_label, c.wave_height, c.label))
                    .collect();
                writeln!(f, "Next hours: {}", chips.join(" | "))?;

                if let Some(webcam) = &panel.webcam {
                    writeln!(f, "Webcam: {webcam}")?;
                }

                writeln!(f)?;
                writeln!(f, "{:<17} {:>7} {:>7} {:>7}", "time", "height", "period", "wind")?;
                for i in 0..chart.time.len() {
                    writeln!(
                        f,
                        "{:<17} {:>6.1}m {:>6.1}s {:>7.1}",
                        chart.time[i].format("%Y-%m-%d %H:%M"),
                        chart.wave_height[i],
                        chart.wave_period[i],
                        chart.wind_speed[i],
                    )?;
                }
                Ok(())
            }
            Dashboard::NoData { spot, message } => writeln!(f, "{spot}: {message}"),
            Dashboard::Offline {
                spot,
                message,
                reason,
            } => writeln!(f, "{spot}: {message} ({reason})"),
        }
    }
}

/// Ranked comparison table, best spot first.
pub fn comparison_text(ratings: &[SpotRating]) -> String {
    let mut out = String::new();
    for r in ranked(ratings) {
        let line = match (&r.verdict, &r.failure) {
            (Some(v), _) => format!("{:<16} {:>2}  {}", r.spot.name, v.score, v.label),
            (None, Some(err)) => format!("{:<16} --  offline ({})", r.spot.name, err.kind()),
            (None, None) => format!("{:<16} --  no data", r.spot.name),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Conditions;
    use crate::scoring::{NarrativeScorer, RatingScorer, Swatch};
    use chrono::TimeZone;

    fn series(values: &[(u32, f64, f64, f64)]) -> SampleSeries {
        SampleSeries::from_samples(
            values
                .iter()
                .map(|&(h, height, period, wind)| Sample {
                    time: Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap(),
                    conditions: Conditions::new(height, period, wind).unwrap(),
                })
                .collect(),
        )
    }

    fn spot() -> Spot {
        Spot::new("La Cícer", 28.1311, -15.4467, Some("https://example.com/cam"))
    }

    #[test]
    fn test_ready_dashboard() {
        let s = series(&[(10, 1.2, 11.0, 8.0), (11, 1.3, 11.0, 9.0), (13, 0.3, 6.0, 25.0)]);
        let dash = dashboard(&spot(), Outlook::Ready(s), &NarrativeScorer::default());

        let Dashboard::Ready {
            panel,
            strip,
            chart,
        } = &dash
        else {
            panic!("expected a ready dashboard");
        };
        assert_eq!(panel.label, Label::Go);
        assert_eq!(panel.color, Swatch::Forest.hex());
        assert_eq!(panel.webcam.as_deref(), Some("https://example.com/cam"));
        assert_eq!(strip.len(), 1);
        assert_eq!(strip[0].time_label, "10:00");
        assert_eq!(strip[0].wave_height, "1.2m");
        assert_eq!(chart.time.len(), 3);

        let text = dash.to_string();
        assert!(text.contains("GET IN THE WATER NOW!"));
        assert!(text.contains("Webcam: https://example.com/cam"));
    }

    #[test]
    fn test_offline_and_no_data_are_distinct() {
        let offline = dashboard(
            &spot(),
            Outlook::Unavailable(FetchError::unavailable("marine", "timeout")),
            &NarrativeScorer::default(),
        );
        let empty = dashboard(&spot(), Outlook::NoUpcomingData, &NarrativeScorer::default());

        assert!(offline.to_string().contains(OFFLINE_MESSAGE));
        assert!(empty.to_string().contains(NO_DATA_MESSAGE));

        let json = serde_json::to_value(&offline).unwrap();
        assert_eq!(json["status"], "offline");
        assert_eq!(json["reason"]["kind"], "upstream_unavailable");
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["status"], "no_data");
    }

    #[test]
    fn test_strip_colors_follow_scorer() {
        let s = series(&[(0, 1.5, 12.0, 5.0), (3, 0.2, 5.0, 30.0)]);
        let strip = hour_strip(&s, &RatingScorer::default(), 3, 8);
        assert_eq!(strip.len(), 1);
        assert_eq!(strip[0].color, Swatch::Green.hex());
    }

    #[test]
    fn test_markers_use_gray_without_data() {
        let ratings = vec![
            SpotRating {
                spot: spot(),
                sample: None,
                verdict: None,
                failure: Some(FetchError::unavailable("wind", "down")),
            },
            SpotRating {
                spot: Spot::new("La Laja", 28.0747, -15.4123, None),
                sample: None,
                verdict: Some(RatingScorer::default().evaluate(&Conditions::new(1.0, 10.0, 5.0).unwrap())),
                failure: None,
            },
        ];

        let markers = map_markers(&ratings);
        assert_eq!(markers[0].color, Swatch::NO_DATA.hex());
        assert_eq!(markers[0].score, None);
        assert_eq!(markers[1].score, Some(5));
        assert_eq!(markers[1].rgba, Swatch::Green.rgba());

        let text = comparison_text(&ratings);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("La Laja"));
        assert!(text.contains("offline (upstream_unavailable)"));
    }
}
