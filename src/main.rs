//! CLI entry point for the surf rater.
//!
//! Provides subcommands for scoring a single spot right now, comparing all
//! configured spots, watching one spot over time, and exporting scored hours
//! to CSV.

use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use surf_rater::aggregator::window::DEFAULT_HOURS;
use surf_rater::aggregator::{Aggregator, Outlook, compare};
use surf_rater::config::{
    ApiSettings, DEFAULT_CACHE_TTL, DEFAULT_FORECAST_DAYS, DEFAULT_FORECAST_URL,
    DEFAULT_MARINE_URL, MAX_FORECAST_DAYS, SurfConfig, WindUnit,
};
use surf_rater::fetch::{BasicClient, HttpClient, auth::UrlParam};
use surf_rater::infra::cache::CachedSource;
use surf_rater::infra::openmeteo::OpenMeteo;
use surf_rater::model::{DateWindow, Spot};
use surf_rater::output::{ForecastRecord, append_records, print_json, print_pretty};
use surf_rater::render::{comparison_text, dashboard, map_markers};
use surf_rater::scoring::ScoringScheme;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "surf_rater")]
#[command(about = "Decide whether it is worth going surfing", long_about = None)]
struct Cli {
    /// JSON file with spots and scoring thresholds (built-in spots if omitted)
    #[arg(long, env = "SURF_CONFIG", global = true)]
    config: Option<String>,

    /// Base URL of the marine forecast API
    #[arg(long, env = "OPEN_METEO_MARINE_URL", default_value = DEFAULT_MARINE_URL, global = true)]
    marine_url: String,

    /// Base URL of the weather forecast API
    #[arg(long, env = "OPEN_METEO_FORECAST_URL", default_value = DEFAULT_FORECAST_URL, global = true)]
    forecast_url: String,

    /// Optional API key for the customer endpoints
    #[arg(long, env = "OPEN_METEO_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Unit requested for wind speed
    #[arg(long, env = "SURF_WIND_UNIT", value_enum, default_value_t = WindUnit::Kmh, global = true)]
    wind_unit: WindUnit,

    /// Seconds a fetched forecast is reused before refetching
    #[arg(long, env = "SURF_CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL.as_secs(), global = true)]
    cache_ttl: u64,

    /// Number of forecast days to request, starting today
    #[arg(
        long,
        default_value_t = DEFAULT_FORECAST_DAYS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_FORECAST_DAYS)),
        global = true
    )]
    days: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured spots
    Spots,
    /// Show the verdict, hour strip and forecast table for one spot
    Verdict {
        /// Spot name (case-insensitive)
        #[arg(short, long)]
        spot: String,

        /// Scoring scheme for the panel and the strip
        #[arg(long, value_enum, default_value_t = ScoringScheme::Narrative)]
        scheme: ScoringScheme,

        /// Number of upcoming hours to include
        #[arg(long, default_value_t = DEFAULT_HOURS)]
        hours: usize,

        /// Print the dashboard as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Score the current hour at every spot and rank them
    Compare {
        /// Scoring scheme used for ranking and map colors
        #[arg(long, value_enum, default_value_t = ScoringScheme::Rating)]
        scheme: ScoringScheme,

        /// Maximum number of spots fetched at once
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,

        /// Print map markers as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-evaluate one spot on an interval
    Watch {
        /// Spot name (case-insensitive)
        #[arg(short, long)]
        spot: String,

        #[arg(long, value_enum, default_value_t = ScoringScheme::Narrative)]
        scheme: ScoringScheme,

        /// Seconds between evaluations
        #[arg(short, long, default_value_t = 300)]
        interval: u64,

        /// Number of evaluations (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        rounds: usize,
    },
    /// Append the scored upcoming hours of a spot to a CSV file
    Export {
        /// Spot name (case-insensitive)
        #[arg(short, long)]
        spot: String,

        /// CSV file to append results to
        #[arg(short, long, default_value = "forecast.csv")]
        output: String,

        #[arg(long, value_enum, default_value_t = ScoringScheme::Narrative)]
        scheme: ScoringScheme,

        /// Number of upcoming hours to export
        #[arg(long, default_value_t = DEFAULT_HOURS)]
        hours: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/surf_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("surf_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SurfConfig::load(path)?,
        None => SurfConfig::default(),
    }
    .install();
    info!(spots = config.spots.len(), "Configuration loaded");

    let settings = ApiSettings {
        marine_base_url: cli.marine_url,
        forecast_base_url: cli.forecast_url,
        api_key: cli.api_key,
        wind_unit: cli.wind_unit,
        cache_ttl: Duration::from_secs(cli.cache_ttl),
        forecast_days: cli.days,
    };

    match cli.command {
        Commands::Spots => {
            for spot in &config.spots {
                println!(
                    "{:<16} {:>9.4} {:>9.4}  {}",
                    spot.name,
                    spot.lat,
                    spot.lon,
                    spot.webcam.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Verdict {
            spot,
            scheme,
            hours,
            json,
        } => {
            let spot = find_spot(config, &spot)?;
            let aggregator = build_aggregator(&settings)?;
            let scorer = config.scoring.scorer(scheme);

            let now = Utc::now();
            let window = DateWindow::from_today(now, settings.forecast_days);
            let outlook = aggregator.outlook(spot, window, now, hours).await;
            let page = dashboard(spot, outlook, scorer.as_ref());
            print_pretty(&page);

            if json {
                print_json(&page)?;
            } else {
                print!("{page}");
            }
        }
        Commands::Compare {
            scheme,
            concurrency,
            json,
        } => {
            let aggregator = build_aggregator(&settings)?;
            let scorer = Arc::from(config.scoring.scorer(scheme));

            let now = Utc::now();
            let window = DateWindow::from_today(now, settings.forecast_days);
            let ratings = compare(&aggregator, &config.spots, window, now, scorer, concurrency).await;

            if json {
                print_json(&map_markers(&ratings))?;
            } else {
                print!("{}", comparison_text(&ratings));
            }
        }
        Commands::Watch {
            spot,
            scheme,
            interval,
            rounds,
        } => {
            let spot = find_spot(config, &spot)?;
            let aggregator = build_aggregator(&settings)?;
            watch(&aggregator, spot, scheme, settings.forecast_days, interval, rounds).await;
        }
        Commands::Export {
            spot,
            output,
            scheme,
            hours,
        } => {
            let spot = find_spot(config, &spot)?;
            let aggregator = build_aggregator(&settings)?;
            let scorer = config.scoring.scorer(scheme);

            let now = Utc::now();
            let window = DateWindow::from_today(now, settings.forecast_days);
            match aggregator.outlook(spot, window, now, hours).await {
                Outlook::Ready(series) => {
                    let records = ForecastRecord::from_series(spot, &series, scorer.as_ref());
                    append_records(&output, &records)?;
                    info!(output, rows = records.len(), "Forecast exported");
                }
                Outlook::NoUpcomingData => warn!("No upcoming forecast, nothing exported"),
                Outlook::Unavailable(err) => {
                    return Err(anyhow!("Forecast unavailable for '{}': {}", spot.name, err));
                }
            }
        }
    }

    Ok(())
}

fn find_spot<'a>(config: &'a SurfConfig, name: &str) -> Result<&'a Spot> {
    config.spot(name).ok_or_else(|| {
        let known: Vec<&str> = config.spots.iter().map(|s| s.name.as_str()).collect();
        anyhow!("Unknown spot '{}'. Known spots: {}", name, known.join(", "))
    })
}

/// Wires the Open-Meteo source behind the optional API key and the TTL cache.
fn build_aggregator(settings: &ApiSettings) -> Result<Aggregator> {
    let http = BasicClient::new()?;
    let http: Box<dyn HttpClient> = match &settings.api_key {
        Some(key) => Box::new(UrlParam::apikey(http, key.clone())),
        None => Box::new(http),
    };

    let source = OpenMeteo::new(http, settings)?;
    Ok(Aggregator::new(Arc::new(CachedSource::new(
        source,
        settings.cache_ttl,
    ))))
}

/// Re-scores `spot` every `interval` seconds, reusing cached forecasts
/// until they expire.
#[tracing::instrument(skip(aggregator, spot), fields(spot = %spot.name))]
async fn watch(
    aggregator: &Aggregator,
    spot: &Spot,
    scheme: ScoringScheme,
    days: u32,
    interval: u64,
    rounds: usize,
) {
    let scorer = surf_rater::config::current().scoring.scorer(scheme);
    let mut round = 0;

    if rounds == 0 {
        info!(interval, "Watching indefinitely. Press Ctrl+C to stop.");
    }

    loop {
        // Check if we've reached the round limit (0 = infinite)
        if rounds > 0 && round >= rounds {
            break;
        }
        round += 1;

        let now = Utc::now();
        let window = DateWindow::from_today(now, days);
        let outlook = aggregator.outlook(spot, window, now, DEFAULT_HOURS).await;
        let page = dashboard(spot, outlook, scorer.as_ref());

        info!(round, "Evaluation complete");
        println!("{page}");

        if rounds == 0 || round < rounds {
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config_constants() {
        let cli = Cli::try_parse_from(["surf_rater", "spots"]).unwrap();
        assert_eq!(cli.cache_ttl, DEFAULT_CACHE_TTL.as_secs());
        assert_eq!(cli.days, DEFAULT_FORECAST_DAYS);
    }

    #[test]
    fn test_days_limited_to_forecast_horizon() {
        let cli = Cli::try_parse_from(["surf_rater", "--days", "16", "spots"]).unwrap();
        assert_eq!(cli.days, MAX_FORECAST_DAYS);

        assert!(Cli::try_parse_from(["surf_rater", "--days", "17", "spots"]).is_err());
        assert!(Cli::try_parse_from(["surf_rater", "--days", "0", "spots"]).is_err());
        assert!(Cli::try_parse_from(["surf_rater", "--days", "200000000", "spots"]).is_err());
    }
}
