//! Command-line host for the location flow.
//!
//! Locates the user from the given coordinate, searches the configured query
//! nearby, and prints the resulting markers as GeoJSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use locmap::config::{Config, TOKEN_ENV};
use locmap::geolocation::{FixedLocation, Geolocator, Unsupported, WithTimeout};
use locmap::notice::RecordingNotifier;
use locmap::search::SearchBoxClient;
use locmap::surface::MemoryEngine;
use locmap::{Coordinate, FlowSettings, LocationFlow};

#[derive(Parser, Debug)]
#[command(name = "locmap")]
#[command(about = "Find places near a location and print them as map markers")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Longitude of the user's position
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<f64>,

    /// Latitude of the user's position
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<f64>,

    /// Override the configured query term
    #[arg(short, long)]
    query: Option<String>,

    /// Search API access token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Pretty-print the GeoJSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(query) = &args.query {
        config.search.query = query.clone();
    }
    if args.token.is_some() {
        config.search.access_token = args.token.clone();
    }
    let config = config.with_env_token();

    let token = config
        .search
        .access_token
        .clone()
        .with_context(|| format!("No access token; pass --token or set {}", TOKEN_ENV))?;
    let client = SearchBoxClient::new(&config.search.endpoint, &token, config.search_timeout())?;
    let settings = FlowSettings::from_config(&config)?;

    info!("Locmap");
    info!("Style: {}", config.map.style);
    info!("Query: {:?}", settings.query);

    let geolocator = geolocator(&args, &config)?;
    let engine = MemoryEngine::new();
    let notices = RecordingNotifier::new();

    let mut flow = LocationFlow::new(engine.clone(), settings, geolocator, client, notices.clone());
    flow.activate().await?;
    info!("Flow finished in state {:?}", flow.state());

    for notice in notices.notices() {
        eprintln!("{}", notice);
    }

    let ledger = engine.latest().context("Map was never mounted")?;
    let snapshot = ledger.borrow().to_geojson();
    let output = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", output);

    flow.teardown();
    Ok(())
}

/// Location source from the command line, bounded by the configured timeout
fn geolocator(args: &Args, config: &Config) -> Result<Box<dyn Geolocator>> {
    let source: Box<dyn Geolocator> = match (args.lng, args.lat) {
        (Some(lng), Some(lat)) => {
            let here = Coordinate::new(lng, lat).context("Invalid --lng/--lat")?;
            Box::new(FixedLocation(here))
        }
        _ => Box::new(Unsupported::new("no --lng/--lat given")),
    };

    Ok(match config.geolocation_timeout() {
        Some(timeout) => Box::new(WithTimeout::new(source, timeout)),
        None => source,
    })
}
