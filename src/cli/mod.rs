use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tracing::info;

use crate::collaborators::{
    FixedRoutePlanner, GooglePlacesDiscovery, GoogleRoutesPlanner, NoopEnricher, PoiDiscovery,
    RoutePlanner, StaticDiscovery,
};
use crate::config::Settings;
use crate::services::{InMemoryItineraryStore, ItineraryService};
use crate::types::deserialize_planner_data;

/// CLI entry point: generate an itinerary from a planner JSON file
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("tripweaver")
        .version("0.1.0")
        .about("Generate a multi-day travel itinerary from a planner JSON file")
        .arg(
            Arg::new("planner")
                .help("Path to the planner JSON file (country, cities, dateRange, ...)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Skip external APIs even when keys are configured")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request timeout for external API calls")
                .default_value("10"),
        )
        .get_matches();

    let planner_path = matches.get_one::<String>("planner").unwrap();
    let raw = std::fs::read_to_string(planner_path)
        .with_context(|| format!("failed to read planner file {}", planner_path))?;
    let planner = deserialize_planner_data(&raw)?;

    let mut settings = Settings::from_env();
    let timeout_secs: u64 = matches.get_one::<String>("timeout").unwrap().parse()?;
    settings.request_timeout = std::time::Duration::from_secs(timeout_secs);
    if matches.get_flag("offline") {
        settings.google_places_api_key = None;
        settings.google_routes_api_key = None;
    }

    let discovery: Arc<dyn PoiDiscovery> = match &settings.google_places_api_key {
        Some(key) => Arc::new(
            GooglePlacesDiscovery::new(key.clone()).with_timeout(settings.request_timeout),
        ),
        None => Arc::new(StaticDiscovery::default()),
    };
    let routes: Arc<dyn RoutePlanner> = match &settings.google_routes_api_key {
        Some(key) => {
            Arc::new(GoogleRoutesPlanner::new(key.clone()).with_timeout(settings.request_timeout))
        }
        None => Arc::new(FixedRoutePlanner::default()),
    };

    let service = ItineraryService::new(
        Arc::new(InMemoryItineraryStore::new()),
        discovery,
        routes,
        Arc::new(NoopEnricher),
    );

    info!(
        "Planning {} days across {} cities",
        planner.date_range.num_days(),
        planner.cities.len()
    );

    let itinerary = service.create_itinerary(planner).await?;
    println!("{}", serde_json::to_string_pretty(&itinerary)?);

    Ok(())
}
