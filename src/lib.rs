//! tripweaver: itinerary scheduling and mutation engine for multi-day trips
//!
//! The crate turns a set of ranked points of interest into a day-by-day
//! timeline of activities connected by transport legs, and applies targeted,
//! incremental edits to that timeline (add/remove/replace an activity,
//! change a transport mode, regenerate a single day) without discarding
//! unaffected days.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tripweaver::{deserialize_planner_data, ItineraryService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = deserialize_planner_data(&std::fs::read_to_string("trip.json")?)?;
//!     let service = ItineraryService::offline();
//!
//!     let itinerary = service.create_itinerary(planner).await?;
//!     println!("{}", serde_json::to_string_pretty(&itinerary)?);
//!     Ok(())
//! }
//! ```

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod types;

pub use collaborators::{
    ContentEnricher, FixedRoutePlanner, GooglePlacesDiscovery, GoogleRoutesPlanner, NoopEnricher,
    PoiDiscovery, RoutePlanner, RouteSegment, StaticDiscovery,
};
pub use config::Settings;
pub use engine::{
    apply_change_set, build_days, duration_text, enrich_day, find_activity, parse_duration,
    rank_candidates, DayTransportPlan, MutationContext,
};
pub use error::{PlannerError, Result};
pub use services::{validate_planner_data, InMemoryItineraryStore, ItineraryService, ItineraryStore};
pub use types::{
    deserialize_planner_data, Activity, ChangeInstruction, DateRange, DayItinerary, Itinerary,
    Location, PlannerData, PoiCandidate, TransportLeg, TransportMode, Travelers,
};

#[cfg(feature = "cli")]
pub mod cli;
