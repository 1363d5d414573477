pub mod itinerary_service;
pub mod store;

pub use itinerary_service::{validate_planner_data, ItineraryService};
pub use store::{InMemoryItineraryStore, ItineraryStore};
