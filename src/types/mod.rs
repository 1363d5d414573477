pub mod change;
pub mod itinerary;
pub mod planner;
pub mod poi;

pub use change::ChangeInstruction;
pub use itinerary::{Activity, DayItinerary, Itinerary, Location, TransportLeg};
pub use planner::{deserialize_planner_data, DateRange, PlannerData, TransportMode, Travelers};
pub use poi::PoiCandidate;
