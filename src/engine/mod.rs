//! The scheduling core: leaf utilities (duration parsing, geo resolution,
//! activity matching), the candidate ranker, the day skeleton builder, the
//! route segment enricher and the mutation engine.

pub mod duration;
pub mod enricher;
pub mod geo;
pub mod matching;
pub mod mutation;
pub mod ranker;
pub mod skeleton;

pub use duration::{duration_text, parse_duration};
pub use enricher::{enrich_day, DayTransportPlan};
pub use matching::{find_activity, find_adjacent_pair};
pub use mutation::{apply_change_set, MutationContext};
pub use ranker::{heuristic_candidates, rank_candidates};
pub use skeleton::{build_day, build_days, DaySkeleton};
