use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Inclusive calendar range for a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Number of itinerary days covered by the range, never less than 1
    pub fn num_days(&self) -> u32 {
        let days = (self.end - self.start).num_days() + 1;
        days.max(1) as u32
    }

    /// Calendar date of a 1-based itinerary day
    pub fn date_of_day(&self, day: u32) -> NaiveDate {
        self.start + chrono::Duration::days(day as i64 - 1)
    }
}

/// Traveler counts for the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Travelers {
    pub adults: u32,
    pub children: u32,
    /// Traveler group label, e.g. "couple" or "family"
    #[serde(rename = "type")]
    pub kind: String,
}

/// How travelers move between two activities
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Drive,
    Walk,
    Transit,
    Bike,
}

impl TransportMode {
    /// Display label used in summaries shown to travelers
    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Drive => "차량",
            TransportMode::Walk => "도보",
            TransportMode::Transit => "대중교통",
            TransportMode::Bike => "자전거",
        }
    }
}

/// Trip intent provided by the caller; immutable input to a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannerData {
    pub country: String,
    pub cities: Vec<String>,
    pub date_range: DateRange,
    pub travelers: Travelers,
    pub styles: Vec<String>,
    /// Preferred default transport mode between activities
    #[serde(default)]
    pub transport: TransportMode,
}

/// Deserialize caller-supplied planner JSON, reporting the failing field path
pub fn deserialize_planner_data(raw: &str) -> Result<PlannerData> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let field = if path.is_empty() {
            "plannerData".to_string()
        } else {
            format!("plannerData.{}", path)
        };
        PlannerError::Validation {
            field,
            reason: err.to_string(),
        }
    })
}
