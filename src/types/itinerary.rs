use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::planner::{PlannerData, TransportMode};

/// One scheduled stop within a day.
///
/// The id has the form `"{day}-{slot}"` (1-based slot) and is reassigned
/// whenever a mutation changes the day's activity count. Description, tips,
/// price and opening hours are opaque to the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Naive local clock time, "HH:MM"
    pub time: String,
    /// Free-text dwell duration, e.g. "1시간 30분" or "45 min"
    pub duration: String,
    pub description: String,
    pub image: String,
    pub open_hours: String,
    pub price: String,
    pub tips: Vec<String>,
    pub nearby_food: Vec<String>,
    pub estimated_duration: String,
    pub best_time: String,
}

impl Activity {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Map pin for one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub time: String,
    pub lat: f64,
    pub lng: f64,
}

/// Transport hop between two chronologically adjacent activities of one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportLeg {
    pub from_id: String,
    pub to_id: String,
    pub mode: TransportMode,
    pub duration_minutes: u32,
    pub distance_meters: u32,
    pub summary: String,
}

/// Denormalized per-day overview record.
///
/// `activities` and `locations` mirror the day's authoritative activity list
/// and are rewritten by the synchronization pass after every mutation.
/// `transports` always has exactly `activities.len() - 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayItinerary {
    pub day: u32,
    pub date: NaiveDate,
    pub title: String,
    pub photo: String,
    pub activities: Vec<String>,
    pub locations: Vec<Location>,
    #[serde(default)]
    pub transports: Vec<TransportLeg>,
}

/// The itinerary aggregate: trip intent, day overviews and per-day activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub planner_data: PlannerData,
    pub overview: Vec<DayItinerary>,
    /// Keyed by day number as a string, "1", "2", ...
    pub activities_by_day: BTreeMap<String, Vec<Activity>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Itinerary {
    /// Activities of a 1-based day, empty when the day does not exist
    pub fn day_activities(&self, day: u32) -> &[Activity] {
        self.activities_by_day
            .get(&day.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Overview record of a 1-based day
    pub fn day_overview(&self, day: u32) -> Option<&DayItinerary> {
        self.overview.iter().find(|item| item.day == day)
    }
}
