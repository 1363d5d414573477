use serde::{Deserialize, Serialize};

/// Normalized point-of-interest candidate produced by a discovery collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiCandidate {
    pub name: String,
    pub city: String,
    /// Place category, e.g. "museum" or "tourist_attraction"
    #[serde(rename = "type")]
    pub kind: String,
    /// Affinity score against the requested travel styles
    pub style_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Short editorial text or address used as the activity description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Provenance tag, e.g. "google_places" or "heuristic"
    pub source: String,
}

impl PoiCandidate {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}
