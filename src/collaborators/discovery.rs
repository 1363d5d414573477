use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

use crate::types::{PlannerData, PoiCandidate};

const PLACES_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const LEGACY_TEXTSEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESULTS_PER_QUERY: usize = 8;

const PLACES_FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,\
places.types,places.rating,places.userRatingCount,places.primaryType,places.editorialSummary,\
places.photos";

/// POI discovery collaborator.
///
/// `discover` may return an empty list and must never fail; errors degrade
/// to empty results so the ranker can fall back to its heuristic candidates.
#[async_trait]
pub trait PoiDiscovery: Send + Sync + std::fmt::Debug {
    async fn discover(&self, planner: &PlannerData) -> Vec<PoiCandidate>;

    /// Location-biased restaurant search around an anchor activity
    async fn restaurants_near(
        &self,
        _anchor: &str,
        _lat: f64,
        _lng: f64,
        _radius_m: u32,
    ) -> Vec<PoiCandidate> {
        Vec::new()
    }
}

/// Fixed candidate list for tests and offline runs. An empty list is valid
/// and pushes the ranker onto its heuristic fallback.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    candidates: Vec<PoiCandidate>,
}

impl StaticDiscovery {
    pub fn new(candidates: Vec<PoiCandidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl PoiDiscovery for StaticDiscovery {
    async fn discover(&self, _planner: &PlannerData) -> Vec<PoiCandidate> {
        self.candidates.clone()
    }
}

/// Google Places text-search client with a legacy-API fallback
#[derive(Debug, Clone)]
pub struct GooglePlacesDiscovery {
    api_key: String,
    places_url: String,
    legacy_url: String,
    client: Client,
    timeout: Duration,
}

impl GooglePlacesDiscovery {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            places_url: PLACES_URL.to_string(),
            legacy_url: LEGACY_TEXTSEARCH_URL.to_string(),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_places_url(mut self, url: impl Into<String>) -> Self {
        self.places_url = url.into();
        self
    }

    pub fn with_legacy_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn search_places(&self, query: &str, bias: Option<(f64, f64, u32)>) -> Vec<Value> {
        let mut payload = json!({
            "textQuery": query,
            "pageSize": MAX_RESULTS_PER_QUERY,
            "languageCode": "ko",
        });
        if let Some((lat, lng, radius_m)) = bias {
            payload["locationBias"] = json!({
                "circle": {
                    "center": {"latitude": lat, "longitude": lng},
                    "radius": radius_m,
                }
            });
        }

        let result = self
            .client
            .post(&self.places_url)
            .timeout(self.timeout)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", PLACES_FIELD_MASK)
            .json(&payload)
            .send()
            .await;

        let places = match result {
            Ok(response) if response.status().is_success() => response
                .json::<Value>()
                .await
                .ok()
                .and_then(|data| data.get("places").and_then(Value::as_array).cloned())
                .unwrap_or_default(),
            Ok(response) => {
                warn!(
                    target: "tripweaver::discovery",
                    "places search for '{}' returned status {}",
                    query,
                    response.status()
                );
                Vec::new()
            }
            Err(err) => {
                warn!(target: "tripweaver::discovery", "places search for '{}' failed: {}", query, err);
                Vec::new()
            }
        };

        if !places.is_empty() {
            return places;
        }

        // classic text search when the new Places API is not enabled for the key
        self.search_places_legacy(query).await
    }

    async fn search_places_legacy(&self, query: &str) -> Vec<Value> {
        let result = self
            .client
            .get(&self.legacy_url)
            .timeout(self.timeout)
            .query(&[
                ("query", query),
                ("language", "ko"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => response
                .json::<Value>()
                .await
                .ok()
                .and_then(|data| data.get("results").and_then(Value::as_array).cloned())
                .map(|mut results| {
                    results.truncate(MAX_RESULTS_PER_QUERY);
                    results
                })
                .unwrap_or_default(),
            Ok(response) => {
                warn!(
                    target: "tripweaver::discovery",
                    "legacy places search for '{}' returned status {}",
                    query,
                    response.status()
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    target: "tripweaver::discovery",
                    "legacy places search for '{}' failed: {}", query, err
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PoiDiscovery for GooglePlacesDiscovery {
    async fn discover(&self, planner: &PlannerData) -> Vec<PoiCandidate> {
        let cities: Vec<&str> = if planner.cities.is_empty() {
            vec![planner.country.as_str()]
        } else {
            planner.cities.iter().map(String::as_str).collect()
        };
        let styles: Vec<&str> = if planner.styles.is_empty() {
            vec!["attraction"]
        } else {
            planner.styles.iter().map(String::as_str).collect()
        };

        let mut candidates = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        for city in &cities {
            for style in &styles {
                let query = format!("{} {} attractions", city, style);
                for place in self.search_places(&query, None).await {
                    let Some(candidate) = normalize_place(&place, city, style) else {
                        continue;
                    };
                    if seen_names.insert(candidate.name.to_lowercase()) {
                        candidates.push(candidate);
                    }
                }
            }
        }
        candidates
    }

    async fn restaurants_near(
        &self,
        anchor: &str,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> Vec<PoiCandidate> {
        let query = format!("{} 근처 맛집", anchor);
        self.search_places(&query, Some((lat, lng, radius_m)))
            .await
            .iter()
            .filter_map(|place| normalize_place(place, anchor, "restaurant"))
            .collect()
    }
}

/// Normalize a raw place object (new Places API or classic shape) into a
/// candidate with a rating-derived style score.
fn normalize_place(place: &Value, city: &str, style: &str) -> Option<PoiCandidate> {
    let name = place
        .pointer("/displayName/text")
        .or_else(|| place.get("name"))
        .and_then(Value::as_str)?
        .to_string();

    // new API: location.latitude; classic API: geometry.location.lat
    let lat = place
        .pointer("/location/latitude")
        .or_else(|| place.pointer("/geometry/location/lat"))
        .and_then(Value::as_f64);
    let lng = place
        .pointer("/location/longitude")
        .or_else(|| place.pointer("/geometry/location/lng"))
        .and_then(Value::as_f64);

    let rating = place.get("rating").and_then(Value::as_f64);
    let user_ratings_total = place
        .get("userRatingCount")
        .or_else(|| place.get("user_ratings_total"))
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    let mut style_score = 6.5;
    if let Some(rating) = rating {
        style_score += (rating / 2.0).min(3.0);
    }
    if user_ratings_total > 200 {
        style_score += 0.5;
    }

    let kind = place
        .get("primaryType")
        .or_else(|| place.get("primary_type"))
        .and_then(Value::as_str)
        .or_else(|| {
            place
                .get("types")
                .and_then(Value::as_array)
                .and_then(|types| types.first())
                .and_then(Value::as_str)
        })
        .unwrap_or(style)
        .to_string();

    let address = place
        .get("formattedAddress")
        .or_else(|| place.get("formatted_address"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let highlight = place
        .pointer("/editorialSummary/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| address.clone())
        .or_else(|| Some(kind.clone()));

    Some(PoiCandidate {
        name,
        city: city.to_string(),
        kind,
        style_score,
        lat,
        lng,
        highlight,
        rating,
        user_ratings_total,
        address,
        image: None,
        source: "google_places".to_string(),
    })
}
