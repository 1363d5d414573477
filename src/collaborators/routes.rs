use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::types::{Location, TransportMode};

const DEFAULT_BASE_URL: &str = "https://routes.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback returned when a route request fails or comes back short
const FALLBACK_MINUTES: u32 = 30;
const FALLBACK_METERS: u32 = 2000;

/// One computed hop between two adjacent locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    pub mode: TransportMode,
    pub duration_minutes: u32,
    pub distance_meters: u32,
}

/// Route-distance collaborator.
///
/// Implementations may return fewer segments than `locations.len() - 1` and
/// must never fail; network and API errors degrade to fallback values inside
/// the implementation.
#[async_trait]
pub trait RoutePlanner: Send + Sync + std::fmt::Debug {
    async fn segments(
        &self,
        locations: &[Location],
        mode: TransportMode,
        overrides: &BTreeMap<usize, TransportMode>,
    ) -> Vec<RouteSegment>;
}

/// Offline planner returning one constant segment per adjacent pair.
/// Used as the no-API-key default and as the test double.
#[derive(Debug, Clone)]
pub struct FixedRoutePlanner {
    minutes: u32,
    meters: u32,
}

impl FixedRoutePlanner {
    pub fn new(minutes: u32, meters: u32) -> Self {
        Self { minutes, meters }
    }
}

impl Default for FixedRoutePlanner {
    fn default() -> Self {
        Self::new(15, 1500)
    }
}

#[async_trait]
impl RoutePlanner for FixedRoutePlanner {
    async fn segments(
        &self,
        locations: &[Location],
        mode: TransportMode,
        overrides: &BTreeMap<usize, TransportMode>,
    ) -> Vec<RouteSegment> {
        if locations.len() < 2 {
            return Vec::new();
        }
        (0..locations.len() - 1)
            .map(|index| RouteSegment {
                mode: overrides.get(&index).copied().unwrap_or(mode),
                duration_minutes: self.minutes,
                distance_meters: self.meters,
            })
            .collect()
    }
}

/// Google Routes API client (computeRoutes), one request per adjacent pair
#[derive(Debug, Clone)]
pub struct GoogleRoutesPlanner {
    api_key: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl GoogleRoutesPlanner {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn compute_pair(
        &self,
        from: &Location,
        to: &Location,
        mode: TransportMode,
    ) -> Option<RouteSegment> {
        let url = format!(
            "{}/directions/v2:computeRoutes",
            self.base_url.trim_end_matches('/')
        );
        let body = json!({
            "origin": {"location": {"latLng": {"latitude": from.lat, "longitude": from.lng}}},
            "destination": {"location": {"latLng": {"latitude": to.lat, "longitude": to.lng}}},
            "travelMode": travel_mode_name(mode),
        });

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", "routes.duration,routes.distanceMeters")
            .json(&body)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(
                target: "tripweaver::routes",
                "computeRoutes returned status {} for {} → {}",
                response.status(),
                from.name,
                to.name
            );
            return None;
        }

        let payload: serde_json::Value = response.json().await.ok()?;
        let route = payload.get("routes")?.as_array()?.first()?;
        let duration_minutes = route
            .get("duration")
            .and_then(|value| value.as_str())
            .and_then(parse_duration_seconds)
            .map(|seconds| seconds.div_ceil(60))?;
        let distance_meters = route
            .get("distanceMeters")
            .and_then(|value| value.as_u64())
            .unwrap_or(FALLBACK_METERS as u64) as u32;

        Some(RouteSegment {
            mode,
            duration_minutes,
            distance_meters,
        })
    }
}

#[async_trait]
impl RoutePlanner for GoogleRoutesPlanner {
    async fn segments(
        &self,
        locations: &[Location],
        mode: TransportMode,
        overrides: &BTreeMap<usize, TransportMode>,
    ) -> Vec<RouteSegment> {
        if locations.len() < 2 {
            return Vec::new();
        }

        let mut segments = Vec::with_capacity(locations.len() - 1);
        for (index, pair) in locations.windows(2).enumerate() {
            let segment_mode = overrides.get(&index).copied().unwrap_or(mode);
            let segment = match self.compute_pair(&pair[0], &pair[1], segment_mode).await {
                Some(segment) => segment,
                None => {
                    warn!(
                        target: "tripweaver::routes",
                        "falling back to constant segment for {} → {}",
                        pair[0].name,
                        pair[1].name
                    );
                    RouteSegment {
                        mode: segment_mode,
                        duration_minutes: FALLBACK_MINUTES,
                        distance_meters: FALLBACK_METERS,
                    }
                }
            };
            segments.push(segment);
        }
        segments
    }
}

fn travel_mode_name(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Drive => "DRIVE",
        TransportMode::Walk => "WALK",
        TransportMode::Transit => "TRANSIT",
        TransportMode::Bike => "BICYCLE",
    }
}

/// Parse the API's "123s" duration strings into whole seconds
fn parse_duration_seconds(raw: &str) -> Option<u32> {
    raw.trim_end_matches('s').parse::<f64>().ok().map(|seconds| {
        if seconds <= 0.0 {
            0
        } else {
            seconds.ceil() as u32
        }
    })
}
