use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::collaborators::{
    ContentEnricher, FixedRoutePlanner, NoopEnricher, PoiDiscovery, RoutePlanner, StaticDiscovery,
};
use crate::engine::enricher::{enrich_day, DayTransportPlan};
use crate::engine::geo;
use crate::engine::matching::find_activity;
use crate::engine::mutation::{apply_change_set, MutationContext};
use crate::engine::ranker::rank_candidates;
use crate::engine::skeleton::{build_days, DaySkeleton};
use crate::error::{PlannerError, Result};
use crate::types::{ChangeInstruction, DayItinerary, Itinerary, PlannerData, PoiCandidate};

use super::store::{InMemoryItineraryStore, ItineraryStore};

/// Search radius for nearby-restaurant recommendations
const RESTAURANT_RADIUS_M: u32 = 2000;

/// Orchestrates the planning pipeline (discover → rank → build → enrich)
/// and applies mutation batches against the store. Collaborators are passed
/// in explicitly so each one can be swapped for a test double.
#[derive(Debug)]
pub struct ItineraryService {
    store: Arc<dyn ItineraryStore>,
    discovery: Arc<dyn PoiDiscovery>,
    routes: Arc<dyn RoutePlanner>,
    enricher: Arc<dyn ContentEnricher>,
    // serializes mutation batches per itinerary id
    mutation_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ItineraryService {
    pub fn new(
        store: Arc<dyn ItineraryStore>,
        discovery: Arc<dyn PoiDiscovery>,
        routes: Arc<dyn RoutePlanner>,
        enricher: Arc<dyn ContentEnricher>,
    ) -> Self {
        Self {
            store,
            discovery,
            routes,
            enricher,
            mutation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Service wired with offline collaborators: heuristic-only discovery,
    /// constant route segments, no content enrichment.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(InMemoryItineraryStore::new()),
            Arc::new(StaticDiscovery::default()),
            Arc::new(FixedRoutePlanner::default()),
            Arc::new(NoopEnricher),
        )
    }

    /// Validate the trip intent, run the full generation pipeline and save
    /// the resulting itinerary.
    pub async fn create_itinerary(&self, planner: PlannerData) -> Result<Itinerary> {
        validate_planner_data(&planner)?;

        let candidates = self.discovery.discover(&planner).await;
        info!(
            target: "tripweaver::service",
            "discovered {} candidates for {} cities",
            candidates.len(),
            planner.cities.len()
        );
        let ranked = rank_candidates(candidates, &planner);
        let skeletons = build_days(&planner, &ranked);

        // days share no state during enrichment, so they run concurrently
        let default_mode = planner.transport;
        let mut join = JoinSet::new();
        for skeleton in skeletons {
            let routes = Arc::clone(&self.routes);
            let enricher = Arc::clone(&self.enricher);
            let planner = planner.clone();
            join.spawn(async move {
                let DaySkeleton {
                    day,
                    date,
                    title,
                    mut activities,
                    ..
                } = skeleton;
                enricher.enrich(&mut activities, &planner).await;
                let (legs, locations) = enrich_day(
                    &mut activities,
                    &DayTransportPlan::default(),
                    default_mode,
                    routes.as_ref(),
                )
                .await;
                (day, date, title, activities, legs, locations)
            });
        }

        let mut days = BTreeMap::new();
        while let Some(result) = join.join_next().await {
            match result {
                Ok((day, date, title, activities, legs, locations)) => {
                    days.insert(day, (date, title, activities, legs, locations));
                }
                Err(err) => {
                    warn!(target: "tripweaver::service", "day generation task failed: {}", err);
                }
            }
        }

        let mut overview = Vec::with_capacity(days.len());
        let mut activities_by_day = BTreeMap::new();
        for (day, (date, title, activities, legs, locations)) in days {
            overview.push(DayItinerary {
                day,
                date,
                title,
                photo: "/city-arrival.jpg".to_string(),
                activities: activities.iter().map(|a| a.name.clone()).collect(),
                locations,
                transports: legs,
            });
            activities_by_day.insert(day.to_string(), activities);
        }

        let now = Utc::now();
        let itinerary = Itinerary {
            id: new_itinerary_id(),
            planner_data: planner,
            overview,
            activities_by_day,
            created_at: now,
            updated_at: now,
        };
        self.store.save(itinerary).await
    }

    pub async fn get_itinerary(&self, id: &str) -> Result<Itinerary> {
        self.store.get(id).await
    }

    /// Apply an ordered batch of change instructions to a stored itinerary.
    ///
    /// Batches against the same id are serialized; interleaved partial
    /// updates would otherwise corrupt the per-day invariants.
    pub async fn apply_changes(
        &self,
        id: &str,
        changes: &[ChangeInstruction],
    ) -> Result<(Itinerary, Vec<String>)> {
        let lock = self.mutation_lock(id).await;
        let _guard = lock.lock().await;

        let mut itinerary = self.store.get(id).await?;
        let ctx = MutationContext {
            discovery: Arc::clone(&self.discovery),
            routes: Arc::clone(&self.routes),
        };
        let summaries = apply_change_set(&mut itinerary, changes, &ctx).await;
        let updated = self.store.update(itinerary).await?;
        Ok((updated, summaries))
    }

    /// Restaurants around an existing activity, nearest first
    pub async fn recommend_restaurants_near(
        &self,
        id: &str,
        day: u32,
        anchor: &str,
    ) -> Result<Vec<PoiCandidate>> {
        let itinerary = self.store.get(id).await?;
        let activities = itinerary.day_activities(day);
        let index = find_activity(activities, anchor).ok_or_else(|| {
            PlannerError::NotFound(format!("activity '{}' on day {}", anchor, day))
        })?;
        let activity = &activities[index];
        let (lat, lng) = activity
            .coords()
            .unwrap_or_else(|| geo::coords_for(&activity.location));

        let mut results = self
            .discovery
            .restaurants_near(&activity.name, lat, lng, RESTAURANT_RADIUS_M)
            .await;
        results.sort_by(|a, b| {
            distance_from(a, lat, lng)
                .partial_cmp(&distance_from(b, lat, lng))
                .unwrap_or(Ordering::Equal)
        });
        Ok(results)
    }

    async fn mutation_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.mutation_locks.lock().await;
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn distance_from(candidate: &PoiCandidate, lat: f64, lng: f64) -> f64 {
    candidate
        .coords()
        .map(|(c_lat, c_lng)| geo::distance_m(lat, lng, c_lat, c_lng))
        .unwrap_or(f64::MAX)
}

fn new_itinerary_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("itn_{}", &hex[..12])
}

/// Reject malformed trip intent before any scheduling work begins
pub fn validate_planner_data(planner: &PlannerData) -> Result<()> {
    if planner.country.trim().is_empty() {
        return Err(PlannerError::validation(
            "plannerData.country",
            "필수 값입니다.",
        ));
    }
    if planner.date_range.start > planner.date_range.end {
        return Err(PlannerError::validation(
            "plannerData.dateRange",
            "출발일과 도착일을 확인하세요.",
        ));
    }
    if planner.date_range.start < Utc::now().date_naive() {
        return Err(PlannerError::validation(
            "plannerData.dateRange.start",
            "출발일은 오늘 이후여야 합니다.",
        ));
    }
    if planner.travelers.adults < 1 {
        return Err(PlannerError::validation(
            "plannerData.travelers.adults",
            "성인은 1명 이상이어야 합니다.",
        ));
    }
    if planner.styles.is_empty() {
        return Err(PlannerError::validation(
            "plannerData.styles",
            "최소 1개 이상의 스타일을 선택하세요.",
        ));
    }
    if planner.cities.is_empty() {
        return Err(PlannerError::validation(
            "plannerData.cities",
            "최소 1개 도시를 입력하세요.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateRange, TransportMode, Travelers};
    use chrono::Duration;

    fn valid_planner() -> PlannerData {
        let start = Utc::now().date_naive() + Duration::days(30);
        PlannerData {
            country: "France".to_string(),
            cities: vec!["Paris".to_string()],
            date_range: DateRange {
                start,
                end: start + Duration::days(1),
            },
            travelers: Travelers {
                adults: 2,
                children: 0,
                kind: "couple".to_string(),
            },
            styles: vec!["museum".to_string()],
            transport: TransportMode::Drive,
        }
    }

    #[test]
    fn test_validation_accepts_valid_planner() {
        assert!(validate_planner_data(&valid_planner()).is_ok());
    }

    #[test]
    fn test_validation_rejects_inverted_range() {
        let mut planner = valid_planner();
        planner.date_range.end = planner.date_range.start - Duration::days(1);
        let err = validate_planner_data(&planner).unwrap_err();
        match err {
            PlannerError::Validation { field, .. } => {
                assert_eq!(field, "plannerData.dateRange")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_past_start() {
        let mut planner = valid_planner();
        planner.date_range.start = Utc::now().date_naive() - Duration::days(1);
        assert!(validate_planner_data(&planner).is_err());
    }

    #[test]
    fn test_validation_rejects_missing_fields() {
        let mut planner = valid_planner();
        planner.styles.clear();
        assert!(validate_planner_data(&planner).is_err());

        let mut planner = valid_planner();
        planner.cities.clear();
        assert!(validate_planner_data(&planner).is_err());

        let mut planner = valid_planner();
        planner.travelers.adults = 0;
        assert!(validate_planner_data(&planner).is_err());
    }

    #[test]
    fn test_itinerary_id_shape() {
        let id = new_itinerary_id();
        assert!(id.starts_with("itn_"));
        assert_eq!(id.len(), 16);
    }
}
