use std::collections::BTreeMap;

use tracing::warn;

use super::duration::parse_duration;
use super::geo;
use crate::collaborators::routes::{RoutePlanner, RouteSegment};
use crate::types::{Activity, Location, TransportLeg, TransportMode};

/// Every day starts at 08:00
pub const START_OF_DAY_MINUTES: u32 = 8 * 60;

/// Dwell applied when an activity's duration text cannot be parsed
pub const DEFAULT_DWELL_MINUTES: u32 = 60;

/// Fallback for missing or failed route segments
pub const FALLBACK_SEGMENT_MINUTES: u32 = 30;
pub const FALLBACK_SEGMENT_METERS: u32 = 2000;

/// Upper bound on any single segment's travel time
pub const MAX_SEGMENT_MINUTES: u32 = 240;

/// Transport choices resolved for one day: an optional whole-day mode plus
/// per-segment-index overrides that win over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTransportPlan {
    pub day_mode: Option<TransportMode>,
    pub segment_modes: BTreeMap<usize, TransportMode>,
}

impl DayTransportPlan {
    pub fn whole_day(mode: TransportMode) -> Self {
        Self {
            day_mode: Some(mode),
            segment_modes: BTreeMap::new(),
        }
    }

    /// Mode for a segment index, falling back to the day mode, then `default`
    pub fn mode_for(&self, index: usize, default: TransportMode) -> TransportMode {
        self.segment_modes
            .get(&index)
            .copied()
            .or(self.day_mode)
            .unwrap_or(default)
    }
}

/// Compute transport legs and consistent wall-clock times for one day.
///
/// A first pass walks the activities with dwell time only to obtain the
/// location sequence handed to the route collaborator; the second pass
/// re-walks with dwell plus actual travel time and rewrites every activity's
/// clock time. Missing or failed segments degrade to a constant fallback and
/// pathological durations are clamped, so the returned leg list always has
/// exactly `activities.len() - 1` entries.
pub async fn enrich_day(
    activities: &mut [Activity],
    plan: &DayTransportPlan,
    default_mode: TransportMode,
    routes: &dyn RoutePlanner,
) -> (Vec<TransportLeg>, Vec<Location>) {
    if activities.is_empty() {
        return (Vec::new(), Vec::new());
    }

    // pass 1: provisional dwell-only times, yielding the route request points
    let mut minutes = START_OF_DAY_MINUTES;
    let mut locations: Vec<Location> = Vec::with_capacity(activities.len());
    for activity in activities.iter_mut() {
        activity.time = clock_text(minutes);
        let (lat, lng) = activity
            .coords()
            .unwrap_or_else(|| geo::coords_for(&activity.location));
        locations.push(Location {
            name: activity.name.clone(),
            time: activity.time.clone(),
            lat,
            lng,
        });
        minutes += parse_duration(Some(&activity.duration), DEFAULT_DWELL_MINUTES);
    }

    let needed = activities.len() - 1;
    let day_mode = plan.day_mode.unwrap_or(default_mode);
    let raw_segments = if needed > 0 {
        routes
            .segments(&locations, day_mode, &plan.segment_modes)
            .await
    } else {
        Vec::new()
    };
    if raw_segments.len() < needed {
        warn!(
            target: "tripweaver::enricher",
            "route collaborator returned {} of {} segments, padding with fallback",
            raw_segments.len(),
            needed
        );
    }

    let mut legs: Vec<TransportLeg> = Vec::with_capacity(needed);
    for index in 0..needed {
        let segment = raw_segments
            .get(index)
            .cloned()
            .unwrap_or_else(|| RouteSegment {
                mode: plan.mode_for(index, day_mode),
                duration_minutes: FALLBACK_SEGMENT_MINUTES,
                distance_meters: FALLBACK_SEGMENT_METERS,
            });
        let duration_minutes = if segment.duration_minutes > MAX_SEGMENT_MINUTES {
            warn!(
                target: "tripweaver::enricher",
                "clamping segment {} from {} to {} minutes",
                index,
                segment.duration_minutes,
                MAX_SEGMENT_MINUTES
            );
            MAX_SEGMENT_MINUTES
        } else {
            segment.duration_minutes
        };
        let from = &activities[index];
        let to = &activities[index + 1];
        legs.push(TransportLeg {
            from_id: from.id.clone(),
            to_id: to.id.clone(),
            mode: segment.mode,
            duration_minutes,
            distance_meters: segment.distance_meters,
            summary: format!(
                "{} → {} {} {}분",
                from.name,
                to.name,
                segment.mode.label(),
                duration_minutes
            ),
        });
    }

    // pass 2: final times from dwell plus travel
    let mut minutes = START_OF_DAY_MINUTES;
    for (index, activity) in activities.iter_mut().enumerate() {
        activity.time = clock_text(minutes);
        locations[index].time = activity.time.clone();
        minutes += parse_duration(Some(&activity.duration), DEFAULT_DWELL_MINUTES);
        if let Some(leg) = legs.get(index) {
            minutes += leg.duration_minutes;
        }
    }

    (legs, locations)
}

/// Render minutes-since-midnight as a naive "HH:MM" string
fn clock_text(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::routes::FixedRoutePlanner;

    fn activity(id: &str, name: &str, duration: &str) -> Activity {
        Activity {
            id: id.to_string(),
            name: name.to_string(),
            location: "Paris".to_string(),
            lat: Some(48.85),
            lng: Some(2.35),
            time: "08:00".to_string(),
            duration: duration.to_string(),
            description: String::new(),
            image: "/default-activity.jpg".to_string(),
            open_hours: "알 수 없음".to_string(),
            price: "알 수 없음".to_string(),
            tips: vec![],
            nearby_food: vec![],
            estimated_duration: duration.to_string(),
            best_time: "오전".to_string(),
        }
    }

    #[tokio::test]
    async fn test_leg_count_invariant() {
        let routes = FixedRoutePlanner::new(20, 1500);
        for count in 1..=5usize {
            let mut acts: Vec<Activity> = (0..count)
                .map(|i| activity(&format!("1-{}", i + 1), &format!("Stop {}", i), "1시간"))
                .collect();
            let (legs, locations) = enrich_day(
                &mut acts,
                &DayTransportPlan::default(),
                TransportMode::Drive,
                &routes,
            )
            .await;
            assert_eq!(legs.len(), count - 1);
            assert_eq!(locations.len(), count);
        }
    }

    #[tokio::test]
    async fn test_cumulative_times() {
        let routes = FixedRoutePlanner::new(20, 1500);
        let mut acts = vec![
            activity("1-1", "Breakfast", "1시간"),
            activity("1-2", "Museum", "1시간 30분"),
            activity("1-3", "Lunch", "1시간"),
        ];
        let (legs, _) = enrich_day(
            &mut acts,
            &DayTransportPlan::default(),
            TransportMode::Drive,
            &routes,
        )
        .await;
        assert_eq!(acts[0].time, "08:00");
        // 08:00 + 60 dwell + 20 travel
        assert_eq!(acts[1].time, "09:20");
        // 09:20 + 90 dwell + 20 travel
        assert_eq!(acts[2].time, "11:10");
        assert!(legs.iter().all(|leg| leg.duration_minutes == 20));
    }

    #[tokio::test]
    async fn test_single_activity_day() {
        let routes = FixedRoutePlanner::new(20, 1500);
        let mut acts = vec![activity("1-1", "Only Stop", "2시간")];
        let (legs, locations) = enrich_day(
            &mut acts,
            &DayTransportPlan::default(),
            TransportMode::Walk,
            &routes,
        )
        .await;
        assert!(legs.is_empty());
        assert_eq!(locations.len(), 1);
        assert_eq!(acts[0].time, "08:00");
    }

    #[tokio::test]
    async fn test_segment_override_wins_over_day_mode() {
        let routes = FixedRoutePlanner::new(20, 1500);
        let mut plan = DayTransportPlan::whole_day(TransportMode::Drive);
        plan.segment_modes.insert(1, TransportMode::Walk);
        let mut acts = vec![
            activity("1-1", "A", "1시간"),
            activity("1-2", "B", "1시간"),
            activity("1-3", "C", "1시간"),
        ];
        let (legs, _) = enrich_day(&mut acts, &plan, TransportMode::Transit, &routes).await;
        assert_eq!(legs[0].mode, TransportMode::Drive);
        assert_eq!(legs[1].mode, TransportMode::Walk);
    }

    #[tokio::test]
    async fn test_clamp_and_fallback() {
        #[derive(Debug)]
        struct ShortAndSlow;

        #[async_trait::async_trait]
        impl RoutePlanner for ShortAndSlow {
            async fn segments(
                &self,
                _locations: &[Location],
                mode: TransportMode,
                _overrides: &BTreeMap<usize, TransportMode>,
            ) -> Vec<RouteSegment> {
                // one pathological segment, one missing
                vec![RouteSegment {
                    mode,
                    duration_minutes: 900,
                    distance_meters: 500_000,
                }]
            }
        }

        let mut acts = vec![
            activity("1-1", "A", "1시간"),
            activity("1-2", "B", "1시간"),
            activity("1-3", "C", "1시간"),
        ];
        let (legs, _) = enrich_day(
            &mut acts,
            &DayTransportPlan::default(),
            TransportMode::Drive,
            &ShortAndSlow,
        )
        .await;
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].duration_minutes, MAX_SEGMENT_MINUTES);
        assert_eq!(legs[1].duration_minutes, FALLBACK_SEGMENT_MINUTES);
        assert_eq!(legs[1].distance_meters, FALLBACK_SEGMENT_METERS);
    }
}
