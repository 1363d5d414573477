use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::enricher::{enrich_day, DayTransportPlan};
use super::matching::{find_activity, find_adjacent_pair};
use super::ranker::rank_candidates;
use super::skeleton::{build_days, DaySkeleton};
use crate::collaborators::{PoiDiscovery, RoutePlanner};
use crate::types::{
    Activity, ChangeInstruction, DayItinerary, Itinerary, Location, TransportLeg, TransportMode,
};

/// Matches anchor phrases like "루브르 방문 후" in free-text details
static AFTER_ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?)\s*방문 후").expect("anchor pattern"));

/// Collaborator handles needed while applying a change set: discovery for
/// day regeneration, routes for re-enriching touched days.
#[derive(Debug, Clone)]
pub struct MutationContext {
    pub discovery: Arc<dyn PoiDiscovery>,
    pub routes: Arc<dyn RoutePlanner>,
}

/// Apply an ordered batch of edit instructions to an itinerary.
///
/// Instructions run sequentially, accumulating per-day dirty flags and
/// transport overrides. Afterwards every touched day is re-indexed,
/// re-enriched (days fan out concurrently, they share no state during
/// enrichment) and its overview record rewritten from the authoritative
/// activity list. Days the batch never touched are left byte-identical.
/// Returns one advisory summary string per instruction.
pub async fn apply_change_set(
    itinerary: &mut Itinerary,
    changes: &[ChangeInstruction],
    ctx: &MutationContext,
) -> Vec<String> {
    let mut touched: BTreeSet<u32> = BTreeSet::new();
    let mut regenerated: BTreeSet<u32> = BTreeSet::new();
    let mut plans: BTreeMap<u32, DayTransportPlan> = BTreeMap::new();
    let mut summaries: Vec<String> = Vec::with_capacity(changes.len());

    for change in changes {
        let day = change.day().max(1);
        let key = day.to_string();

        match change {
            ChangeInstruction::Add {
                location,
                details,
                after_activity_name,
                lat,
                lng,
                ..
            } => {
                let activities = itinerary.activities_by_day.entry(key).or_default();
                let index = insertion_index(
                    activities,
                    after_activity_name.as_deref(),
                    details.as_deref(),
                );
                let activity = new_activity(location, details.as_deref(), *lat, *lng);
                let name = activity.name.clone();
                activities.insert(index, activity);
                touched.insert(day);
                summaries.push(format!("Day {}: {} 추가", day, name));
            }
            ChangeInstruction::Remove { location, .. } => {
                // a miss is a deliberate no-op, the day stays untouched
                match itinerary
                    .activities_by_day
                    .get_mut(&key)
                    .and_then(|activities| {
                        find_activity(activities, location).map(|i| activities.remove(i))
                    }) {
                    Some(removed) => {
                        touched.insert(day);
                        summaries.push(format!("Day {}: {} 제거", day, removed.name));
                    }
                    None => {
                        info!(
                            target: "tripweaver::mutation",
                            "remove on day {} matched nothing for '{}'", day, location
                        );
                        summaries.push(format!(
                            "Day {}: '{}'에 해당하는 일정을 찾지 못했습니다",
                            day, location
                        ));
                    }
                }
            }
            ChangeInstruction::Modify {
                location, details, ..
            } => {
                let activities = itinerary.activities_by_day.entry(key).or_default();
                match find_activity(activities, location) {
                    Some(index) => {
                        if let Some(details) = details {
                            activities[index].description = details.clone();
                        }
                        touched.insert(day);
                        summaries.push(format!("Day {}: {} 수정", day, activities[index].name));
                    }
                    None => {
                        // never silently drop a requested change
                        let activity = new_activity(location, details.as_deref(), None, None);
                        let name = activity.name.clone();
                        activities.push(activity);
                        touched.insert(day);
                        summaries.push(format!("Day {}: {} 추가", day, name));
                    }
                }
            }
            ChangeInstruction::Replace {
                location,
                target_location,
                from_location,
                details,
                lat,
                lng,
                ..
            } => {
                let activities = itinerary.activities_by_day.entry(key).or_default();
                let needle = target_location
                    .as_deref()
                    .or(from_location.as_deref())
                    .unwrap_or(location.as_str());
                match find_activity(activities, needle) {
                    Some(index) => {
                        let activity = &mut activities[index];
                        activity.name = location.clone();
                        activity.location = location.clone();
                        if let Some(details) = details {
                            activity.description = details.clone();
                        }
                        // explicit coordinates win; otherwise the enricher
                        // re-resolves from the new location label
                        match (lat, lng) {
                            (Some(lat), Some(lng)) => {
                                activity.lat = Some(*lat);
                                activity.lng = Some(*lng);
                            }
                            _ => {
                                activity.lat = None;
                                activity.lng = None;
                            }
                        }
                        touched.insert(day);
                        summaries.push(format!("Day {}: {} 교체", day, location));
                    }
                    None => {
                        let activity = new_activity(location, details.as_deref(), *lat, *lng);
                        let name = activity.name.clone();
                        activities.push(activity);
                        touched.insert(day);
                        summaries.push(format!("Day {}: {} 추가", day, name));
                    }
                }
            }
            ChangeInstruction::Transport {
                mode,
                details,
                from_location,
                to_location,
                ..
            } => {
                let activities = itinerary.activities_by_day.entry(key).or_default();
                let resolved = resolve_mode(*mode, details.as_deref());
                let segment = match (from_location.as_deref(), to_location.as_deref()) {
                    (Some(from), Some(to)) => find_adjacent_pair(activities, from, to)
                        .map(|index| (index, from.to_string(), to.to_string())),
                    _ => None,
                };
                let plan = plans.entry(day).or_default();
                match segment {
                    Some((index, from, to)) => {
                        plan.segment_modes.insert(index, resolved);
                        summaries.push(format!(
                            "Day {}: {} → {} 구간을 {}(으)로 변경",
                            day,
                            from,
                            to,
                            resolved.label()
                        ));
                    }
                    None => {
                        plan.day_mode = Some(resolved);
                        summaries.push(format!(
                            "Day {}: 이동 수단을 {}(으)로 변경",
                            day,
                            resolved.label()
                        ));
                    }
                }
                touched.insert(day);
            }
            ChangeInstruction::Regenerate { .. } => {
                let candidates = ctx.discovery.discover(&itinerary.planner_data).await;
                let ranked = rank_candidates(candidates, &itinerary.planner_data);
                let skeletons = build_days(&itinerary.planner_data, &ranked);
                match skeletons.into_iter().find(|skeleton| skeleton.day == day) {
                    Some(skeleton) => {
                        splice_regenerated_day(itinerary, skeleton);
                        touched.insert(day);
                        regenerated.insert(day);
                        summaries.push(format!("Day {}: 일정을 다시 생성했습니다", day));
                    }
                    None => {
                        warn!(
                            target: "tripweaver::mutation",
                            "regenerate targeted day {} outside the trip range", day
                        );
                        summaries.push(format!("Day {}: 여행 기간을 벗어난 날짜입니다", day));
                    }
                }
            }
        }
    }

    // regenerated days keep the ids the skeleton builder just assigned
    for &day in &touched {
        if regenerated.contains(&day) {
            continue;
        }
        if let Some(activities) = itinerary.activities_by_day.get_mut(&day.to_string()) {
            reindex(activities, day);
        }
    }

    let enriched = enrich_touched_days(itinerary, &touched, &plans, ctx).await;
    sync_overview(itinerary, &touched, &enriched);

    summaries
}

/// Re-enrich every touched day. Days are independent during enrichment, so
/// they fan out as concurrent tasks and rejoin before the sync pass.
async fn enrich_touched_days(
    itinerary: &mut Itinerary,
    touched: &BTreeSet<u32>,
    plans: &BTreeMap<u32, DayTransportPlan>,
    ctx: &MutationContext,
) -> BTreeMap<u32, (Vec<TransportLeg>, Vec<Location>)> {
    let default_mode = itinerary.planner_data.transport;
    let mut join: JoinSet<(u32, Vec<Activity>, Vec<TransportLeg>, Vec<Location>)> = JoinSet::new();

    for &day in touched {
        let Some(mut activities) = itinerary.activities_by_day.remove(&day.to_string()) else {
            continue;
        };
        let plan = plans.get(&day).cloned().unwrap_or_default();
        let routes = Arc::clone(&ctx.routes);
        join.spawn(async move {
            let (legs, locations) =
                enrich_day(&mut activities, &plan, default_mode, routes.as_ref()).await;
            (day, activities, legs, locations)
        });
    }

    let mut enriched = BTreeMap::new();
    while let Some(result) = join.join_next().await {
        match result {
            Ok((day, activities, legs, locations)) => {
                itinerary
                    .activities_by_day
                    .insert(day.to_string(), activities);
                enriched.insert(day, (legs, locations));
            }
            Err(err) => {
                warn!(target: "tripweaver::mutation", "day enrichment task failed: {}", err);
            }
        }
    }
    enriched
}

/// Rewrite each touched day's overview record from its activity list and
/// converge the overview/day-key sets. Untouched records are not written.
fn sync_overview(
    itinerary: &mut Itinerary,
    touched: &BTreeSet<u32>,
    enriched: &BTreeMap<u32, (Vec<TransportLeg>, Vec<Location>)>,
) {
    for &day in touched {
        let names: Vec<String> = itinerary
            .day_activities(day)
            .iter()
            .map(|activity| activity.name.clone())
            .collect();
        let (legs, locations) = enriched.get(&day).cloned().unwrap_or_default();

        if let Some(position) = itinerary.overview.iter().position(|item| item.day == day) {
            let record = &mut itinerary.overview[position];
            record.activities = names;
            record.locations = locations;
            record.transports = legs;
        } else {
            let date = itinerary.planner_data.date_range.date_of_day(day);
            itinerary.overview.push(DayItinerary {
                day,
                date,
                title: format!("Day {} 일정", day),
                photo: "/city-arrival.jpg".to_string(),
                activities: names,
                locations,
                transports: legs,
            });
        }
    }

    let overview_days: Vec<u32> = itinerary.overview.iter().map(|item| item.day).collect();
    for day in overview_days {
        itinerary
            .activities_by_day
            .entry(day.to_string())
            .or_default();
    }
    itinerary.overview.sort_by_key(|item| item.day);
}

/// Replace the targeted day's activities and overview framing with a freshly
/// generated skeleton; enrichment and sync run in the shared post pass.
fn splice_regenerated_day(itinerary: &mut Itinerary, skeleton: DaySkeleton) {
    let DaySkeleton {
        day,
        date,
        title,
        activities,
        ..
    } = skeleton;

    if let Some(position) = itinerary.overview.iter().position(|item| item.day == day) {
        let record = &mut itinerary.overview[position];
        record.title = title;
        record.date = date;
    } else {
        itinerary.overview.push(DayItinerary {
            day,
            date,
            title,
            photo: "/city-arrival.jpg".to_string(),
            activities: Vec::new(),
            locations: Vec::new(),
            transports: Vec::new(),
        });
    }
    itinerary.activities_by_day.insert(day.to_string(), activities);
}

/// Insertion point for a new activity: explicit anchor hint, then the
/// "<X> 방문 후" phrase in the details, then the end of the day
fn insertion_index(
    activities: &[Activity],
    after_activity: Option<&str>,
    details: Option<&str>,
) -> usize {
    if let Some(anchor) = after_activity {
        if let Some(index) = find_activity(activities, anchor) {
            return index + 1;
        }
    }
    if let Some(details) = details {
        if let Some(caps) = AFTER_ANCHOR_RE.captures(details) {
            if let Some(index) = find_activity(activities, caps[1].trim()) {
                return index + 1;
            }
        }
    }
    activities.len()
}

fn new_activity(
    location: &str,
    details: Option<&str>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Activity {
    let name = if location.trim().is_empty() {
        "새로운 장소".to_string()
    } else {
        location.to_string()
    };
    Activity {
        id: String::new(),
        name: name.clone(),
        location: name,
        lat,
        lng,
        time: "18:00".to_string(),
        duration: "2시간".to_string(),
        description: details.unwrap_or("추가된 활동입니다.").to_string(),
        image: "/default-activity.jpg".to_string(),
        open_hours: "알 수 없음".to_string(),
        price: "알 수 없음".to_string(),
        tips: vec![],
        nearby_food: vec![],
        estimated_duration: "2시간".to_string(),
        best_time: "오후".to_string(),
    }
}

/// Resolve a transport mode from an explicit field or free-text hints
fn resolve_mode(explicit: Option<TransportMode>, details: Option<&str>) -> TransportMode {
    if let Some(mode) = explicit {
        return mode;
    }
    let Some(text) = details else {
        return TransportMode::Drive;
    };
    let lowered = text.to_lowercase();
    let has_any = |tokens: &[&str]| tokens.iter().any(|token| lowered.contains(token));

    if has_any(&["도보", "걸어", "walk"]) {
        TransportMode::Walk
    } else if has_any(&["자전거", "bike", "bicycle", "cycling"]) {
        TransportMode::Bike
    } else if has_any(&["지하철", "버스", "대중교통", "전철", "기차", "transit", "subway", "bus", "train"]) {
        TransportMode::Transit
    } else {
        TransportMode::Drive
    }
}

fn reindex(activities: &mut [Activity], day: u32) {
    for (index, activity) in activities.iter_mut().enumerate() {
        activity.id = format!("{}-{}", day, index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, name: &str) -> Activity {
        let mut act = new_activity(name, None, None, None);
        act.id = id.to_string();
        act
    }

    #[test]
    fn test_insertion_after_explicit_anchor() {
        let acts = vec![activity("1-1", "루브르 박물관"), activity("1-2", "에펠탑")];
        assert_eq!(insertion_index(&acts, Some("루브르"), None), 1);
        assert_eq!(insertion_index(&acts, Some("없는 곳"), None), 2);
    }

    #[test]
    fn test_insertion_from_detail_phrase() {
        let acts = vec![activity("1-1", "루브르 박물관"), activity("1-2", "에펠탑")];
        let details = Some("루브르 방문 후 근처 카페에 들르고 싶어요");
        assert_eq!(insertion_index(&acts, None, details), 1);
        assert_eq!(insertion_index(&acts, None, Some("그냥 추가해줘")), 2);
    }

    #[test]
    fn test_resolve_mode_tokens() {
        assert_eq!(resolve_mode(None, Some("도보로 갈래요")), TransportMode::Walk);
        assert_eq!(resolve_mode(None, Some("we'd rather walk")), TransportMode::Walk);
        assert_eq!(resolve_mode(None, Some("자전거 타고")), TransportMode::Bike);
        assert_eq!(resolve_mode(None, Some("지하철로 이동")), TransportMode::Transit);
        assert_eq!(resolve_mode(None, Some("아무거나")), TransportMode::Drive);
        assert_eq!(resolve_mode(None, None), TransportMode::Drive);
        assert_eq!(
            resolve_mode(Some(TransportMode::Bike), Some("도보")),
            TransportMode::Bike
        );
    }

    #[test]
    fn test_reindex_reassigns_slots() {
        let mut acts = vec![activity("3-9", "A"), activity("", "B")];
        reindex(&mut acts, 2);
        assert_eq!(acts[0].id, "2-1");
        assert_eq!(acts[1].id, "2-2");
    }
}
