use chrono::NaiveDate;

use super::duration::duration_text;
use super::geo;
use crate::types::{Activity, PlannerData, PoiCandidate};

/// Candidates consumed per day before cycling back to the first slice
const CANDIDATES_PER_DAY: usize = 4;

const MORNING_POI_MINUTES: u32 = 90;
const AFTERNOON_POI_MINUTES: u32 = 120;
const BREAKFAST_MINUTES: u32 = 60;
const LUNCH_MINUTES: u32 = 90;
const DINNER_MINUTES: u32 = 90;
const EVENING_WALK_MINUTES: u32 = 60;

/// Activity count below which the evening-walk filler is inserted
const FILLER_THRESHOLD: usize = 7;

/// Clock times are placeholders until the route enricher assigns real ones
const PLACEHOLDER_TIME: &str = "08:00";

/// One day's unenriched activity list plus its overview framing
#[derive(Debug, Clone)]
pub struct DaySkeleton {
    pub day: u32,
    pub date: NaiveDate,
    pub city: String,
    pub title: String,
    pub activities: Vec<Activity>,
}

/// Build skeletons for every day of the trip
pub fn build_days(planner: &PlannerData, ranked: &[PoiCandidate]) -> Vec<DaySkeleton> {
    (1..=planner.date_range.num_days())
        .map(|day| build_day(planner, ranked, day))
        .collect()
}

/// Assemble one day: meal anchors in fixed order with ranked POIs slotted
/// into the morning and afternoon blocks, plus an evening-walk filler when
/// the day would otherwise be short.
pub fn build_day(planner: &PlannerData, ranked: &[PoiCandidate], day: u32) -> DaySkeleton {
    let city = city_of_day(planner, day);
    let picks = day_slice(ranked, day);
    let mut activities: Vec<Activity> = Vec::with_capacity(8);

    activities.push(meal_activity(&city, "아침 식사", BREAKFAST_MINUTES, "오전"));
    for candidate in picks.iter().take(2) {
        activities.push(poi_activity(candidate, MORNING_POI_MINUTES, "오전"));
    }
    activities.push(meal_activity(&city, "점심 식사", LUNCH_MINUTES, "오후"));
    for candidate in picks.iter().skip(2).take(2) {
        activities.push(poi_activity(candidate, AFTERNOON_POI_MINUTES, "오후"));
    }
    if activities.len() < FILLER_THRESHOLD {
        activities.push(filler_activity(&city));
    }
    activities.push(meal_activity(&city, "저녁 식사", DINNER_MINUTES, "저녁"));

    for (index, activity) in activities.iter_mut().enumerate() {
        activity.id = format!("{}-{}", day, index + 1);
    }

    DaySkeleton {
        day,
        date: planner.date_range.date_of_day(day),
        title: format!("{} 탐험 Day {}", city, day),
        city,
        activities,
    }
}

/// City assigned to a 1-based day: cities in order, last city padding the tail
pub fn city_of_day(planner: &PlannerData, day: u32) -> String {
    if planner.cities.is_empty() {
        return planner.country.clone();
    }
    let index = (day as usize - 1).min(planner.cities.len() - 1);
    planner.cities[index].clone()
}

/// The day's slice of up to 4 ranked candidates, wrapping to the first slice
/// once the list is exhausted
fn day_slice(ranked: &[PoiCandidate], day: u32) -> &[PoiCandidate] {
    if ranked.is_empty() {
        return &[];
    }
    let chunk_count = ranked.len().div_ceil(CANDIDATES_PER_DAY);
    let chunk = (day as usize - 1) % chunk_count;
    let start = chunk * CANDIDATES_PER_DAY;
    let end = (start + CANDIDATES_PER_DAY).min(ranked.len());
    &ranked[start..end]
}

fn poi_activity(candidate: &PoiCandidate, minutes: u32, best_time: &str) -> Activity {
    let (lat, lng) = candidate
        .coords()
        .unwrap_or_else(|| geo::coords_for(&candidate.name));
    let text = duration_text(minutes);
    Activity {
        id: String::new(),
        name: candidate.name.clone(),
        location: candidate
            .address
            .clone()
            .unwrap_or_else(|| candidate.city.clone()),
        lat: Some(lat),
        lng: Some(lng),
        time: PLACEHOLDER_TIME.to_string(),
        duration: text.clone(),
        description: candidate.highlight.clone().unwrap_or_else(|| {
            format!("{}에서 즐기는 {} 일정입니다.", candidate.city, candidate.kind)
        }),
        image: candidate
            .image
            .clone()
            .unwrap_or_else(|| "/default-activity.jpg".to_string()),
        open_hours: "알 수 없음".to_string(),
        price: "알 수 없음".to_string(),
        tips: vec![format!("{}에서 여유롭게 시간을 보내세요.", candidate.city)],
        nearby_food: vec![],
        estimated_duration: text,
        best_time: best_time.to_string(),
    }
}

fn meal_activity(city: &str, label: &str, minutes: u32, best_time: &str) -> Activity {
    let (lat, lng) = geo::coords_for(city);
    let text = duration_text(minutes);
    Activity {
        id: String::new(),
        name: format!("{} {}", city, label),
        location: city.to_string(),
        lat: Some(lat),
        lng: Some(lng),
        time: PLACEHOLDER_TIME.to_string(),
        duration: text.clone(),
        description: format!("{} 로컬 음식을 즐겨 보세요.", city),
        image: "/default-activity.jpg".to_string(),
        open_hours: "알 수 없음".to_string(),
        price: "알 수 없음".to_string(),
        tips: vec![],
        nearby_food: vec![format!("{} 로컬 음식", city)],
        estimated_duration: text,
        best_time: best_time.to_string(),
    }
}

fn filler_activity(city: &str) -> Activity {
    let (lat, lng) = geo::coords_for(city);
    let text = duration_text(EVENING_WALK_MINUTES);
    Activity {
        id: String::new(),
        name: format!("{} 저녁 산책", city),
        location: city.to_string(),
        lat: Some(lat),
        lng: Some(lng),
        time: PLACEHOLDER_TIME.to_string(),
        duration: text.clone(),
        description: format!("{} 시내를 걸으며 하루를 마무리하세요.", city),
        image: "/default-activity.jpg".to_string(),
        open_hours: "항상".to_string(),
        price: "무료".to_string(),
        tips: vec![],
        nearby_food: vec![],
        estimated_duration: text,
        best_time: "저녁".to_string(),
    }
}
