use std::cmp::Ordering;

use tracing::info;

use super::geo;
use crate::types::{PlannerData, PoiCandidate};

/// Score bonus applied when a candidate's name mentions a requested style
const STYLE_MATCH_BONUS: f64 = 1.5;

/// Base score for synthetic fallback candidates
const HEURISTIC_SCORE: f64 = 5.0;

/// Score and truncate discovered candidates to the per-trip budget.
///
/// Candidates whose name substring-matches a requested style (case-insensitive)
/// get a fixed bonus; the list is then stable-sorted by descending score and
/// cut to `max(num_days * 4, 6)`. An empty input list is replaced with the
/// deterministic heuristic fallback before ranking.
pub fn rank_candidates(candidates: Vec<PoiCandidate>, planner: &PlannerData) -> Vec<PoiCandidate> {
    let mut candidates = if candidates.is_empty() {
        info!(
            target: "tripweaver::ranker",
            "no discovered candidates, using heuristic fallback"
        );
        heuristic_candidates(planner)
    } else {
        candidates
    };

    let styles: Vec<String> = planner.styles.iter().map(|s| s.to_lowercase()).collect();
    for candidate in &mut candidates {
        let name = candidate.name.to_lowercase();
        if styles.iter().any(|style| name.contains(style.as_str())) {
            candidate.style_score += STYLE_MATCH_BONUS;
        }
    }

    // stable sort keeps input order among equal scores
    candidates.sort_by(|a, b| {
        b.style_score
            .partial_cmp(&a.style_score)
            .unwrap_or(Ordering::Equal)
    });

    let budget = (planner.date_range.num_days() as usize * 4).max(6);
    candidates.truncate(budget);
    candidates
}

/// Deterministic offline fallback: one synthetic candidate per city × style
/// pair, pinned to the city's resolved coordinates.
pub fn heuristic_candidates(planner: &PlannerData) -> Vec<PoiCandidate> {
    let cities: Vec<&str> = if planner.cities.is_empty() {
        vec![planner.country.as_str()]
    } else {
        planner.cities.iter().map(String::as_str).collect()
    };
    let styles: Vec<&str> = if planner.styles.is_empty() {
        vec!["sightseeing"]
    } else {
        planner.styles.iter().map(String::as_str).collect()
    };

    let mut candidates = Vec::with_capacity(cities.len() * styles.len());
    for city in &cities {
        let (lat, lng) = geo::coords_for(city);
        for style in &styles {
            candidates.push(PoiCandidate {
                name: format!("{} {} 명소", city, style),
                city: city.to_string(),
                kind: style.to_string(),
                style_score: HEURISTIC_SCORE,
                lat: Some(lat),
                lng: Some(lng),
                highlight: Some(format!("{}의 {} 추천 코스입니다.", city, style)),
                rating: None,
                user_ratings_total: 0,
                address: None,
                image: None,
                source: "heuristic".to_string(),
            });
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateRange, TransportMode, Travelers};
    use chrono::NaiveDate;

    fn planner(days: u32, styles: &[&str]) -> PlannerData {
        let start = NaiveDate::from_ymd_opt(2027, 4, 1).unwrap();
        PlannerData {
            country: "France".to_string(),
            cities: vec!["Paris".to_string(), "Nice".to_string()],
            date_range: DateRange {
                start,
                end: start + chrono::Duration::days(days as i64 - 1),
            },
            travelers: Travelers {
                adults: 2,
                children: 0,
                kind: "couple".to_string(),
            },
            styles: styles.iter().map(|s| s.to_string()).collect(),
            transport: TransportMode::Drive,
        }
    }

    fn candidate(name: &str, score: f64) -> PoiCandidate {
        PoiCandidate {
            name: name.to_string(),
            city: "Paris".to_string(),
            kind: "attraction".to_string(),
            style_score: score,
            lat: None,
            lng: None,
            highlight: None,
            rating: None,
            user_ratings_total: 0,
            address: None,
            image: None,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_style_match_bonus_reorders() {
        let ranked = rank_candidates(
            vec![candidate("Louvre", 7.0), candidate("Museum of Food", 6.0)],
            &planner(2, &["food"]),
        );
        assert_eq!(ranked[0].name, "Museum of Food");
        assert_eq!(ranked[0].style_score, 7.5);
    }

    #[test]
    fn test_budget_truncation() {
        let many: Vec<PoiCandidate> = (0..40)
            .map(|i| candidate(&format!("Spot {}", i), 5.0))
            .collect();
        let ranked = rank_candidates(many, &planner(3, &["museum"]));
        assert_eq!(ranked.len(), 12); // 3 days * 4
    }

    #[test]
    fn test_budget_floor_of_six() {
        let many: Vec<PoiCandidate> = (0..10)
            .map(|i| candidate(&format!("Spot {}", i), 5.0))
            .collect();
        let ranked = rank_candidates(many, &planner(1, &["museum"]));
        assert_eq!(ranked.len(), 6);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank_candidates(
            vec![
                candidate("First", 5.0),
                candidate("Second", 5.0),
                candidate("Third", 5.0),
            ],
            &planner(2, &["museum"]),
        );
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_empty_input_uses_heuristic_fallback() {
        let ranked = rank_candidates(Vec::new(), &planner(2, &["food", "museum"]));
        // 2 cities x 2 styles
        assert_eq!(ranked.len(), 4);
        assert!(ranked.iter().all(|c| c.source == "heuristic"));
        assert!(ranked.iter().all(|c| c.coords().is_some()));
    }
}
