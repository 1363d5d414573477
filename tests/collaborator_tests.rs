use std::collections::BTreeMap;

use serde_json::json;
use tripweaver::{GooglePlacesDiscovery, GoogleRoutesPlanner, Location, RoutePlanner, TransportMode};

fn location(name: &str, lat: f64, lng: f64) -> Location {
    Location {
        name: name.to_string(),
        time: "08:00".to_string(),
        lat,
        lng,
    }
}

#[tokio::test]
async fn test_routes_client_parses_compute_routes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/directions/v2:computeRoutes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "routes": [{"duration": "600s", "distanceMeters": 2500}]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let planner = GoogleRoutesPlanner::new("test-key").with_base_url(server.url());
    let locations = vec![
        location("A", 48.85, 2.35),
        location("B", 48.86, 2.36),
        location("C", 48.87, 2.37),
    ];
    let segments = planner
        .segments(&locations, TransportMode::Drive, &BTreeMap::new())
        .await;

    mock.assert_async().await;
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].duration_minutes, 10);
    assert_eq!(segments[0].distance_meters, 2500);
    assert_eq!(segments[0].mode, TransportMode::Drive);
}

#[tokio::test]
async fn test_routes_client_degrades_on_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/directions/v2:computeRoutes")
        .with_status(500)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let planner = GoogleRoutesPlanner::new("test-key").with_base_url(server.url());
    let locations = vec![
        location("A", 48.85, 2.35),
        location("B", 48.86, 2.36),
        location("C", 48.87, 2.37),
    ];
    let segments = planner
        .segments(&locations, TransportMode::Walk, &BTreeMap::new())
        .await;

    // both segments fall back to the constant instead of failing
    assert_eq!(segments.len(), 2);
    assert!(segments
        .iter()
        .all(|s| s.duration_minutes == 30 && s.distance_meters == 2000));
    assert!(segments.iter().all(|s| s.mode == TransportMode::Walk));
}

#[tokio::test]
async fn test_routes_client_applies_segment_overrides() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/directions/v2:computeRoutes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "routes": [{"duration": "120s", "distanceMeters": 400}]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let planner = GoogleRoutesPlanner::new("test-key").with_base_url(server.url());
    let locations = vec![
        location("A", 48.85, 2.35),
        location("B", 48.86, 2.36),
        location("C", 48.87, 2.37),
    ];
    let overrides = BTreeMap::from([(1usize, TransportMode::Walk)]);
    let segments = planner
        .segments(&locations, TransportMode::Drive, &overrides)
        .await;

    assert_eq!(segments[0].mode, TransportMode::Drive);
    assert_eq!(segments[1].mode, TransportMode::Walk);
}

#[tokio::test]
async fn test_places_discovery_normalizes_results() {
    use tripweaver::{DateRange, PlannerData, PoiDiscovery, Travelers};

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/places:searchText")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "places": [{
                    "displayName": {"text": "루브르 박물관"},
                    "formattedAddress": "Rue de Rivoli, Paris",
                    "location": {"latitude": 48.8606, "longitude": 2.3376},
                    "rating": 4.7,
                    "userRatingCount": 250000,
                    "primaryType": "museum"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let discovery = GooglePlacesDiscovery::new("test-key")
        .with_places_url(format!("{}/v1/places:searchText", server.url()));
    let start = chrono::Utc::now().date_naive() + chrono::Duration::days(30);
    let planner = PlannerData {
        country: "France".to_string(),
        cities: vec!["Paris".to_string()],
        date_range: DateRange {
            start,
            end: start + chrono::Duration::days(1),
        },
        travelers: Travelers {
            adults: 2,
            children: 0,
            kind: "couple".to_string(),
        },
        styles: vec!["museum".to_string()],
        transport: TransportMode::Drive,
    };

    let candidates = discovery.discover(&planner).await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "루브르 박물관");
    assert_eq!(candidates[0].source, "google_places");
    assert_eq!(candidates[0].coords(), Some((48.8606, 2.3376)));
}

#[tokio::test]
async fn test_places_discovery_falls_back_to_legacy_search() {
    let mut server = mockito::Server::new_async().await;
    // the new API answers with no places, pushing the client onto the
    // classic text-search endpoint
    server
        .mock("POST", "/v1/places:searchText")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"places": []}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/legacy")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [{
                    "name": "Eiffel Tower",
                    "formatted_address": "Champ de Mars, Paris",
                    "geometry": {"location": {"lat": 48.8584, "lng": 2.2945}},
                    "rating": 4.6,
                    "user_ratings_total": 300000,
                    "types": ["tourist_attraction"]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let discovery = GooglePlacesDiscovery::new("test-key")
        .with_places_url(format!("{}/v1/places:searchText", server.url()))
        .with_legacy_url(format!("{}/legacy", server.url()));

    use tripweaver::PoiDiscovery;
    let results = discovery
        .restaurants_near("에펠탑", 48.8584, 2.2945, 2000)
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Eiffel Tower");
    assert_eq!(results[0].kind, "tourist_attraction");
}
