use std::collections::HashMap;

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

static KNOWN_CITIES: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("파리", (48.8566, 2.3522)),
        ("paris", (48.8566, 2.3522)),
        ("니스", (43.7102, 7.2620)),
        ("nice", (43.7102, 7.2620)),
        ("런던", (51.5074, -0.1278)),
        ("london", (51.5074, -0.1278)),
        ("도쿄", (35.6764, 139.6500)),
        ("tokyo", (35.6764, 139.6500)),
        ("서울", (37.5665, 126.9780)),
        ("seoul", (37.5665, 126.9780)),
    ])
});

/// Resolve a location name to coordinates without network access.
///
/// Known city names hit a static table; anything else gets a deterministic
/// pseudo-coordinate derived from a SHA-256 of the name, so the same name
/// always resolves to the same point across runs.
pub fn coords_for(name: &str) -> (f64, f64) {
    let key = name.trim().to_lowercase();
    if let Some(&coords) = KNOWN_CITIES.get(key.as_str()) {
        return coords;
    }

    let digest = Sha256::digest(name.as_bytes());
    let lat = 10.0 + (digest[0] as f64 / 255.0) * 70.0;
    let lng = -130.0 + (digest[1] as f64 / 255.0) * 260.0;
    (round4(lat), round4(lng))
}

/// Great-circle (haversine) distance in meters
pub fn distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
