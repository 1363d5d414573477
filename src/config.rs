use std::env;
use std::time::Duration;

/// Runtime configuration resolved from the environment.
///
/// API keys are optional; when one is missing the corresponding collaborator
/// is replaced with its offline fallback rather than failing.
#[derive(Debug, Clone)]
pub struct Settings {
    pub google_places_api_key: Option<String>,
    pub google_routes_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        let timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(10);
        Self {
            google_places_api_key: non_empty_var("GOOGLE_PLACES_API_KEY"),
            google_routes_api_key: non_empty_var("GOOGLE_ROUTES_API_KEY"),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            google_places_api_key: None,
            google_routes_api_key: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
