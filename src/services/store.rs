use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{PlannerError, Result};
use crate::types::Itinerary;

/// Persistence boundary for itineraries. `get` fails with `NotFound` for an
/// unknown id; `update` refreshes the `updated_at` stamp.
#[async_trait]
pub trait ItineraryStore: Send + Sync + std::fmt::Debug {
    async fn save(&self, itinerary: Itinerary) -> Result<Itinerary>;
    async fn get(&self, id: &str) -> Result<Itinerary>;
    async fn update(&self, itinerary: Itinerary) -> Result<Itinerary>;
}

/// Process-local store used by tests, the CLI and as the default backend
#[derive(Debug, Default)]
pub struct InMemoryItineraryStore {
    entries: RwLock<HashMap<String, Itinerary>>,
}

impl InMemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItineraryStore for InMemoryItineraryStore {
    async fn save(&self, itinerary: Itinerary) -> Result<Itinerary> {
        let mut entries = self.entries.write().await;
        entries.insert(itinerary.id.clone(), itinerary.clone());
        Ok(itinerary)
    }

    async fn get(&self, id: &str) -> Result<Itinerary> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .cloned()
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))
    }

    async fn update(&self, mut itinerary: Itinerary) -> Result<Itinerary> {
        itinerary.updated_at = Utc::now();
        let mut entries = self.entries.write().await;
        entries.insert(itinerary.id.clone(), itinerary.clone());
        Ok(itinerary)
    }
}
