use async_trait::async_trait;

use crate::types::{Activity, PlannerData};

/// Content enrichment collaborator.
///
/// Implementations may overwrite description, tips, price and opening-hours
/// style fields on the given activities, and nothing else; ids, times and
/// coordinates belong to the scheduling engine. Optional; the default
/// implementation leaves activities untouched.
#[async_trait]
pub trait ContentEnricher: Send + Sync + std::fmt::Debug {
    async fn enrich(&self, activities: &mut [Activity], planner: &PlannerData);
}

/// Enricher that leaves every activity as-is
#[derive(Debug, Clone, Default)]
pub struct NoopEnricher;

#[async_trait]
impl ContentEnricher for NoopEnricher {
    async fn enrich(&self, _activities: &mut [Activity], _planner: &PlannerData) {}
}
