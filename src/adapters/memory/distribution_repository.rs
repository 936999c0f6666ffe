//! In-memory distribution repository.
//!
//! One report per event. Every write happens under a single write lock, so
//! replace and insert are atomic with respect to each other.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DistributionId, DomainError, ErrorCode, EventId};
use crate::ports::{DistributionRepository, StoredDistribution};

/// In-memory storage for distribution reports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDistributionRepository {
    reports: Arc<RwLock<HashMap<EventId, StoredDistribution>>>,
}

impl InMemoryDistributionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reports.read().await.is_empty()
    }
}

#[async_trait]
impl DistributionRepository for InMemoryDistributionRepository {
    async fn find_by_event(
        &self,
        event_id: &EventId,
    ) -> Result<Option<StoredDistribution>, DomainError> {
        Ok(self.reports.read().await.get(event_id).cloned())
    }

    async fn replace(
        &self,
        distribution: &StoredDistribution,
    ) -> Result<Option<DistributionId>, DomainError> {
        let previous = self
            .reports
            .write()
            .await
            .insert(distribution.event_id.clone(), distribution.clone());
        Ok(previous.map(|p| p.id))
    }

    async fn insert_new(&self, distribution: &StoredDistribution) -> Result<(), DomainError> {
        let mut reports = self.reports.write().await;
        if let Some(existing) = reports.get(&distribution.event_id) {
            return Err(DomainError::new(
                ErrorCode::DistributionExists,
                format!(
                    "Event {} already has a distribution",
                    distribution.event_id
                ),
            )
            .with_detail("distribution_id", existing.id.to_string()));
        }
        reports.insert(distribution.event_id.clone(), distribution.clone());
        Ok(())
    }
}
