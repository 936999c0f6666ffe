//! GetDistributionHandler - Query handler for a stored seating plan.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, EventId};
use crate::ports::{DistributionRepository, StoredDistribution};

/// Query for the current distribution of an event.
#[derive(Debug, Clone)]
pub struct GetDistributionQuery {
    pub event_id: EventId,
}

/// Handler for reading stored distributions.
pub struct GetDistributionHandler {
    repository: Arc<dyn DistributionRepository>,
}

impl GetDistributionHandler {
    pub fn new(repository: Arc<dyn DistributionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDistributionQuery) -> Result<StoredDistribution, DomainError> {
        self.repository
            .find_by_event(&query.event_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DistributionNotFound,
                    format!("No distribution stored for event {}", query.event_id),
                )
            })
    }
}
