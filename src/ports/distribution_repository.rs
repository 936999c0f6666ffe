//! Distribution repository port.
//!
//! Stores at most one distribution report per event.
//!
//! # Design
//!
//! - **Whole-report writes**: a report is replaced as a unit, never patched
//! - **Per-event serialisation**: implementations must not interleave two
//!   writers for the same event

use async_trait::async_trait;

use crate::domain::foundation::{DistributionId, DomainError, ErrorCode, EventId, Timestamp};
use crate::domain::seating::DistributionReport;

/// A report as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDistribution {
    pub id: DistributionId,
    pub event_id: EventId,
    pub report: DistributionReport,
    /// SHA-256 of the report JSON at write time.
    pub fingerprint: String,
    pub stored_at: Timestamp,
}

impl StoredDistribution {
    /// Wraps a freshly built report.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the report cannot be serialised
    pub fn new(report: DistributionReport) -> Result<Self, DomainError> {
        let fingerprint = report.fingerprint().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to fingerprint report: {}", e),
            )
        })?;
        Ok(Self {
            id: DistributionId::new(),
            event_id: report.event_id.clone(),
            report,
            fingerprint,
            stored_at: Timestamp::now(),
        })
    }
}

/// Repository port for distribution reports.
#[async_trait]
pub trait DistributionRepository: Send + Sync {
    /// Finds the current report of an event.
    async fn find_by_event(&self, event_id: &EventId)
        -> Result<Option<StoredDistribution>, DomainError>;

    /// Atomically replaces any report of the event.
    ///
    /// Returns the id of the report that was removed, if any.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn replace(
        &self,
        distribution: &StoredDistribution,
    ) -> Result<Option<DistributionId>, DomainError>;

    /// Stores a report only if the event has none.
    ///
    /// # Errors
    ///
    /// - `DistributionExists` if the event already has a report
    /// - `DatabaseError` on persistence failure
    async fn insert_new(&self, distribution: &StoredDistribution) -> Result<(), DomainError>;
}
