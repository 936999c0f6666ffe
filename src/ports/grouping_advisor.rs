//! Grouping advisor port.
//!
//! An advisor proposes a grouping for a roster. Proposals are advisory: the
//! caller validates them and keeps the heuristic grouping on any failure.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::ai_provider::AIError;
use crate::domain::foundation::EventId;
use crate::domain::seating::{GroupingProposal, ProfileDigest};

/// What an advisor is asked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingRequest {
    pub event_id: EventId,
    pub group_size: u32,
    pub allow_relaxation: bool,
    /// Largest group the proposal may contain; larger groups are rejected.
    pub max_group_size: u32,
    pub guests: Vec<ProfileDigest>,
}

/// Advisor failures. None of these reach the caller of a seating run.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Provider(#[from] AIError),

    #[error("unusable advisor answer: {0}")]
    Parse(String),
}

/// Port for grouping advice.
#[async_trait]
pub trait GroupingAdvisor: Send + Sync {
    /// Proposes a grouping of every guest in `request`.
    async fn propose(&self, request: &GroupingRequest) -> Result<GroupingProposal, AdvisorError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
