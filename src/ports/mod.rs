//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the seating domain and its collaborators. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `RosterProvider` - Guest records per event
//! - `VenueProvider` - Restaurant capacity and table layouts
//! - `DistributionRepository` - Stored distribution reports
//!
//! ## AI Ports
//!
//! - `AIProvider` - Raw text completions
//! - `GroupingAdvisor` - Grouping proposals built on top of a provider

mod ai_provider;
mod distribution_repository;
mod grouping_advisor;
mod roster_provider;
mod venue_provider;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use distribution_repository::{DistributionRepository, StoredDistribution};
pub use grouping_advisor::{AdvisorError, GroupingAdvisor, GroupingRequest};
pub use roster_provider::RosterProvider;
pub use venue_provider::VenueProvider;
