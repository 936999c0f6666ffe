//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the seating domain to external systems:
//! - `ai` - Text-generation providers and the LLM grouping advisor
//! - `memory` - In-memory roster, venue and distribution stores
//! - `postgres` - PostgreSQL distribution repository

pub mod ai;
pub mod memory;
pub mod postgres;

pub use ai::{LlmGroupingAdvisor, MockAIProvider};
pub use memory::{InMemoryDistributionRepository, InMemoryRosterProvider, InMemoryVenueProvider};
pub use postgres::PostgresDistributionRepository;
