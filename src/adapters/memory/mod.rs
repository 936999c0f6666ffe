//! In-memory adapters for the collaborator ports.
//!
//! Backed by `tokio::sync::RwLock` maps. Used by tests and by the binary.

mod distribution_repository;
mod roster_provider;
mod venue_provider;

pub use distribution_repository::InMemoryDistributionRepository;
pub use roster_provider::InMemoryRosterProvider;
pub use venue_provider::InMemoryVenueProvider;
