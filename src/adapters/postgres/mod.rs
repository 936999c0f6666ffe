//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDistributionRepository` - Stored distribution reports (JSONB)

mod distribution_repository;

pub use distribution_repository::PostgresDistributionRepository;
