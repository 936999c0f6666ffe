//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, value objects and error types that form the
//! vocabulary of the seating domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DistributionId, EventId, GuestId, RestaurantId};
pub use timestamp::Timestamp;
