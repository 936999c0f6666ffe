//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod seating;

pub use seating::{
    EventGuard, GenerateDistributionCommand, GenerateDistributionHandler,
    GenerateDistributionResult, GetDistributionHandler, GetDistributionQuery, RestaurantRequest,
};
