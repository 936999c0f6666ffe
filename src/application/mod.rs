//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates the seating engine and coordinates between ports.
//! Command handlers write distributions, query handlers read them back.

pub mod handlers;

pub use handlers::{
    EventGuard, GenerateDistributionCommand, GenerateDistributionHandler,
    GenerateDistributionResult, GetDistributionHandler, GetDistributionQuery, RestaurantRequest,
};
