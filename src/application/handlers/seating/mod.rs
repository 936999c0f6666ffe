//! Seating command and query handlers.

mod event_guard;
mod generate_distribution;
mod get_distribution;

pub use event_guard::EventGuard;
pub use generate_distribution::{
    GenerateDistributionCommand, GenerateDistributionHandler, GenerateDistributionResult,
    RestaurantRequest,
};
pub use get_distribution::{GetDistributionHandler, GetDistributionQuery};
