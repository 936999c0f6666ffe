//! Venue provider port.
//!
//! Resolves restaurants and their table layouts.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, RestaurantId};
use crate::domain::seating::Restaurant;

/// Source of restaurant capacity and layout.
#[async_trait]
pub trait VenueProvider: Send + Sync {
    /// Finds a restaurant by id.
    async fn find_by_id(&self, id: &RestaurantId) -> Result<Option<Restaurant>, DomainError>;

    /// Finds a restaurant by name, ignoring case and surrounding whitespace.
    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>, DomainError>;

    /// Restaurants already associated with an event, in booking order.
    ///
    /// Used when the caller supplies no restaurants.
    async fn list_for_event(&self, event_id: &EventId) -> Result<Vec<Restaurant>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn VenueProvider) {}
    }
}
