//! In-memory venue provider.
//!
//! Knows a fixed catalogue of restaurants plus, optionally, which of them are
//! booked for each event.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventId, RestaurantId};
use crate::domain::seating::Restaurant;
use crate::ports::VenueProvider;

#[derive(Debug, Default)]
struct Catalogue {
    restaurants: Vec<Restaurant>,
    bookings: HashMap<EventId, Vec<RestaurantId>>,
}

/// In-memory restaurant catalogue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVenueProvider {
    catalogue: Arc<RwLock<Catalogue>>,
}

impl InMemoryVenueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider knowing `restaurants`.
    pub fn with_restaurants(restaurants: Vec<Restaurant>) -> Self {
        Self {
            catalogue: Arc::new(RwLock::new(Catalogue {
                restaurants,
                bookings: HashMap::new(),
            })),
        }
    }

    /// Adds a restaurant, replacing one with the same id.
    pub async fn add(&self, restaurant: Restaurant) {
        let mut catalogue = self.catalogue.write().await;
        catalogue.restaurants.retain(|r| r.id != restaurant.id);
        catalogue.restaurants.push(restaurant);
    }

    /// Books restaurants for an event, in the given order.
    pub async fn book(&self, event_id: EventId, restaurants: Vec<RestaurantId>) {
        self.catalogue
            .write()
            .await
            .bookings
            .insert(event_id, restaurants);
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[async_trait]
impl VenueProvider for InMemoryVenueProvider {
    async fn find_by_id(&self, id: &RestaurantId) -> Result<Option<Restaurant>, DomainError> {
        let catalogue = self.catalogue.read().await;
        Ok(catalogue.restaurants.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>, DomainError> {
        let catalogue = self.catalogue.read().await;
        Ok(catalogue
            .restaurants
            .iter()
            .find(|r| same_name(&r.name, name))
            .cloned())
    }

    async fn list_for_event(&self, event_id: &EventId) -> Result<Vec<Restaurant>, DomainError> {
        let catalogue = self.catalogue.read().await;
        let Some(booked) = catalogue.bookings.get(event_id) else {
            return Ok(Vec::new());
        };
        Ok(booked
            .iter()
            .filter_map(|id| catalogue.restaurants.iter().find(|r| &r.id == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(id: &str, name: &str) -> Restaurant {
        Restaurant::new(RestaurantId::new(id).unwrap(), name, 12)
            .unwrap()
            .with_table(1, 6)
            .with_table(2, 6)
    }

    #[tokio::test]
    async fn finds_by_name_ignoring_case_and_whitespace() {
        let provider = InMemoryVenueProvider::with_restaurants(vec![restaurant("r1", "Le Bistro")]);

        let found = provider.find_by_name("  le bistro ").await.unwrap();
        assert_eq!(found.map(|r| r.id.to_string()), Some("r1".to_string()));
        assert!(provider.find_by_name("Bistro").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn finds_by_id() {
        let provider = InMemoryVenueProvider::new();
        provider.add(restaurant("r1", "Le Bistro")).await;
        provider.add(restaurant("r1", "Renamed")).await;

        let found = provider
            .find_by_id(&RestaurantId::new("r1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Renamed");
    }

    #[tokio::test]
    async fn lists_booked_restaurants_in_booking_order() {
        let provider = InMemoryVenueProvider::with_restaurants(vec![
            restaurant("r1", "One"),
            restaurant("r2", "Two"),
        ]);
        let event = EventId::new("evt").unwrap();
        provider
            .book(
                event.clone(),
                vec![
                    RestaurantId::new("r2").unwrap(),
                    RestaurantId::new("gone").unwrap(),
                    RestaurantId::new("r1").unwrap(),
                ],
            )
            .await;

        let names: Vec<_> = provider
            .list_for_event(&event)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Two", "One"]);

        let other = EventId::new("other").unwrap();
        assert!(provider.list_for_event(&other).await.unwrap().is_empty());
    }
}
