//! Restaurants and their table layouts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RestaurantId, ValidationError};

/// A physical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub table_number: u32,
    pub seat_capacity: u32,
}

impl Table {
    pub fn new(table_number: u32, seat_capacity: u32) -> Self {
        Self {
            table_number,
            seat_capacity,
        }
    }
}

/// A venue taking part in an event.
///
/// The seats used across all tables may never exceed `capacity`, even when
/// the tables themselves would allow more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    pub capacity: u32,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Restaurant {
    /// Creates a restaurant without a table layout.
    pub fn new(
        id: RestaurantId,
        name: impl Into<String>,
        capacity: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("restaurant_name"));
        }
        Ok(Self {
            id,
            name,
            address: None,
            contact_info: None,
            capacity,
            tables: Vec::new(),
        })
    }

    /// Adds a table to the layout.
    pub fn with_table(mut self, table_number: u32, seat_capacity: u32) -> Self {
        self.tables.push(Table::new(table_number, seat_capacity));
        self
    }

    /// Sets the address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sum of table seat capacities.
    pub fn table_seats(&self) -> u32 {
        self.tables.iter().map(|t| t.seat_capacity).sum()
    }

    /// Seats actually usable: bounded by both the tables and the restaurant.
    pub fn usable_seats(&self) -> u32 {
        self.table_seats().min(self.capacity)
    }

    /// Largest single table, bounded by the restaurant capacity.
    pub fn largest_table(&self) -> u32 {
        self.tables
            .iter()
            .map(|t| t.seat_capacity)
            .max()
            .unwrap_or(0)
            .min(self.capacity)
    }

    /// Returns the restaurant with a synthesised layout if it has none.
    ///
    /// Tables of `group_size` seats are laid out until `capacity` is covered;
    /// the last table takes whatever is left.
    pub fn with_default_layout(mut self, group_size: u32) -> Self {
        if !self.tables.is_empty() || group_size == 0 {
            return self;
        }
        let mut remaining = self.capacity;
        let mut number = 1;
        while remaining > 0 {
            let seats = remaining.min(group_size);
            self.tables.push(Table::new(number, seats));
            remaining -= seats;
            number += 1;
        }
        self
    }
}

/// Largest table usable across a set of venues.
pub fn largest_table(venues: &[Restaurant]) -> u32 {
    venues.iter().map(Restaurant::largest_table).max().unwrap_or(0)
}

/// Total usable seats across a set of venues.
pub fn usable_seats(venues: &[Restaurant]) -> u32 {
    venues.iter().map(Restaurant::usable_seats).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(capacity: u32) -> Restaurant {
        Restaurant::new(RestaurantId::new("r1").unwrap(), "Bistro", capacity).unwrap()
    }

    #[test]
    fn usable_seats_respects_restaurant_capacity() {
        let r = restaurant(10).with_table(1, 8).with_table(2, 8);
        assert_eq!(r.table_seats(), 16);
        assert_eq!(r.usable_seats(), 10);
    }

    #[test]
    fn largest_table_is_capped_by_restaurant() {
        let r = restaurant(4).with_table(1, 8);
        assert_eq!(r.largest_table(), 4);
    }

    #[test]
    fn default_layout_splits_capacity_into_group_sized_tables() {
        let r = restaurant(14).with_default_layout(6);
        let seats: Vec<_> = r.tables.iter().map(|t| t.seat_capacity).collect();
        let numbers: Vec<_> = r.tables.iter().map(|t| t.table_number).collect();
        assert_eq!(seats, vec![6, 6, 2]);
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn default_layout_keeps_existing_tables() {
        let r = restaurant(20).with_table(7, 10).with_default_layout(6);
        assert_eq!(r.tables, vec![Table::new(7, 10)]);
    }

    #[test]
    fn zero_capacity_gets_no_tables() {
        let r = restaurant(0).with_default_layout(6);
        assert!(r.tables.is_empty());
        assert_eq!(usable_seats(&[r]), 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(Restaurant::new(RestaurantId::new("r").unwrap(), "  ", 5).is_err());
    }
}
