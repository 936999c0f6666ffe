//! Strongly-typed identifier value objects.
//!
//! Events, guests and restaurants are owned by upstream collaborators, so their
//! identifiers are opaque non-empty strings. Only identifiers minted by this
//! crate (stored distributions) are UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Identifier of a hosted event, as issued by the booking collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new EventId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("event_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a guest on an event roster.
///
/// Ordering is lexicographic and is the tie-break order used throughout the
/// seating engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    /// Creates a new GuestId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("guest_id"));
        }
        Ok(Self(id))
    }

    /// Positional id for a roster record that arrived without one.
    pub(crate) fn anonymous(position: usize) -> Self {
        Self(format!("anonymous-{:04}", position + 1))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a restaurant known to the venue collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Creates a new RestaurantId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("restaurant_id"));
        }
        Ok(Self(id))
    }

    /// Derives a stable identifier from a restaurant name.
    ///
    /// Used for restaurants supplied by the caller that the venue collaborator
    /// does not know. Lowercases, keeps alphanumerics and collapses everything
    /// else into single dashes.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        let mut slug = String::with_capacity(name.len());
        for c in name.trim().chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let slug = slug.trim_matches('-').to_string();
        if slug.is_empty() {
            return Err(ValidationError::empty_field("restaurant_name"));
        }
        Ok(Self(format!("name:{}", slug)))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a stored distribution report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionId(Uuid);

impl DistributionId {
    /// Creates a new random DistributionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DistributionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DistributionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DistributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DistributionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_id_rejects_blank() {
        assert!(GuestId::new("").is_err());
        assert!(GuestId::new("   ").is_err());
        assert_eq!(GuestId::new("g-1").unwrap().as_str(), "g-1");
    }

    #[test]
    fn guest_ids_order_lexicographically() {
        let mut ids = vec![
            GuestId::new("b").unwrap(),
            GuestId::new("a2").unwrap(),
            GuestId::new("a10").unwrap(),
        ];
        ids.sort();
        let raw: Vec<_> = ids.iter().map(GuestId::as_str).collect();
        assert_eq!(raw, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn restaurant_id_from_name_is_stable_slug() {
        let id = RestaurantId::from_name("  Le Petit  Café, Downtown ").unwrap();
        assert_eq!(id.as_str(), "name:le-petit-café-downtown");
        assert_eq!(id, RestaurantId::from_name("le petit café downtown").unwrap());
    }

    #[test]
    fn restaurant_id_from_punctuation_only_name_fails() {
        assert!(RestaurantId::from_name("--- !!").is_err());
    }

    #[test]
    fn distribution_id_roundtrips_through_string() {
        let id = DistributionId::new();
        let parsed: DistributionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn event_id_serializes_transparently() {
        let id = EventId::new("evt-42").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"evt-42\"");
    }
}
