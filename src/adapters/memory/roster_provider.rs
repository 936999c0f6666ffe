//! In-memory roster provider.
//!
//! Holds rosters keyed by event. Used by tests and by the binary, where the
//! request file plays the booking collaborator.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventId};
use crate::domain::seating::RawGuestRecord;
use crate::ports::RosterProvider;

/// In-memory storage for event rosters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterProvider {
    rosters: Arc<RwLock<HashMap<EventId, Vec<RawGuestRecord>>>>,
}

impl InMemoryRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event with its roster, replacing any previous one.
    pub async fn insert(&self, event_id: EventId, guests: Vec<RawGuestRecord>) {
        self.rosters.write().await.insert(event_id, guests);
    }

    /// Builder variant of [`insert`](Self::insert) for synchronous setup.
    pub fn with_roster(self, event_id: EventId, guests: Vec<RawGuestRecord>) -> Self {
        // Not yet shared, so the lock is uncontended.
        if let Ok(mut rosters) = self.rosters.try_write() {
            rosters.insert(event_id, guests);
        }
        self
    }
}

#[async_trait]
impl RosterProvider for InMemoryRosterProvider {
    async fn roster(&self, event_id: &EventId) -> Result<Option<Vec<RawGuestRecord>>, DomainError> {
        Ok(self.rosters.read().await.get(event_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(id: &str) -> RawGuestRecord {
        RawGuestRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unknown_event_is_none() {
        let provider = InMemoryRosterProvider::new();
        let roster = provider.roster(&EventId::new("missing").unwrap()).await.unwrap();
        assert!(roster.is_none());
    }

    #[tokio::test]
    async fn empty_roster_is_distinct_from_unknown_event() {
        let event = EventId::new("evt").unwrap();
        let provider = InMemoryRosterProvider::new().with_roster(event.clone(), vec![]);
        assert_eq!(provider.roster(&event).await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn insert_replaces_roster() {
        let event = EventId::new("evt").unwrap();
        let provider = InMemoryRosterProvider::new().with_roster(event.clone(), vec![guest("a")]);
        provider.insert(event.clone(), vec![guest("b"), guest("c")]).await;

        let roster = provider.roster(&event).await.unwrap().unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, "b");
    }
}
