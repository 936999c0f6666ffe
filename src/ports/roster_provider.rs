//! Roster provider port.
//!
//! Supplies the guest records of an event, as collected by the booking
//! and survey collaborators. Records may be loosely typed; the domain
//! normalizes them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId};
use crate::domain::seating::RawGuestRecord;

/// Source of event rosters.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Returns the roster of an event.
    ///
    /// `None` means the event is unknown; `Some(vec![])` means it exists but
    /// nobody is booked.
    ///
    /// # Errors
    ///
    /// - `CollaboratorError` if the roster cannot be fetched
    async fn roster(&self, event_id: &EventId) -> Result<Option<Vec<RawGuestRecord>>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn RosterProvider) {}
    }
}
