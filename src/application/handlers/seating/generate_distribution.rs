//! GenerateDistributionHandler - Command handler for seating an event.
//!
//! Loads the roster and venues, runs the seating engine, optionally lets a
//! grouping advisor replace the heuristic grouping, and stores the report.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::event_guard::EventGuard;
use crate::domain::foundation::{DistributionId, DomainError, ErrorCode, EventId, RestaurantId};
use crate::domain::seating::{
    DistributionReport, PartitionPlan, ProfileNormalizer, Restaurant, RunOptions, SeatingEngine,
    SeatingRun,
};
use crate::ports::{
    DistributionRepository, GroupingAdvisor, GroupingRequest, RosterProvider, StoredDistribution,
    VenueProvider,
};

/// A restaurant as named by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub capacity: u32,
    #[serde(default)]
    pub contact_info: Option<String>,
}

/// Command to seat the guests of an event.
#[derive(Debug, Clone)]
pub struct GenerateDistributionCommand {
    pub event_id: EventId,
    /// Target group size; the configured default when `None`.
    pub group_size: Option<u32>,
    pub use_ai: bool,
    pub allow_constraint_relaxation: bool,
    /// Replace a report the event already has.
    pub clear_existing: bool,
    /// Restaurants for this run; the event's booked restaurants when empty.
    pub restaurants: Vec<RestaurantRequest>,
}

impl GenerateDistributionCommand {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            group_size: None,
            use_ai: false,
            allow_constraint_relaxation: true,
            clear_existing: false,
            restaurants: Vec::new(),
        }
    }
}

/// Result of a seating run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDistributionResult {
    pub distribution_id: DistributionId,
    /// Guests that received a seat.
    pub imported: usize,
    /// Guests on the roster.
    pub total_guests: usize,
    pub groups_generated: usize,
    pub distribution: DistributionReport,
    pub message: String,
}

/// Handler for seating runs.
pub struct GenerateDistributionHandler {
    rosters: Arc<dyn RosterProvider>,
    venues: Arc<dyn VenueProvider>,
    repository: Arc<dyn DistributionRepository>,
    advisor: Option<Arc<dyn GroupingAdvisor>>,
    engine: SeatingEngine,
    guard: EventGuard,
    default_group_size: u32,
    advisor_timeout: Duration,
}

impl GenerateDistributionHandler {
    pub fn new(
        rosters: Arc<dyn RosterProvider>,
        venues: Arc<dyn VenueProvider>,
        repository: Arc<dyn DistributionRepository>,
        engine: SeatingEngine,
    ) -> Self {
        Self {
            rosters,
            venues,
            repository,
            advisor: None,
            engine,
            guard: EventGuard::new(),
            default_group_size: 6,
            advisor_timeout: Duration::from_secs(20),
        }
    }

    /// Enables AI refinement through `advisor`, bounded by `timeout`.
    pub fn with_advisor(mut self, advisor: Arc<dyn GroupingAdvisor>, timeout: Duration) -> Self {
        self.advisor = Some(advisor);
        self.advisor_timeout = timeout;
        self
    }

    pub fn with_default_group_size(mut self, group_size: u32) -> Self {
        self.default_group_size = group_size;
        self
    }

    /// Shares a guard with other handlers writing the same events.
    pub fn with_guard(mut self, guard: EventGuard) -> Self {
        self.guard = guard;
        self
    }

    pub async fn handle(
        &self,
        cmd: GenerateDistributionCommand,
    ) -> Result<GenerateDistributionResult, DomainError> {
        let group_size = cmd.group_size.unwrap_or(self.default_group_size);
        let options = RunOptions::new(group_size, cmd.allow_constraint_relaxation)
            .map_err(|e| DomainError::new(ErrorCode::InvalidGroupSize, e.to_string()))?;

        let _held = self.guard.acquire(&cmd.event_id).await;

        // 1. Load roster and any previous report
        let (roster, existing) = futures::try_join!(
            self.rosters.roster(&cmd.event_id),
            self.repository.find_by_event(&cmd.event_id),
        )?;
        let roster = roster.ok_or_else(|| {
            DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", cmd.event_id),
            )
        })?;
        if let Some(existing) = &existing {
            if !cmd.clear_existing {
                return Err(DomainError::new(
                    ErrorCode::DistributionExists,
                    format!(
                        "Event {} already has a distribution; set clearExisting to replace it",
                        cmd.event_id
                    ),
                )
                .with_detail("distribution_id", existing.id.to_string()));
            }
        }

        // 2. Resolve venues and prepare the run
        let venues = self.resolve_venues(&cmd).await?;
        let profiles = ProfileNormalizer::normalize_roster(&roster);
        let run = self
            .engine
            .prepare(cmd.event_id.clone(), profiles, venues, options)?;

        info!(
            event_id = %cmd.event_id,
            guests = run.profiles().len(),
            restaurants = run.venues().len(),
            group_size,
            allow_relaxation = options.allow_relaxation,
            use_ai = cmd.use_ai,
            "seating run started"
        );

        // 3. Group, optionally refine, allocate
        let heuristic = self.engine.partition(&run);
        let plan = if cmd.use_ai {
            self.refine(&run, heuristic).await
        } else {
            heuristic
        };
        let report = self.engine.allocate(&run, plan);

        for relaxation in &report.relaxations {
            info!(
                event_id = %cmd.event_id,
                step = %relaxation.step,
                guests = relaxation.guests.len(),
                "relaxation applied: {}",
                relaxation.description
            );
        }

        // 4. Persist
        let stored = StoredDistribution::new(report)?;
        if cmd.clear_existing {
            self.repository.replace(&stored).await?;
        } else {
            self.repository.insert_new(&stored).await?;
        }

        let report = stored.report;
        info!(
            event_id = %cmd.event_id,
            distribution_id = %stored.id,
            status = %report.status,
            seated = report.summary.total_guests,
            unassigned = report.summary.unassigned_guests,
            fingerprint = %stored.fingerprint,
            "seating run finished"
        );

        Ok(GenerateDistributionResult {
            distribution_id: stored.id,
            imported: report.summary.total_guests,
            total_guests: report.summary.roster_size,
            groups_generated: report.groups.len(),
            message: report.message.clone(),
            distribution: report,
        })
    }

    /// Caller-named restaurants, looked up by name; the event's booked
    /// restaurants when the caller names none.
    ///
    /// A known restaurant keeps its table layout but takes the capacity and
    /// any contact details from the request.
    async fn resolve_venues(
        &self,
        cmd: &GenerateDistributionCommand,
    ) -> Result<Vec<Restaurant>, DomainError> {
        if cmd.restaurants.is_empty() {
            return self.venues.list_for_event(&cmd.event_id).await;
        }

        let mut venues = Vec::with_capacity(cmd.restaurants.len());
        for request in &cmd.restaurants {
            let name = request.name.trim();
            let mut restaurant = match self.venues.find_by_name(name).await? {
                Some(known) => known,
                None => Restaurant::new(RestaurantId::from_name(name)?, name, request.capacity)?,
            };
            restaurant.capacity = request.capacity;
            if request.address.is_some() {
                restaurant.address = request.address.clone();
            }
            if request.contact_info.is_some() {
                restaurant.contact_info = request.contact_info.clone();
            }
            venues.push(restaurant);
        }
        Ok(venues)
    }

    /// Asks the advisor for a grouping; keeps `heuristic` on any failure.
    async fn refine(&self, run: &SeatingRun, heuristic: PartitionPlan) -> PartitionPlan {
        let event_id = run.event_id();
        let Some(advisor) = &self.advisor else {
            warn!(event_id = %event_id, "AI refinement requested but no advisor is configured");
            return heuristic;
        };

        let options = run.options();
        let request = GroupingRequest {
            event_id: event_id.clone(),
            group_size: options.group_size,
            allow_relaxation: options.allow_relaxation,
            max_group_size: self.engine.group_limit(run),
            guests: run.digests(),
        };

        let proposal = match timeout(self.advisor_timeout, advisor.propose(&request)).await {
            Ok(Ok(proposal)) => proposal,
            Ok(Err(e)) => {
                warn!(
                    event_id = %event_id,
                    advisor = advisor.name(),
                    error = %e,
                    "AI refinement failed, keeping heuristic grouping"
                );
                return heuristic;
            }
            Err(_) => {
                warn!(
                    event_id = %event_id,
                    advisor = advisor.name(),
                    timeout_ms = self.advisor_timeout.as_millis() as u64,
                    "AI refinement timed out, keeping heuristic grouping"
                );
                return heuristic;
            }
        };

        match self.engine.adopt(run, &proposal) {
            Ok(plan) => {
                info!(
                    event_id = %event_id,
                    advisor = advisor.name(),
                    groups = plan.groups.len(),
                    "advisor grouping adopted"
                );
                plan
            }
            Err(rejection) => {
                warn!(
                    event_id = %event_id,
                    advisor = advisor.name(),
                    reason = %rejection,
                    "advisor grouping rejected, keeping heuristic grouping"
                );
                heuristic
            }
        }
    }
}
