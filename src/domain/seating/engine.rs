//! Seating engine - ties scorer, partitioner, allocator and reporter together.
//!
//! The engine is synchronous and owns no per-run state: every run carries its
//! own matrix and working data in a [`SeatingRun`], so independent events can
//! be processed concurrently with one shared engine.

use std::collections::HashMap;
use tracing::debug;

use super::allocator::CapacityAllocator;
use super::compatibility::{CompatibilityMatrix, CompatibilityScorer};
use super::partitioner::{
    record_hint_violations, record_oversized, record_undersized, Group, GroupPartitioner,
};
use super::policy::{RunOptions, SeatingPolicy};
use super::profile::GuestProfile;
use super::refinement::{GroupingProposal, ProfileDigest, ProposalRejection, ProposalValidator};
use super::relaxation::{AppliedRelaxation, RelaxationController};
use super::report::{DistributionReport, DistributionReporter, PartitionSource};
use super::venue::{self, Restaurant};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, GuestId, ValidationError};

/// Validated inputs and precomputed scores of one run.
#[derive(Debug, Clone)]
pub struct SeatingRun {
    event_id: EventId,
    options: RunOptions,
    profiles: Vec<GuestProfile>,
    venues: Vec<Restaurant>,
    matrix: CompatibilityMatrix,
    names: HashMap<GuestId, String>,
    largest_table: u32,
}

impl SeatingRun {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Profiles in id order.
    pub fn profiles(&self) -> &[GuestProfile] {
        &self.profiles
    }

    /// Venues with their effective table layouts.
    pub fn venues(&self) -> &[Restaurant] {
        &self.venues
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    pub fn largest_table(&self) -> u32 {
        self.largest_table
    }

    /// Privacy-reduced profiles for an advisor.
    pub fn digests(&self) -> Vec<ProfileDigest> {
        self.profiles.iter().map(ProfileDigest::from_profile).collect()
    }
}

/// A grouping waiting to be allocated.
#[derive(Debug, Clone)]
pub struct PartitionPlan {
    pub groups: Vec<Group>,
    pub ungrouped: Vec<GuestId>,
    pub source: PartitionSource,
    controller: RelaxationController,
}

impl PartitionPlan {
    pub fn relaxations(&self) -> &[AppliedRelaxation] {
        self.controller.applied()
    }
}

/// Entry point of the pure seating pipeline.
#[derive(Debug, Clone)]
pub struct SeatingEngine {
    policy: SeatingPolicy,
    scorer: CompatibilityScorer,
}

impl SeatingEngine {
    pub fn new(policy: SeatingPolicy) -> Result<Self, ValidationError> {
        policy.validate()?;
        let scorer = CompatibilityScorer::new(policy.weights.clone());
        Ok(Self { policy, scorer })
    }

    pub fn policy(&self) -> &SeatingPolicy {
        &self.policy
    }

    /// Validates inputs and scores every pair.
    ///
    /// Restaurants without tables receive a layout of group-sized tables.
    ///
    /// # Errors
    ///
    /// - `EmptyRoster` if there are no profiles
    /// - `NoRestaurants` if there are no venues
    /// - `NoCapacity` if the venues offer no usable seat
    pub fn prepare(
        &self,
        event_id: EventId,
        mut profiles: Vec<GuestProfile>,
        venues: Vec<Restaurant>,
        options: RunOptions,
    ) -> Result<SeatingRun, DomainError> {
        if profiles.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyRoster,
                format!("Event {} has no guests to seat", event_id),
            ));
        }
        if venues.is_empty() {
            return Err(DomainError::new(
                ErrorCode::NoRestaurants,
                format!("No restaurants available for event {}", event_id),
            ));
        }

        let venues: Vec<Restaurant> = venues
            .into_iter()
            .map(|r| r.with_default_layout(options.group_size))
            .collect();
        let seats = venue::usable_seats(&venues);
        if seats == 0 {
            return Err(DomainError::new(
                ErrorCode::NoCapacity,
                format!("Restaurants for event {} have no usable seats", event_id),
            )
            .with_detail("restaurants", venues.len().to_string()));
        }

        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles.dedup_by(|a, b| a.id == b.id);

        let matrix = CompatibilityMatrix::build(&profiles, &self.scorer);
        let names = profiles
            .iter()
            .map(|p| (p.id.clone(), p.display_name.clone()))
            .collect();
        let largest_table = venue::largest_table(&venues);

        debug!(
            event_id = %event_id,
            guests = profiles.len(),
            seats,
            largest_table,
            "seating run prepared"
        );

        Ok(SeatingRun {
            event_id,
            options,
            profiles,
            venues,
            matrix,
            names,
            largest_table,
        })
    }

    /// Heuristic grouping.
    pub fn partition(&self, run: &SeatingRun) -> PartitionPlan {
        let mut controller = RelaxationController::new(run.options.allow_relaxation);
        let outcome = GroupPartitioner::new(&run.matrix, &self.policy).partition(
            run.options,
            run.largest_table,
            &mut controller,
        );
        debug!(
            event_id = %run.event_id,
            groups = outcome.groups.len(),
            ungrouped = outcome.ungrouped.len(),
            "heuristic partition built"
        );
        PartitionPlan {
            groups: outcome.groups,
            ungrouped: outcome.ungrouped,
            source: PartitionSource::Heuristic,
            controller,
        }
    }

    /// Largest group a proposal for `run` may contain.
    pub fn group_limit(&self, run: &SeatingRun) -> u32 {
        self.policy.group_limit(run.options, run.largest_table)
    }

    /// Turns an advisor proposal into a plan, or explains why it cannot be used.
    pub fn adopt(
        &self,
        run: &SeatingRun,
        proposal: &GroupingProposal,
    ) -> Result<PartitionPlan, ProposalRejection> {
        let validated = ProposalValidator::validate(
            proposal,
            &run.matrix,
            run.options,
            &self.policy,
            run.largest_table,
        )?;

        let g = run.options.group_size as usize;
        let mut controller = RelaxationController::new(run.options.allow_relaxation);
        record_undersized(&run.matrix, &validated.groups, g, &mut controller);
        record_oversized(
            &run.matrix,
            &validated.groups,
            &validated.oversized,
            g,
            &mut controller,
        );
        record_hint_violations(&run.matrix, &validated.groups, &mut controller);

        let groups = validated
            .groups
            .iter()
            .enumerate()
            .map(|(k, members)| Group::from_positions(k as u32 + 1, members, &run.matrix))
            .collect();

        Ok(PartitionPlan {
            groups,
            ungrouped: Vec::new(),
            source: PartitionSource::Advisor,
            controller,
        })
    }

    /// Seats a plan and builds the report.
    pub fn allocate(&self, run: &SeatingRun, plan: PartitionPlan) -> DistributionReport {
        let PartitionPlan {
            groups,
            ungrouped,
            source,
            mut controller,
        } = plan;

        let allocation = CapacityAllocator::new(&run.venues, &run.names).allocate(
            &groups,
            &ungrouped,
            &mut controller,
        );

        DistributionReporter::build(
            &run.event_id,
            run.options,
            source,
            &run.venues,
            &groups,
            allocation,
            controller,
        )
    }

    /// Heuristic partition followed by allocation.
    pub fn run(&self, run: &SeatingRun) -> DistributionReport {
        self.allocate(run, self.partition(run))
    }
}
