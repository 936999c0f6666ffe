//! Seating module - grouping guests and placing groups at restaurant tables.
//!
//! The pipeline is pure and synchronous:
//!
//! ```text
//! RawGuestRecord -> ProfileNormalizer -> CompatibilityMatrix
//!     -> GroupPartitioner (or a validated advisor proposal)
//!     -> CapacityAllocator -> DistributionReporter
//! ```
//!
//! [`SeatingEngine`] drives the stages; the [`RelaxationController`] decides
//! which constraints a run may loosen when the ideal plan is infeasible.

pub mod allocator;
pub mod compatibility;
pub mod engine;
pub mod partitioner;
pub mod policy;
pub mod profile;
pub mod refinement;
pub mod relaxation;
pub mod report;
pub mod venue;

pub use allocator::{CapacityAllocator, SeatAssignment, UnassignedGuest, UnassignedReason};
pub use compatibility::{CompatibilityMatrix, CompatibilityScorer, CompatibilityWeights, PairHint};
pub use engine::{PartitionPlan, SeatingEngine, SeatingRun};
pub use partitioner::{Group, GroupPartitioner};
pub use policy::{RunOptions, SeatingPolicy, MAX_GROUP_SIZE};
pub use profile::{GuestProfile, ProfileNormalizer, RawGuestRecord};
pub use refinement::{GroupingProposal, ProfileDigest, ProposalRejection, ProposalValidator};
pub use relaxation::{AppliedRelaxation, Infeasibility, RelaxationController, RelaxationStep, Stage};
pub use report::{
    CompletionStatus, DistributionReport, DistributionSummary, PartitionSource,
    RestaurantDistribution, TableDistribution,
};
pub use venue::{Restaurant, Table};
