//! Distribution Reporter - the final, serialisable seating plan.
//!
//! A report carries no timestamps or generated ids, so two runs over the
//! same inputs produce byte-identical JSON and the same [`fingerprint`].
//!
//! [`fingerprint`]: DistributionReport::fingerprint

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::allocator::{AllocationOutcome, SeatAssignment, UnassignedGuest};
use super::partitioner::Group;
use super::policy::RunOptions;
use super::relaxation::{AppliedRelaxation, Infeasibility, RelaxationController};
use super::venue::Restaurant;
use crate::domain::foundation::{EventId, GuestId, RestaurantId};

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Every guest seated without relaxing anything.
    Complete,
    /// Every guest seated, at least one relaxation applied.
    CompleteWithRelaxations,
    /// Some guests could not be seated even with relaxations.
    Partial,
    /// A strict run stopped at an infeasibility.
    Incomplete,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompletionStatus::Complete => "complete",
            CompletionStatus::CompleteWithRelaxations => "complete_with_relaxations",
            CompletionStatus::Partial => "partial",
            CompletionStatus::Incomplete => "incomplete",
        };
        write!(f, "{}", s)
    }
}

/// Who produced the grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionSource {
    Heuristic,
    Advisor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Restaurants with at least one seated guest.
    pub total_restaurants: usize,
    /// Tables with at least one seated guest.
    pub total_tables: usize,
    /// Guests with a seat.
    pub total_guests: usize,
    pub unassigned_guests: usize,
    pub roster_size: usize,
    pub total_groups: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDistribution {
    pub table_number: u32,
    pub seat_capacity: u32,
    pub assignments: Vec<SeatAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDistribution {
    pub restaurant_id: RestaurantId,
    pub restaurant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub total_guests: usize,
    pub tables: Vec<TableDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub group_number: u32,
    pub size: usize,
    pub aggregate_score: f64,
    pub average_score: f64,
    pub members: Vec<GuestId>,
}

/// The seating plan for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub event_id: EventId,
    pub status: CompletionStatus,
    pub partition_source: PartitionSource,
    pub group_size: u32,
    pub allow_relaxation: bool,
    pub summary: DistributionSummary,
    pub restaurants: Vec<RestaurantDistribution>,
    pub groups: Vec<GroupSummary>,
    pub unassigned: Vec<UnassignedGuest>,
    pub relaxations: Vec<AppliedRelaxation>,
    pub infeasibilities: Vec<Infeasibility>,
    pub message: String,
}

impl DistributionReport {
    /// Hex SHA-256 of the report's JSON form.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// All seated guests, in restaurant, table and seat order.
    pub fn seated_guests(&self) -> impl Iterator<Item = &SeatAssignment> {
        self.restaurants
            .iter()
            .flat_map(|r| r.tables.iter())
            .flat_map(|t| t.assignments.iter())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assembles reports from pipeline outputs.
pub struct DistributionReporter;

impl DistributionReporter {
    pub fn build(
        event_id: &EventId,
        options: RunOptions,
        source: PartitionSource,
        venues: &[Restaurant],
        groups: &[Group],
        allocation: AllocationOutcome,
        controller: RelaxationController,
    ) -> DistributionReport {
        let (relaxations, infeasibilities) = controller.into_parts();
        let seated = allocation.seated();
        let unassigned = allocation.unassigned;

        let mut restaurants: Vec<RestaurantDistribution> = Vec::new();
        for placement in allocation.tables {
            let venue = &venues[placement.restaurant_index];
            let table = &venue.tables[placement.table_index];
            let fresh = restaurants
                .last()
                .map_or(true, |r| r.restaurant_id != placement.restaurant_id);
            if fresh {
                restaurants.push(RestaurantDistribution {
                    restaurant_id: venue.id.clone(),
                    restaurant: venue.name.clone(),
                    address: venue.address.clone(),
                    total_guests: 0,
                    tables: Vec::new(),
                });
            }
            if let Some(entry) = restaurants.last_mut() {
                entry.total_guests += placement.seats.len();
                entry.tables.push(TableDistribution {
                    table_number: table.table_number,
                    seat_capacity: table.seat_capacity,
                    assignments: placement.seats,
                });
            }
        }

        let summary = DistributionSummary {
            total_restaurants: restaurants.len(),
            total_tables: restaurants.iter().map(|r| r.tables.len()).sum(),
            total_guests: seated,
            unassigned_guests: unassigned.len(),
            roster_size: seated + unassigned.len(),
            total_groups: groups.len(),
        };

        let status = if !infeasibilities.is_empty() {
            CompletionStatus::Incomplete
        } else if !unassigned.is_empty() {
            CompletionStatus::Partial
        } else if !relaxations.is_empty() {
            CompletionStatus::CompleteWithRelaxations
        } else {
            CompletionStatus::Complete
        };

        let message = Self::message(status, &summary, relaxations.len(), &infeasibilities);

        DistributionReport {
            event_id: event_id.clone(),
            status,
            partition_source: source,
            group_size: options.group_size,
            allow_relaxation: options.allow_relaxation,
            summary,
            restaurants,
            groups: groups
                .iter()
                .map(|g| GroupSummary {
                    group_number: g.number,
                    size: g.size(),
                    aggregate_score: round2(g.score),
                    average_score: round2(g.average_score()),
                    members: g.members.clone(),
                })
                .collect(),
            unassigned,
            relaxations,
            infeasibilities,
            message,
        }
    }

    fn message(
        status: CompletionStatus,
        summary: &DistributionSummary,
        relaxations: usize,
        infeasibilities: &[Infeasibility],
    ) -> String {
        let placed = format!(
            "{} guests in {} groups across {} tables at {} restaurants",
            summary.total_guests,
            summary.total_groups,
            summary.total_tables,
            summary.total_restaurants
        );
        match status {
            CompletionStatus::Complete => format!("Seated all {}.", placed),
            CompletionStatus::CompleteWithRelaxations => format!(
                "Seated all {} after {} relaxation(s).",
                placed, relaxations
            ),
            CompletionStatus::Partial => format!(
                "Partially completed: seated {} of {} guests; {} remain unassigned after {} relaxation(s).",
                summary.total_guests, summary.roster_size, summary.unassigned_guests, relaxations
            ),
            CompletionStatus::Incomplete => {
                let reason = infeasibilities
                    .first()
                    .map(|i| i.description.as_str())
                    .unwrap_or("constraints could not be met");
                format!(
                    "Could not complete without relaxing constraints: seated {} of {} guests; {} remain unassigned. First obstacle: {}.",
                    summary.total_guests, summary.roster_size, summary.unassigned_guests, reason
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seating::allocator::CapacityAllocator;
    use crate::domain::seating::relaxation::{RelaxationStep, Stage};
    use std::collections::HashMap;

    fn group(number: u32, ids: &[&str], score: f64) -> Group {
        Group {
            number,
            members: ids.iter().map(|id| GuestId::new(*id).unwrap()).collect(),
            score,
        }
    }

    fn venues() -> Vec<Restaurant> {
        vec![
            Restaurant::new(RestaurantId::new("r1").unwrap(), "North", 4)
                .unwrap()
                .with_table(1, 2)
                .with_table(2, 2),
            Restaurant::new(RestaurantId::new("r2").unwrap(), "South", 10)
                .unwrap()
                .with_table(1, 10),
        ]
    }

    fn report(groups: &[Group], controller: RelaxationController) -> DistributionReport {
        let venues = venues();
        let names = HashMap::new();
        let mut controller = controller;
        let allocation = CapacityAllocator::new(&venues, &names).allocate(groups, &[], &mut controller);
        DistributionReporter::build(
            &EventId::new("evt").unwrap(),
            RunOptions::new(2, controller.allows_relaxation()).unwrap(),
            PartitionSource::Heuristic,
            &venues,
            groups,
            allocation,
            controller,
        )
    }

    #[test]
    fn summary_counts_only_used_tables_and_restaurants() {
        let r = report(&[group(1, &["a", "b"], 1.0)], RelaxationController::new(true));
        assert_eq!(r.summary.total_restaurants, 1);
        assert_eq!(r.summary.total_tables, 1);
        assert_eq!(r.summary.total_guests, 2);
        assert_eq!(r.status, CompletionStatus::Complete);
        assert!(r.message.starts_with("Seated all 2 guests"));
    }

    #[test]
    fn tables_nest_under_their_restaurant() {
        let groups = [
            group(1, &["a", "b"], 3.0),
            group(2, &["c", "d"], 2.0),
            group(3, &["e", "f"], 1.0),
        ];
        let r = report(&groups, RelaxationController::new(true));
        assert_eq!(r.restaurants.len(), 2);
        assert_eq!(r.restaurants[0].tables.len(), 2);
        assert_eq!(r.restaurants[0].total_guests, 4);
        assert_eq!(r.restaurants[1].restaurant, "South");
        assert_eq!(r.seated_guests().count(), 6);
    }

    #[test]
    fn relaxations_mark_status() {
        let mut controller = RelaxationController::new(true);
        controller.record(RelaxationStep::UndersizedGroup, "group 1 short", vec![]);
        let r = report(&[group(1, &["a"], 0.0)], controller);
        assert_eq!(r.status, CompletionStatus::CompleteWithRelaxations);
    }

    #[test]
    fn infeasibility_marks_incomplete() {
        let mut controller = RelaxationController::new(false);
        controller.halt(
            Stage::Partition,
            RelaxationStep::UndersizedGroup,
            "1 guest(s) left over",
            vec![],
        );
        let r = report(&[group(1, &["a", "b"], 0.0)], controller);
        assert_eq!(r.status, CompletionStatus::Incomplete);
        assert!(r.message.contains("1 guest(s) left over"));
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = report(&[group(1, &["a", "b"], 1.0)], RelaxationController::new(true));
        let b = report(&[group(1, &["a", "b"], 1.0)], RelaxationController::new(true));
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn report_serializes_camel_case() {
        let r = report(&[group(1, &["a", "b"], 1.0)], RelaxationController::new(true));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["summary"]["totalGuests"], 2);
        assert_eq!(
            json["restaurants"][0]["tables"][0]["assignments"][1]["seatNumber"],
            2
        );
        assert_eq!(json["status"], "complete");
    }
}
