//! Capacity Allocator - places groups onto tables.
//!
//! Groups are placed in descending score order (creation order on ties) with
//! a first-fit scan over restaurants and their tables in input order. The
//! space a table offers is the smaller of its free seats and its
//! restaurant's free capacity. Seats at a table are numbered from 1 in the
//! order guests sit down.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::partitioner::Group;
use super::relaxation::{RelaxationController, RelaxationStep, Stage};
use super::venue::Restaurant;
use crate::domain::foundation::{GuestId, RestaurantId};

/// One guest in one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub guest_id: GuestId,
    pub guest_name: String,
    pub seat_number: u32,
    pub group_number: u32,
}

/// Why a guest has no seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// A strict run could not place the guest in any group.
    NotGrouped,
    /// No table had room for the guest.
    NoCapacity,
    /// A strict run stopped allocating before reaching the guest's group.
    AllocationHalted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedGuest {
    pub guest_id: GuestId,
    pub guest_name: String,
    pub group_number: Option<u32>,
    pub reason: UnassignedReason,
}

/// Seats taken at one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlacement {
    pub restaurant_index: usize,
    pub restaurant_id: RestaurantId,
    pub table_index: usize,
    pub table_number: u32,
    pub seats: Vec<SeatAssignment>,
}

/// Everything the allocator decided.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    /// Occupied tables in restaurant then table input order.
    pub tables: Vec<TablePlacement>,
    pub unassigned: Vec<UnassignedGuest>,
}

impl AllocationOutcome {
    pub fn seated(&self) -> usize {
        self.tables.iter().map(|t| t.seats.len()).sum()
    }
}

struct VenueState {
    restaurant_free: u32,
    table_used: Vec<u32>,
}

/// Places groups onto tables while honouring both capacity levels.
pub struct CapacityAllocator<'a> {
    venues: &'a [Restaurant],
    names: &'a HashMap<GuestId, String>,
    state: Vec<VenueState>,
    seats: HashMap<(usize, usize), Vec<SeatAssignment>>,
    unassigned: Vec<UnassignedGuest>,
}

impl<'a> CapacityAllocator<'a> {
    /// `names` maps guest ids to display names used in the output.
    pub fn new(venues: &'a [Restaurant], names: &'a HashMap<GuestId, String>) -> Self {
        let state = venues
            .iter()
            .map(|r| VenueState {
                restaurant_free: r.capacity,
                table_used: vec![0; r.tables.len()],
            })
            .collect();
        Self {
            venues,
            names,
            state,
            seats: HashMap::new(),
            unassigned: Vec::new(),
        }
    }

    /// Allocates `groups` and reports `ungrouped` guests as unassigned.
    ///
    /// # Edge Cases
    ///
    /// - A group that fits nowhere is split across two tables of one
    ///   restaurant, or trimmed to the best available table, when the
    ///   controller permits it
    /// - In a strict run the first group that does not fit halts allocation;
    ///   it and every later group are reported unassigned
    pub fn allocate(
        mut self,
        groups: &[Group],
        ungrouped: &[GuestId],
        controller: &mut RelaxationController,
    ) -> AllocationOutcome {
        let mut order: Vec<&Group> = groups.iter().collect();
        order.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.number.cmp(&b.number)));

        for group in order {
            if controller.is_halted(Stage::Allocation) {
                self.leave_unassigned(group, &group.members, UnassignedReason::AllocationHalted);
                continue;
            }
            self.place(group, controller);
        }

        for id in ungrouped {
            self.unassigned.push(UnassignedGuest {
                guest_id: id.clone(),
                guest_name: self.name_of(id),
                group_number: None,
                reason: UnassignedReason::NotGrouped,
            });
        }

        self.into_outcome()
    }

    fn place(&mut self, group: &Group, controller: &mut RelaxationController) {
        let size = group.size() as u32;

        if let Some((r, t)) = self.first_fit(size) {
            self.seat(r, t, group, &group.members);
            return;
        }

        if controller.permits(RelaxationStep::SplitAcrossTables) {
            if let Some((r, first, second)) = self.split_fit(size) {
                let take = self.space(r, first) as usize;
                let (head, tail) = group.members.split_at(take);
                self.seat(r, first, group, head);
                self.seat(r, second, group, tail);
                controller.record(
                    RelaxationStep::SplitAcrossTables,
                    format!(
                        "group {} split over tables {} and {} at {}",
                        group.number,
                        self.venues[r].tables[first].table_number,
                        self.venues[r].tables[second].table_number,
                        self.venues[r].name
                    ),
                    group.members.clone(),
                );
                return;
            }
        }

        if controller.permits(RelaxationStep::ExcessUnassigned) {
            let (seated, excess) = match self.roomiest_table() {
                Some((r, t)) => {
                    let take = self.space(r, t) as usize;
                    let (head, tail) = group.members.split_at(take.min(group.members.len()));
                    self.seat(r, t, group, head);
                    (head.len(), tail)
                }
                None => (0, group.members.as_slice()),
            };
            self.leave_unassigned(group, excess, UnassignedReason::NoCapacity);
            controller.record(
                RelaxationStep::ExcessUnassigned,
                format!(
                    "group {} seated {} of {} guests; no room for the rest",
                    group.number,
                    seated,
                    group.size()
                ),
                excess.to_vec(),
            );
            return;
        }

        controller.halt(
            Stage::Allocation,
            RelaxationStep::SplitAcrossTables,
            format!(
                "no single table has room for group {} of {} guests",
                group.number, size
            ),
            group.members.clone(),
        );
        self.leave_unassigned(group, &group.members, UnassignedReason::NoCapacity);
    }

    /// Free seats at a table, bounded by its restaurant.
    fn space(&self, r: usize, t: usize) -> u32 {
        let state = &self.state[r];
        let table_free = self.venues[r].tables[t]
            .seat_capacity
            .saturating_sub(state.table_used[t]);
        table_free.min(state.restaurant_free)
    }

    fn first_fit(&self, size: u32) -> Option<(usize, usize)> {
        for r in 0..self.venues.len() {
            for t in 0..self.venues[r].tables.len() {
                if self.space(r, t) >= size {
                    return Some((r, t));
                }
            }
        }
        None
    }

    fn split_fit(&self, size: u32) -> Option<(usize, usize, usize)> {
        for r in 0..self.venues.len() {
            if self.state[r].restaurant_free < size {
                continue;
            }
            let tables = self.venues[r].tables.len();
            for first in 0..tables {
                let a = self.space(r, first);
                if a == 0 {
                    continue;
                }
                for second in (first + 1)..tables {
                    if a + self.space(r, second) >= size {
                        return Some((r, first, second));
                    }
                }
            }
        }
        None
    }

    /// Table with the most usable space; first in input order on ties.
    fn roomiest_table(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), u32)> = None;
        for r in 0..self.venues.len() {
            for t in 0..self.venues[r].tables.len() {
                let space = self.space(r, t);
                if space > 0 && best.map_or(true, |(_, b)| space > b) {
                    best = Some(((r, t), space));
                }
            }
        }
        best.map(|(at, _)| at)
    }

    fn seat(&mut self, r: usize, t: usize, group: &Group, members: &[GuestId]) {
        let used = &mut self.state[r].table_used[t];
        let start = *used;
        *used += members.len() as u32;
        self.state[r].restaurant_free -= members.len() as u32;

        let names = self.names;
        let seats = self.seats.entry((r, t)).or_default();
        for (offset, id) in members.iter().enumerate() {
            seats.push(SeatAssignment {
                guest_id: id.clone(),
                guest_name: names.get(id).cloned().unwrap_or_else(|| id.to_string()),
                seat_number: start + offset as u32 + 1,
                group_number: group.number,
            });
        }
    }

    fn leave_unassigned(&mut self, group: &Group, members: &[GuestId], reason: UnassignedReason) {
        for id in members {
            self.unassigned.push(UnassignedGuest {
                guest_id: id.clone(),
                guest_name: self.name_of(id),
                group_number: Some(group.number),
                reason,
            });
        }
    }

    fn name_of(&self, id: &GuestId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn into_outcome(mut self) -> AllocationOutcome {
        let mut tables = Vec::new();
        for (r, venue) in self.venues.iter().enumerate() {
            for (t, table) in venue.tables.iter().enumerate() {
                if let Some(seats) = self.seats.remove(&(r, t)) {
                    tables.push(TablePlacement {
                        restaurant_index: r,
                        restaurant_id: venue.id.clone(),
                        table_index: t,
                        table_number: table.table_number,
                        seats,
                    });
                }
            }
        }
        AllocationOutcome {
            tables,
            unassigned: self.unassigned,
        }
    }
}
