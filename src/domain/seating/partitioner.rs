//! Group Partitioner - greedy, deterministic grouping of a roster.
//!
//! # Algorithm
//!
//! 1. Seed a group with the highest-scoring unplaced pair. Ties go to the
//!    pair that sorts first by guest id.
//! 2. Grow it with the unplaced guest whose average score against the
//!    current members is highest, skipping anyone a member must not sit
//!    with, until the group is full or only such guests are left.
//! 3. Repeat while at least `group_size` guests remain unplaced.
//! 4. Place the remainder: keep it as an undersized group when it is large
//!    enough, otherwise spread it over existing groups that hold nobody the
//!    guest must not sit with.
//! 5. Run a bounded number of member-swap sweeps that only accept strict
//!    improvements of the total score.
//!
//! Every loop walks guests in id order and keeps the first maximum, so the
//! same roster always yields the same groups.

use serde::{Deserialize, Serialize};

use super::compatibility::CompatibilityMatrix;
use super::policy::{RunOptions, SeatingPolicy};
use super::relaxation::{RelaxationController, RelaxationStep, Stage};
use crate::domain::foundation::GuestId;

/// Improvements smaller than this are treated as float noise.
const SWAP_EPSILON: f64 = 1e-9;

/// A group of guests intended to share one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// 1-based creation order.
    pub number: u32,
    pub members: Vec<GuestId>,
    /// Sum of pairwise scores among members.
    pub score: f64,
}

impl Group {
    pub(crate) fn from_positions(number: u32, positions: &[usize], matrix: &CompatibilityMatrix) -> Self {
        Self {
            number,
            members: positions.iter().map(|&p| matrix.id(p).clone()).collect(),
            score: matrix.aggregate(positions),
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Mean pairwise score. Zero for groups of one.
    pub fn average_score(&self) -> f64 {
        let n = self.members.len();
        if n < 2 {
            return 0.0;
        }
        self.score / (n * (n - 1) / 2) as f64
    }
}

/// Result of partitioning a roster.
#[derive(Debug, Clone, Default)]
pub struct PartitionOutcome {
    pub groups: Vec<Group>,
    /// Guests left out because a strict run stopped.
    pub ungrouped: Vec<GuestId>,
}


/// Splits a roster into groups of a target size.
pub struct GroupPartitioner<'a> {
    matrix: &'a CompatibilityMatrix,
    policy: &'a SeatingPolicy,
}

impl<'a> GroupPartitioner<'a> {
    pub fn new(matrix: &'a CompatibilityMatrix, policy: &'a SeatingPolicy) -> Self {
        Self { matrix, policy }
    }

    /// Partitions every guest of the matrix.
    ///
    /// `largest_table` caps how far a group may grow while absorbing
    /// leftovers. Relaxations and infeasibilities go to `controller`.
    ///
    /// # Edge Cases
    ///
    /// - An empty roster yields no groups
    /// - A group size of 1 seats every guest alone
    /// - Fewer guests than the group size form a single terminal remainder
    pub fn partition(
        &self,
        options: RunOptions,
        largest_table: u32,
        controller: &mut RelaxationController,
    ) -> PartitionOutcome {
        let n = self.matrix.len();
        let g = options.group_size as usize;
        let strict = !controller.allows_relaxation();

        if n == 0 {
            return PartitionOutcome::default();
        }
        if g == 1 {
            let groups = (0..n).map(|i| vec![i]).collect::<Vec<_>>();
            return self.finish(groups, Vec::new(), controller);
        }

        let mut placed = vec![false; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut ungrouped = Vec::new();

        let remainder = loop {
            let unplaced: Vec<usize> = (0..n).filter(|&i| !placed[i]).collect();
            if unplaced.len() < g {
                break unplaced;
            }
            match self.seed_pair(&unplaced, strict) {
                Some((i, j)) => {
                    placed[i] = true;
                    placed[j] = true;
                    let mut group = vec![i, j];
                    self.grow(&mut group, &mut placed, g);
                    if strict && group.len() < g {
                        let reached = group.len();
                        let mut stranded = group;
                        stranded.extend((0..n).filter(|&p| !placed[p]));
                        stranded.sort_unstable();
                        controller.halt(
                            Stage::Partition,
                            RelaxationStep::UndersizedGroup,
                            format!(
                                "group {} stops at {} of {} guests; everyone left must not sit with a member",
                                groups.len() + 1,
                                reached,
                                g
                            ),
                            self.ids(&stranded),
                        );
                        ungrouped = stranded;
                        break Vec::new();
                    }
                    groups.push(group);
                }
                None => {
                    controller.halt(
                        Stage::Partition,
                        RelaxationStep::SeparationHintViolated,
                        format!(
                            "no pair among {} remaining guests may share a group",
                            unplaced.len()
                        ),
                        self.ids(&unplaced),
                    );
                    ungrouped = unplaced;
                    break Vec::new();
                }
            }
        };

        let mut grew = Vec::new();
        if !remainder.is_empty() {
            if strict {
                controller.halt(
                    Stage::Partition,
                    RelaxationStep::UndersizedGroup,
                    format!(
                        "{} guest(s) left over after forming groups of {}",
                        remainder.len(),
                        g
                    ),
                    self.ids(&remainder),
                );
                ungrouped = remainder;
            } else {
                let cap = self.policy.group_limit(options, largest_table) as usize;
                grew = self.place_remainder(remainder, &mut groups, g, cap);
            }
        }

        self.improve(&mut groups, strict);
        self.record_size_relaxations(&groups, &grew, g, controller);
        self.finish(groups, ungrouped, controller)
    }

    /// Highest-scoring pair, first in id order on ties.
    fn seed_pair(&self, unplaced: &[usize], strict: bool) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for (k, &i) in unplaced.iter().enumerate() {
            for &j in &unplaced[k + 1..] {
                if strict && self.matrix.is_apart(i, j) {
                    continue;
                }
                let score = self.matrix.score(i, j);
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some(((i, j), score));
                }
            }
        }
        best.map(|(pair, _)| pair)
    }

    /// Fills `group` up to `g` members. Stops short only when every unplaced
    /// guest must not sit with a member.
    fn grow(&self, group: &mut Vec<usize>, placed: &mut [bool], g: usize) {
        let n = self.matrix.len();
        let mut affinity: Vec<f64> = (0..n)
            .map(|c| if placed[c] { 0.0 } else { self.matrix.affinity(c, group) })
            .collect();

        while group.len() < g {
            let mut best: Option<(usize, f64)> = None;
            for c in 0..n {
                if placed[c] {
                    continue;
                }
                if group.iter().any(|&m| self.matrix.is_apart(c, m)) {
                    continue;
                }
                let average = affinity[c] / group.len() as f64;
                if best.map_or(true, |(_, b)| average > b) {
                    best = Some((c, average));
                }
            }
            let Some((chosen, _)) = best else { break };

            placed[chosen] = true;
            group.push(chosen);
            for other in 0..n {
                if !placed[other] {
                    affinity[other] += self.matrix.score(other, chosen);
                }
            }
        }
    }

    fn place_remainder(
        &self,
        remainder: Vec<usize>,
        groups: &mut Vec<Vec<usize>>,
        g: usize,
        cap: usize,
    ) -> Vec<usize> {
        let mut grew = Vec::new();

        if remainder.len() as f64 >= self.policy.remainder_threshold * g as f64 {
            groups.push(remainder);
            return grew;
        }

        let mut leftovers = Vec::new();
        for member in remainder {
            let mut best: Option<(usize, f64)> = None;
            for (k, group) in groups.iter().enumerate() {
                if group.len() >= cap || group.iter().any(|&m| self.matrix.is_apart(member, m)) {
                    continue;
                }
                let gain = self.matrix.affinity(member, group);
                if best.map_or(true, |(_, b)| gain > b) {
                    best = Some((k, gain));
                }
            }
            match best {
                Some((k, _)) => {
                    groups[k].push(member);
                    if groups[k].len() > g && !grew.contains(&k) {
                        grew.push(k);
                    }
                }
                None => leftovers.push(member),
            }
        }

        if !leftovers.is_empty() {
            groups.push(leftovers);
        }
        grew.sort_unstable();
        grew
    }

    /// Swaps members between groups while that raises the total score.
    fn improve(&self, groups: &mut [Vec<usize>], strict: bool) {
        for _ in 0..self.policy.swap_passes {
            let mut improved = false;
            for a in 0..groups.len() {
                for b in (a + 1)..groups.len() {
                    for ia in 0..groups[a].len() {
                        for ib in 0..groups[b].len() {
                            let (x, y) = (groups[a][ia], groups[b][ib]);
                            let pair = self.matrix.score(x, y);
                            let before = self.matrix.affinity(x, &groups[a])
                                + self.matrix.affinity(y, &groups[b]);
                            let after = self.matrix.affinity(y, &groups[a]) - pair
                                + self.matrix.affinity(x, &groups[b])
                                - pair;
                            if after - before <= SWAP_EPSILON {
                                continue;
                            }
                            if strict && self.swap_breaks_hint(x, y, &groups[a], &groups[b]) {
                                continue;
                            }
                            groups[a][ia] = y;
                            groups[b][ib] = x;
                            improved = true;
                        }
                    }
                }
            }
            if !improved {
                break;
            }
        }
    }

    fn swap_breaks_hint(&self, x: usize, y: usize, a: &[usize], b: &[usize]) -> bool {
        a.iter().any(|&m| m != x && self.matrix.is_apart(y, m))
            || b.iter().any(|&m| m != y && self.matrix.is_apart(x, m))
    }

    fn record_size_relaxations(
        &self,
        groups: &[Vec<usize>],
        grew: &[usize],
        g: usize,
        controller: &mut RelaxationController,
    ) {
        record_undersized(self.matrix, groups, g, controller);
        record_oversized(self.matrix, groups, grew, g, controller);
    }

    fn finish(
        &self,
        groups: Vec<Vec<usize>>,
        ungrouped: Vec<usize>,
        controller: &mut RelaxationController,
    ) -> PartitionOutcome {
        record_hint_violations(self.matrix, &groups, controller);
        PartitionOutcome {
            groups: groups
                .iter()
                .enumerate()
                .map(|(k, members)| Group::from_positions(k as u32 + 1, members, self.matrix))
                .collect(),
            ungrouped: self.ids(&ungrouped),
        }
    }

    fn ids(&self, positions: &[usize]) -> Vec<GuestId> {
        positions.iter().map(|&p| self.matrix.id(p).clone()).collect()
    }
}

/// Records an undersized-group relaxation for every group below `g`.
pub(crate) fn record_undersized(
    matrix: &CompatibilityMatrix,
    groups: &[Vec<usize>],
    g: usize,
    controller: &mut RelaxationController,
) {
    for (k, members) in groups.iter().enumerate() {
        if members.len() < g {
            controller.record(
                RelaxationStep::UndersizedGroup,
                format!(
                    "group {} has {} guest(s), below the target of {}",
                    k + 1,
                    members.len(),
                    g
                ),
                members.iter().map(|&p| matrix.id(p).clone()).collect(),
            );
        }
    }
}

/// Records an oversized-group relaxation for each listed group index.
pub(crate) fn record_oversized(
    matrix: &CompatibilityMatrix,
    groups: &[Vec<usize>],
    indices: &[usize],
    g: usize,
    controller: &mut RelaxationController,
) {
    for &k in indices {
        controller.record(
            RelaxationStep::OversizedGroup,
            format!(
                "group {} has {} guests, above the target of {}",
                k + 1,
                groups[k].len(),
                g
            ),
            groups[k].iter().map(|&p| matrix.id(p).clone()).collect(),
        );
    }
}

/// Records every must-not-seat-with pair that ended up in one group.
pub(crate) fn record_hint_violations(
    matrix: &CompatibilityMatrix,
    groups: &[Vec<usize>],
    controller: &mut RelaxationController,
) {
    for (k, members) in groups.iter().enumerate() {
        for (i, j) in matrix.apart_pairs(members) {
            controller.record(
                RelaxationStep::SeparationHintViolated,
                format!(
                    "{} and {} share group {} despite a must-not-seat-with request",
                    matrix.id(i),
                    matrix.id(j),
                    k + 1
                ),
                vec![matrix.id(i).clone(), matrix.id(j).clone()],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seating::compatibility::CompatibilityScorer;
    use crate::domain::seating::profile::{DietaryTag, GuestProfile, HumorType};
    use std::collections::BTreeSet;

    fn roster(n: usize) -> Vec<GuestProfile> {
        (0..n)
            .map(|i| GuestProfile::blank(GuestId::new(format!("g{:02}", i)).unwrap()))
            .collect()
    }

    fn run(
        profiles: &[GuestProfile],
        group_size: u32,
        relax: bool,
        largest_table: u32,
    ) -> (PartitionOutcome, RelaxationController) {
        let policy = SeatingPolicy::default();
        let matrix = CompatibilityMatrix::build(
            profiles,
            &CompatibilityScorer::new(policy.weights.clone()),
        );
        let mut controller = RelaxationController::new(relax);
        let outcome = GroupPartitioner::new(&matrix, &policy).partition(
            RunOptions::new(group_size, relax).unwrap(),
            largest_table,
            &mut controller,
        );
        (outcome, controller)
    }

    fn sizes(outcome: &PartitionOutcome) -> Vec<usize> {
        outcome.groups.iter().map(Group::size).collect()
    }

    fn all_members(outcome: &PartitionOutcome) -> BTreeSet<GuestId> {
        outcome
            .groups
            .iter()
            .flat_map(|g| g.members.iter().cloned())
            .chain(outcome.ungrouped.iter().cloned())
            .collect()
    }

    #[test]
    fn exact_multiple_forms_full_groups() {
        let (outcome, controller) = run(&roster(18), 6, true, 6);
        assert_eq!(sizes(&outcome), vec![6, 6, 6]);
        assert!(controller.applied().is_empty());
        assert_eq!(all_members(&outcome).len(), 18);
    }

    #[test]
    fn large_remainder_becomes_undersized_group() {
        let (outcome, controller) = run(&roster(21), 6, true, 6);
        assert_eq!(sizes(&outcome), vec![6, 6, 6, 3]);
        assert_eq!(controller.applied().len(), 1);
        assert_eq!(controller.applied()[0].step, RelaxationStep::UndersizedGroup);
        assert_eq!(controller.applied()[0].guests.len(), 3);
    }

    #[test]
    fn small_remainder_spreads_when_tables_allow() {
        let (outcome, controller) = run(&roster(20), 6, true, 8);
        assert_eq!(sizes(&outcome), vec![7, 7, 6]);
        let steps: Vec<_> = controller.applied().iter().map(|r| r.step).collect();
        assert_eq!(
            steps,
            vec![RelaxationStep::OversizedGroup, RelaxationStep::OversizedGroup]
        );
    }

    #[test]
    fn small_remainder_stays_together_when_tables_are_full_size() {
        let (outcome, controller) = run(&roster(20), 6, true, 6);
        assert_eq!(sizes(&outcome), vec![6, 6, 6, 2]);
        assert_eq!(controller.applied()[0].step, RelaxationStep::UndersizedGroup);
    }

    #[test]
    fn strict_mode_reports_remainder_as_infeasible() {
        let (outcome, controller) = run(&roster(20), 6, false, 6);
        assert_eq!(sizes(&outcome), vec![6, 6, 6]);
        assert_eq!(outcome.ungrouped.len(), 2);
        assert!(controller.applied().is_empty());
        assert_eq!(controller.infeasibilities().len(), 1);
        assert_eq!(controller.infeasibilities()[0].stage, Stage::Partition);
    }

    #[test]
    fn group_size_one_seats_everyone_alone() {
        let (outcome, _) = run(&roster(4), 1, true, 6);
        assert_eq!(sizes(&outcome), vec![1, 1, 1, 1]);
    }

    #[test]
    fn fewer_guests_than_group_size_form_one_group() {
        let (outcome, controller) = run(&roster(4), 6, true, 6);
        assert_eq!(sizes(&outcome), vec![4]);
        assert_eq!(controller.applied()[0].step, RelaxationStep::UndersizedGroup);
    }

    #[test]
    fn seed_ties_break_by_guest_id() {
        let (outcome, _) = run(&roster(6), 2, true, 6);
        let first: Vec<_> = outcome.groups[0].members.iter().map(GuestId::as_str).collect();
        assert_eq!(first, vec!["g00", "g01"]);
    }

    #[test]
    fn must_seat_pair_is_seeded_first() {
        let mut profiles = roster(6);
        let partner = profiles[5].id.clone();
        profiles[2].must_seat_with.insert(partner);
        let (outcome, _) = run(&profiles, 3, true, 6);
        let first: Vec<_> = outcome.groups[0].members.iter().map(GuestId::as_str).collect();
        assert_eq!(&first[..2], &["g02", "g05"]);
    }

    #[test]
    fn strict_mode_never_groups_forbidden_pairs() {
        let mut profiles = roster(4);
        let b = profiles[1].id.clone();
        profiles[0].must_not_seat_with.insert(b);
        let (outcome, controller) = run(&profiles, 2, false, 6);
        for group in &outcome.groups {
            let ids: Vec<_> = group.members.iter().map(GuestId::as_str).collect();
            assert!(!(ids.contains(&"g00") && ids.contains(&"g01")));
        }
        assert!(controller.infeasibilities().is_empty());
    }

    #[test]
    fn relaxed_mode_reports_forced_hint_violation() {
        let mut profiles = roster(2);
        let b = profiles[1].id.clone();
        profiles[0].must_not_seat_with.insert(b);
        let (outcome, controller) = run(&profiles, 2, true, 6);
        assert_eq!(sizes(&outcome), vec![2]);
        assert_eq!(
            controller.applied()[0].step,
            RelaxationStep::SeparationHintViolated
        );
    }

    #[test]
    fn strict_mode_halts_when_only_forbidden_pairs_remain() {
        let mut profiles = roster(2);
        let b = profiles[1].id.clone();
        profiles[0].must_not_seat_with.insert(b);
        let (outcome, controller) = run(&profiles, 2, false, 6);
        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.ungrouped.len(), 2);
        assert_eq!(
            controller.infeasibilities()[0].refused,
            RelaxationStep::SeparationHintViolated
        );
    }

    /// g00 must not sit with anyone but g01.
    fn loner(n: usize) -> Vec<GuestProfile> {
        let mut profiles = roster(n);
        let others: Vec<GuestId> = profiles[2..].iter().map(|p| p.id.clone()).collect();
        profiles[0].must_not_seat_with.extend(others);
        profiles
    }

    #[test]
    fn strict_mode_halts_on_a_group_it_cannot_fill() {
        let (outcome, controller) = run(&loner(6), 3, false, 6);
        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.ungrouped.len(), 6);
        assert!(controller.applied().is_empty());
        assert_eq!(controller.infeasibilities().len(), 1);
        assert_eq!(
            controller.infeasibilities()[0].refused,
            RelaxationStep::UndersizedGroup
        );
    }

    #[test]
    fn relaxed_mode_records_a_group_it_cannot_fill() {
        let (outcome, controller) = run(&loner(6), 3, true, 6);
        assert_eq!(sizes(&outcome), vec![2, 4]);
        let steps: Vec<_> = controller.applied().iter().map(|r| r.step).collect();
        assert_eq!(
            steps,
            vec![RelaxationStep::UndersizedGroup, RelaxationStep::OversizedGroup]
        );
        assert_eq!(controller.applied()[0].guests, outcome.groups[0].members);
    }

    #[test]
    fn leftover_guest_never_joins_someone_they_must_avoid() {
        let mut profiles = roster(7);
        let first = profiles[0].id.clone();
        profiles[6].must_not_seat_with.insert(first);
        let (outcome, controller) = run(&profiles, 6, true, 8);

        assert_eq!(sizes(&outcome), vec![6, 1]);
        assert_eq!(outcome.groups[1].members[0].as_str(), "g06");
        let steps: Vec<_> = controller.applied().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![RelaxationStep::UndersizedGroup]);
    }

    fn two_vegans(n: usize) -> Vec<GuestProfile> {
        let mut profiles = roster(n);
        for (i, p) in profiles.iter_mut().enumerate() {
            p.dietary.tag = if i < 2 {
                DietaryTag::Vegan
            } else {
                DietaryTag::NoRestriction
            };
        }
        profiles
    }

    #[test]
    fn clashing_diets_still_fill_groups() {
        let (outcome, controller) = run(&two_vegans(8), 6, false, 6);
        assert_eq!(sizes(&outcome), vec![6]);
        assert_eq!(outcome.ungrouped.len(), 2);
        assert_eq!(controller.infeasibilities().len(), 1);
    }

    #[test]
    fn every_short_group_is_recorded() {
        let (outcome, controller) = run(&two_vegans(8), 6, true, 6);
        let mut got = sizes(&outcome);
        got.sort_unstable();
        assert_eq!(got, vec![2, 6]);

        let short: Vec<BTreeSet<GuestId>> = outcome
            .groups
            .iter()
            .filter(|g| g.size() < 6)
            .map(|g| g.members.iter().cloned().collect())
            .collect();
        let recorded: Vec<BTreeSet<GuestId>> = controller
            .applied()
            .iter()
            .filter(|r| r.step == RelaxationStep::UndersizedGroup)
            .map(|r| r.guests.iter().cloned().collect())
            .collect();
        assert_eq!(recorded, short);
    }

    #[test]
    fn like_minded_guests_end_up_together() {
        let mut profiles = roster(4);
        profiles[0].categorical.humor_type = HumorType::Dark;
        profiles[3].categorical.humor_type = HumorType::Dark;
        profiles[1].categorical.humor_type = HumorType::Silly;
        profiles[2].categorical.humor_type = HumorType::Silly;
        let (outcome, _) = run(&profiles, 2, true, 6);
        let groups: Vec<Vec<&str>> = outcome
            .groups
            .iter()
            .map(|g| {
                let mut ids: Vec<_> = g.members.iter().map(GuestId::as_str).collect();
                ids.sort();
                ids
            })
            .collect();
        assert!(groups.contains(&vec!["g00", "g03"]));
        assert!(groups.contains(&vec!["g01", "g02"]));
    }

    #[test]
    fn average_score_divides_by_pair_count() {
        let group = Group {
            number: 1,
            members: roster(3).into_iter().map(|p| p.id).collect(),
            score: 6.0,
        };
        assert_eq!(group.average_score(), 2.0);
    }
}
