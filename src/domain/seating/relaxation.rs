//! Relaxation Controller - the ordered ladder of permitted constraint relaxations.
//!
//! Rungs, from least to most disruptive:
//!
//! 1. allow an undersized terminal group
//! 2. allow an oversized group
//! 3. allow a must-not-seat-with pair to share a group
//! 4. split a group across two tables of one restaurant
//! 5. leave the excess of a group unassigned
//!
//! When relaxation is disabled every rung is refused; the stage that needed
//! it records an [`Infeasibility`] and stops.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::GuestId;

/// One rung of the relaxation ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationStep {
    UndersizedGroup,
    OversizedGroup,
    SeparationHintViolated,
    SplitAcrossTables,
    ExcessUnassigned,
}

impl RelaxationStep {
    /// Position on the ladder, starting at 1.
    pub fn rung(&self) -> u8 {
        match self {
            RelaxationStep::UndersizedGroup => 1,
            RelaxationStep::OversizedGroup => 2,
            RelaxationStep::SeparationHintViolated => 3,
            RelaxationStep::SplitAcrossTables => 4,
            RelaxationStep::ExcessUnassigned => 5,
        }
    }
}

impl fmt::Display for RelaxationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelaxationStep::UndersizedGroup => "undersized group",
            RelaxationStep::OversizedGroup => "oversized group",
            RelaxationStep::SeparationHintViolated => "must-not-seat-with pair seated together",
            RelaxationStep::SplitAcrossTables => "group split across tables",
            RelaxationStep::ExcessUnassigned => "excess guests left unassigned",
        };
        write!(f, "{}", label)
    }
}

/// A relaxation that was actually applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRelaxation {
    pub step: RelaxationStep,
    pub rung: u8,
    pub description: String,
    pub guests: Vec<GuestId>,
}

/// Pipeline stage that can run out of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Partition,
    Allocation,
}

/// Why a strict run stopped short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infeasibility {
    pub stage: Stage,
    /// The relaxation that would have been needed to continue.
    pub refused: RelaxationStep,
    pub description: String,
    pub guests: Vec<GuestId>,
}

/// Tracks which relaxations a run may use and which it did.
#[derive(Debug, Clone, Default)]
pub struct RelaxationController {
    allow: bool,
    applied: Vec<AppliedRelaxation>,
    infeasibilities: Vec<Infeasibility>,
}

impl RelaxationController {
    pub fn new(allow_relaxation: bool) -> Self {
        Self {
            allow: allow_relaxation,
            ..Self::default()
        }
    }

    /// Whether relaxations are allowed at all.
    pub fn allows_relaxation(&self) -> bool {
        self.allow
    }

    /// Whether `step` may be applied.
    ///
    /// Every rung is available when relaxation is allowed; lower rungs are
    /// still preferred because each stage tries them first.
    pub fn permits(&self, _step: RelaxationStep) -> bool {
        self.allow
    }

    /// Records a relaxation. Ignored when relaxation is disabled.
    pub fn record(
        &mut self,
        step: RelaxationStep,
        description: impl Into<String>,
        guests: Vec<GuestId>,
    ) {
        if !self.allow {
            return;
        }
        self.applied.push(AppliedRelaxation {
            step,
            rung: step.rung(),
            description: description.into(),
            guests,
        });
    }

    /// Records that `stage` stopped because `refused` was not permitted.
    pub fn halt(
        &mut self,
        stage: Stage,
        refused: RelaxationStep,
        description: impl Into<String>,
        guests: Vec<GuestId>,
    ) {
        self.infeasibilities.push(Infeasibility {
            stage,
            refused,
            description: description.into(),
            guests,
        });
    }

    /// True once `stage` has stopped.
    pub fn is_halted(&self, stage: Stage) -> bool {
        self.infeasibilities.iter().any(|i| i.stage == stage)
    }

    pub fn applied(&self) -> &[AppliedRelaxation] {
        &self.applied
    }

    pub fn infeasibilities(&self) -> &[Infeasibility] {
        &self.infeasibilities
    }

    pub fn into_parts(self) -> (Vec<AppliedRelaxation>, Vec<Infeasibility>) {
        (self.applied, self.infeasibilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<GuestId> {
        raw.iter().map(|id| GuestId::new(*id).unwrap()).collect()
    }

    #[test]
    fn rungs_follow_ladder_order() {
        let steps = [
            RelaxationStep::UndersizedGroup,
            RelaxationStep::OversizedGroup,
            RelaxationStep::SeparationHintViolated,
            RelaxationStep::SplitAcrossTables,
            RelaxationStep::ExcessUnassigned,
        ];
        let rungs: Vec<u8> = steps.iter().map(RelaxationStep::rung).collect();
        assert_eq!(rungs, vec![1, 2, 3, 4, 5]);
        assert!(RelaxationStep::UndersizedGroup < RelaxationStep::ExcessUnassigned);
    }

    #[test]
    fn relaxed_controller_records_steps() {
        let mut c = RelaxationController::new(true);
        assert!(c.permits(RelaxationStep::SplitAcrossTables));
        c.record(RelaxationStep::OversizedGroup, "group 1 grew to 7", ids(&["a"]));

        assert_eq!(c.applied().len(), 1);
        assert_eq!(c.applied()[0].rung, 2);
        assert!(c.infeasibilities().is_empty());
    }

    #[test]
    fn strict_controller_refuses_and_halts() {
        let mut c = RelaxationController::new(false);
        assert!(!c.permits(RelaxationStep::UndersizedGroup));
        c.record(RelaxationStep::UndersizedGroup, "ignored", vec![]);
        assert!(c.applied().is_empty());

        c.halt(
            Stage::Partition,
            RelaxationStep::UndersizedGroup,
            "2 guests left over",
            ids(&["x", "y"]),
        );
        assert!(c.is_halted(Stage::Partition));
        assert!(!c.is_halted(Stage::Allocation));

        let (applied, infeasible) = c.into_parts();
        assert!(applied.is_empty());
        assert_eq!(infeasible[0].guests.len(), 2);
    }

    #[test]
    fn step_serializes_snake_case() {
        let json = serde_json::to_string(&RelaxationStep::SplitAcrossTables).unwrap();
        assert_eq!(json, "\"split_across_tables\"");
    }
}
