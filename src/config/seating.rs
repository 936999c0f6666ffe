//! Seating engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::seating::{CompatibilityWeights, SeatingPolicy, MAX_GROUP_SIZE};

/// Seating engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingConfig {
    /// Group size used when a request names none
    #[serde(default = "default_group_size")]
    pub default_group_size: u32,

    /// Fraction of the group size from which a remainder keeps its own group
    #[serde(default = "default_remainder_threshold")]
    pub remainder_threshold: f64,

    /// Extra guests a group may take when relaxation is allowed
    #[serde(default = "default_max_oversize")]
    pub max_oversize: u32,

    /// Member-swap improvement sweeps
    #[serde(default = "default_swap_passes")]
    pub swap_passes: u32,

    /// Upper bound on one AI refinement call, in seconds
    #[serde(default = "default_ai_timeout")]
    pub ai_timeout_secs: u64,

    /// Compatibility scoring weights
    #[serde(default)]
    pub weights: CompatibilityWeights,
}

impl SeatingConfig {
    /// Get AI refinement timeout as Duration
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    /// The engine policy these settings describe
    pub fn policy(&self) -> SeatingPolicy {
        SeatingPolicy {
            weights: self.weights.clone(),
            remainder_threshold: self.remainder_threshold,
            max_oversize: self.max_oversize,
            swap_passes: self.swap_passes,
        }
    }

    /// Validate seating configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_group_size == 0 || self.default_group_size > MAX_GROUP_SIZE {
            return Err(ValidationError::InvalidGroupSize {
                max: MAX_GROUP_SIZE,
                actual: self.default_group_size,
            });
        }
        if self.ai_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("seating.ai_timeout_secs"));
        }
        self.policy()
            .validate()
            .map_err(|e| ValidationError::InvalidSeatingPolicy(e.to_string()))
    }
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            default_group_size: default_group_size(),
            remainder_threshold: default_remainder_threshold(),
            max_oversize: default_max_oversize(),
            swap_passes: default_swap_passes(),
            ai_timeout_secs: default_ai_timeout(),
            weights: CompatibilityWeights::default(),
        }
    }
}

fn default_group_size() -> u32 {
    6
}

fn default_remainder_threshold() -> f64 {
    0.5
}

fn default_max_oversize() -> u32 {
    1
}

fn default_swap_passes() -> u32 {
    2
}

fn default_ai_timeout() -> u64 {
    20
}
