//! Tunables shared by the partitioner and the proposal validator.

use serde::{Deserialize, Serialize};

use super::compatibility::CompatibilityWeights;
use crate::domain::foundation::ValidationError;

/// Largest group size accepted from callers.
pub const MAX_GROUP_SIZE: u32 = 64;

/// Engine-wide seating policy, usually loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatingPolicy {
    pub weights: CompatibilityWeights,

    /// A remainder of at least `remainder_threshold * group_size` guests is
    /// kept as its own undersized group; smaller remainders are spread over
    /// existing groups.
    pub remainder_threshold: f64,

    /// How many guests beyond the group size a group may grow to when
    /// relaxation is allowed.
    pub max_oversize: u32,

    /// Member-swap improvement sweeps run after greedy construction.
    pub swap_passes: u32,
}

impl Default for SeatingPolicy {
    fn default() -> Self {
        Self {
            weights: CompatibilityWeights::default(),
            remainder_threshold: 0.5,
            max_oversize: 1,
            swap_passes: 2,
        }
    }
}

impl SeatingPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weights.validate()?;
        if !(self.remainder_threshold > 0.0 && self.remainder_threshold <= 1.0) {
            return Err(ValidationError::invalid_format(
                "remainder_threshold",
                "must be in (0, 1]",
            ));
        }
        if self.max_oversize > 1 {
            return Err(ValidationError::out_of_range(
                "max_oversize",
                0,
                1,
                i64::from(self.max_oversize),
            ));
        }
        if self.swap_passes > 50 {
            return Err(ValidationError::out_of_range(
                "swap_passes",
                0,
                50,
                i64::from(self.swap_passes),
            ));
        }
        Ok(())
    }

    /// Largest group a run may form: the target size, plus `max_oversize`
    /// when relaxation is allowed, and never more than the largest table.
    pub fn group_limit(&self, options: RunOptions, largest_table: u32) -> u32 {
        let limit = if options.allow_relaxation {
            options.group_size + self.max_oversize
        } else {
            options.group_size
        };
        limit.min(largest_table)
    }
}

/// Per-request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub group_size: u32,
    pub allow_relaxation: bool,
}

impl RunOptions {
    pub fn new(group_size: u32, allow_relaxation: bool) -> Result<Self, ValidationError> {
        if group_size == 0 || group_size > MAX_GROUP_SIZE {
            return Err(ValidationError::out_of_range(
                "group_size",
                1,
                i64::from(MAX_GROUP_SIZE),
                i64::from(group_size),
            ));
        }
        Ok(Self {
            group_size,
            allow_relaxation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        assert!(SeatingPolicy::default().validate().is_ok());
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        for remainder_threshold in [0.0, 1.5, f64::NAN] {
            let policy = SeatingPolicy {
                remainder_threshold,
                ..Default::default()
            };
            assert!(policy.validate().is_err());
        }
    }

    #[test]
    fn oversize_beyond_one_guest_is_rejected() {
        let policy = SeatingPolicy {
            max_oversize: 3,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
        let policy = SeatingPolicy {
            max_oversize: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn group_limit_respects_mode_and_tables() {
        let policy = SeatingPolicy::default();
        let relaxed = RunOptions::new(6, true).unwrap();
        let strict = RunOptions::new(6, false).unwrap();
        assert_eq!(policy.group_limit(relaxed, 10), 7);
        assert_eq!(policy.group_limit(strict, 10), 6);
        assert_eq!(policy.group_limit(relaxed, 6), 6);
        assert_eq!(policy.group_limit(strict, 4), 4);
    }

    #[test]
    fn group_size_bounds() {
        assert!(RunOptions::new(0, true).is_err());
        assert!(RunOptions::new(MAX_GROUP_SIZE + 1, true).is_err());
        assert_eq!(RunOptions::new(6, false).unwrap().group_size, 6);
    }
}
