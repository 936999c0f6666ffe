//! Compatibility Scorer - pairwise scores between guest profiles.
//!
//! A score of 0 means "nothing known either way". Positive scores favour
//! seating a pair together, negative scores advise against it. Every term is
//! symmetric, so `score(a, b) == score(b, a)` holds exactly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::profile::{DietaryTag, GuestProfile};
use crate::domain::foundation::{GuestId, ValidationError};

/// Tunable weights of the compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityWeights {
    /// Added per categorical field both guests answered identically.
    pub categorical_match: f64,
    /// Scale of each numeric trait term.
    pub numeric_closeness: f64,
    /// Scale difference at which a numeric term turns from positive to negative.
    pub closeness_tolerance: f64,
    /// Scale of the spending tier term (tolerance of one tier).
    pub spending_closeness: f64,
    /// Subtracted per year of age gap beyond `age_tolerance_years`.
    pub age_gap_per_year: f64,
    pub age_tolerance_years: u8,
    /// Added when both guests follow the same (restrictive) diet.
    pub dietary_match: f64,
    /// Applied, scaled by severity, when diets clash. Expected to be negative.
    pub dietary_conflict: f64,
    /// Replaces the computed score for a must-seat-with pair.
    pub must_seat_with_bonus: f64,
    /// Replaces the computed score for a must-not-seat-with pair.
    pub must_not_seat_with_penalty: f64,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            categorical_match: 2.0,
            numeric_closeness: 1.0,
            closeness_tolerance: 2.0,
            spending_closeness: 1.0,
            age_gap_per_year: 0.1,
            age_tolerance_years: 5,
            dietary_match: 0.5,
            dietary_conflict: -8.0,
            must_seat_with_bonus: 1000.0,
            must_not_seat_with_penalty: -1000.0,
        }
    }
}

impl CompatibilityWeights {
    /// Checks the weights describe a usable scoring policy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let finite = [
            ("categorical_match", self.categorical_match),
            ("numeric_closeness", self.numeric_closeness),
            ("closeness_tolerance", self.closeness_tolerance),
            ("spending_closeness", self.spending_closeness),
            ("age_gap_per_year", self.age_gap_per_year),
            ("dietary_match", self.dietary_match),
            ("dietary_conflict", self.dietary_conflict),
            ("must_seat_with_bonus", self.must_seat_with_bonus),
            ("must_not_seat_with_penalty", self.must_not_seat_with_penalty),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ValidationError::invalid_format(field, "must be a finite number"));
            }
        }
        if self.closeness_tolerance <= 0.0 {
            return Err(ValidationError::invalid_format(
                "closeness_tolerance",
                "must be positive",
            ));
        }
        if self.dietary_conflict > 0.0 {
            return Err(ValidationError::invalid_format(
                "dietary_conflict",
                "must not be positive",
            ));
        }
        if self.must_seat_with_bonus <= 0.0 || self.must_not_seat_with_penalty >= 0.0 {
            return Err(ValidationError::invalid_format(
                "seating_hints",
                "bonus must be positive and penalty negative",
            ));
        }
        Ok(())
    }
}

/// Explicit seating hint between two guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairHint {
    None,
    Together,
    Apart,
}

impl PairHint {
    /// Hint for a pair, honouring either side's wishes.
    ///
    /// A pair that is both requested and forbidden is kept apart.
    pub fn between(a: &GuestProfile, b: &GuestProfile) -> Self {
        if a.must_not_seat_with.contains(&b.id) || b.must_not_seat_with.contains(&a.id) {
            PairHint::Apart
        } else if a.must_seat_with.contains(&b.id) || b.must_seat_with.contains(&a.id) {
            PairHint::Together
        } else {
            PairHint::None
        }
    }
}

/// Computes pairwise compatibility.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: CompatibilityWeights,
}

impl CompatibilityScorer {
    pub fn new(weights: CompatibilityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CompatibilityWeights {
        &self.weights
    }

    /// Pairwise score including seating hints.
    pub fn score(&self, a: &GuestProfile, b: &GuestProfile) -> f64 {
        self.score_with_hint(a, b, PairHint::between(a, b))
    }

    fn score_with_hint(&self, a: &GuestProfile, b: &GuestProfile, hint: PairHint) -> f64 {
        match hint {
            PairHint::Together => self.weights.must_seat_with_bonus,
            PairHint::Apart => self.weights.must_not_seat_with_penalty,
            PairHint::None => self.trait_score(a, b),
        }
    }

    /// Score from traits alone.
    ///
    /// Bounded to half the hint magnitudes, so a hinted pair always ranks
    /// above or below any unhinted one.
    pub fn trait_score(&self, a: &GuestProfile, b: &GuestProfile) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;

        let mut matches = a.categorical.matches_with(&b.categorical);
        let (da, db) = (&a.demographics, &b.demographics);
        if da.relationship_status.is_known() && da.relationship_status == db.relationship_status {
            matches += 1;
        }
        if da.has_children.is_some() && da.has_children == db.has_children {
            matches += 1;
        }
        score += w.categorical_match * f64::from(matches);

        for (sa, sb) in a.numeric.scales().iter().zip(b.numeric.scales().iter()) {
            if sa.is_reported() && sb.is_reported() {
                let gap = (sa.value() - sb.value()).abs();
                score += w.numeric_closeness * (1.0 - gap / w.closeness_tolerance);
            }
        }

        if let (Some(ra), Some(rb)) = (a.spending_tier.rank(), b.spending_tier.rank()) {
            let gap = f64::from(ra.abs_diff(rb));
            score += w.spending_closeness * (1.0 - gap);
        }

        if let (Some(aa), Some(ab)) = (da.age, db.age) {
            let gap = aa.abs_diff(ab).saturating_sub(w.age_tolerance_years);
            score -= w.age_gap_per_year * f64::from(gap);
        }

        let (ta, tb) = (a.dietary.tag, b.dietary.tag);
        if ta.is_known() && tb.is_known() {
            let severity = ta.conflict_severity(&tb);
            if severity > 0.0 {
                score += w.dietary_conflict * severity;
            } else if ta == tb && ta != DietaryTag::NoRestriction {
                score += w.dietary_match;
            }
        }

        let floor = w.must_not_seat_with_penalty / 2.0;
        let ceiling = w.must_seat_with_bonus / 2.0;
        score.clamp(floor, ceiling)
    }
}

/// Precomputed pairwise scores for one roster.
///
/// Guests are addressed by their position in the roster the matrix was built
/// from; only the upper triangle is stored.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    ids: Vec<GuestId>,
    positions: HashMap<GuestId, usize>,
    scores: Vec<f64>,
    hints: Vec<PairHint>,
}

impl CompatibilityMatrix {
    /// Scores every pair of `profiles`.
    pub fn build(profiles: &[GuestProfile], scorer: &CompatibilityScorer) -> Self {
        let n = profiles.len();
        let pairs = n * n.saturating_sub(1) / 2;
        let mut scores = Vec::with_capacity(pairs);
        let mut hints = Vec::with_capacity(pairs);

        for i in 0..n {
            for j in (i + 1)..n {
                let hint = PairHint::between(&profiles[i], &profiles[j]);
                scores.push(scorer.score_with_hint(&profiles[i], &profiles[j], hint));
                hints.push(hint);
            }
        }

        let ids: Vec<GuestId> = profiles.iter().map(|p| p.id.clone()).collect();
        let positions = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

        Self {
            ids,
            positions,
            scores,
            hints,
        }
    }

    /// Number of guests.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Guest id at a position.
    pub fn id(&self, index: usize) -> &GuestId {
        &self.ids[index]
    }

    /// Position of a guest id, if on the roster.
    pub fn position(&self, id: &GuestId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    fn slot(&self, i: usize, j: usize) -> usize {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let n = self.ids.len();
        // Rows before `lo` hold (n-1) + (n-2) + ... + (n-lo) entries.
        lo * (2 * n - lo - 1) / 2 + (hi - lo - 1)
    }

    /// Score between two positions. Zero on the diagonal.
    pub fn score(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.scores[self.slot(i, j)]
    }

    /// Seating hint between two positions.
    pub fn hint(&self, i: usize, j: usize) -> PairHint {
        if i == j {
            return PairHint::None;
        }
        self.hints[self.slot(i, j)]
    }

    /// True when the pair must not share a group.
    pub fn is_apart(&self, i: usize, j: usize) -> bool {
        self.hint(i, j) == PairHint::Apart
    }

    /// Sum of pairwise scores among `members`.
    pub fn aggregate(&self, members: &[usize]) -> f64 {
        let mut total = 0.0;
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                total += self.score(i, j);
            }
        }
        total
    }

    /// Sum of scores between `candidate` and every member.
    pub fn affinity(&self, candidate: usize, members: &[usize]) -> f64 {
        members.iter().map(|&m| self.score(candidate, m)).sum()
    }

    /// Forbidden pairs within `members`, in position order.
    pub fn apart_pairs(&self, members: &[usize]) -> Vec<(usize, usize)> {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        let mut pairs = Vec::new();
        for (k, &i) in sorted.iter().enumerate() {
            for &j in &sorted[k + 1..] {
                if self.is_apart(i, j) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
