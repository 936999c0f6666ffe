//! Advisor proposals and their validation.
//!
//! An external advisor may suggest a grouping. A proposal is only adopted
//! when it covers the roster exactly and respects the hard limits of the run;
//! otherwise the heuristic grouping stands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::compatibility::CompatibilityMatrix;
use super::policy::{RunOptions, SeatingPolicy};
use super::profile::{GuestProfile, TraitScale};
use crate::domain::foundation::GuestId;

/// A grouping suggested by an advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingProposal {
    pub groups: Vec<Vec<GuestId>>,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// What an advisor is told about a guest. Contact details are never shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDigest {
    pub id: GuestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub traits: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_seat_with: Vec<GuestId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not_seat_with: Vec<GuestId>,
}

impl ProfileDigest {
    pub fn from_profile(profile: &GuestProfile) -> Self {
        let c = &profile.categorical;
        let n = &profile.numeric;
        let scale = |s: &TraitScale| s.is_reported().then(|| s.value());
        let traits = serde_json::json!({
            "conversationStyle": c.conversation_style,
            "preferredTopic": c.preferred_topic,
            "groupDynamic": c.group_dynamic,
            "humorType": c.humor_type,
            "wardrobeStyle": c.wardrobe_style,
            "meetingPriority": c.meeting_priority,
            "relationshipStatus": profile.demographics.relationship_status,
            "hasChildren": profile.demographics.has_children,
            "introversion": scale(&n.introversion),
            "aloneTime": scale(&n.alone_time),
            "familyOrientation": scale(&n.family_orientation),
            "spirituality": scale(&n.spirituality),
            "humorIntensity": scale(&n.humor_intensity),
            "spendingTier": profile.spending_tier,
            "dietary": profile.dietary.tag,
        });
        Self {
            id: profile.id.clone(),
            age: profile.demographics.age,
            traits,
            must_seat_with: profile.must_seat_with.iter().cloned().collect(),
            must_not_seat_with: profile.must_not_seat_with.iter().cloned().collect(),
        }
    }
}

/// Why a proposal was not adopted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProposalRejection {
    #[error("proposal contains no groups")]
    Empty,

    #[error("proposal contains an empty group")]
    EmptyGroup,

    #[error("unknown guest '{0}' in proposal")]
    UnknownGuest(GuestId),

    #[error("guest '{0}' appears in more than one group")]
    DuplicateGuest(GuestId),

    #[error("{0} guest(s) missing from proposal")]
    MissingGuests(usize),

    #[error("group of {size} exceeds the allowed size of {limit}")]
    GroupTooLarge { size: usize, limit: usize },

    #[error("'{0}' and '{1}' must not share a group")]
    SeparationViolated(GuestId, GuestId),

    #[error("group of {size} is below the target of {target}; strict runs allow none")]
    GroupTooSmall { size: usize, target: usize },
}

/// A proposal translated to matrix positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProposal {
    pub groups: Vec<Vec<usize>>,
    /// Indices of groups larger than the target size.
    pub oversized: Vec<usize>,
}

/// Checks advisor proposals against the roster and run limits.
pub struct ProposalValidator;

impl ProposalValidator {
    /// Validates `proposal` for one run.
    ///
    /// Groups may hold at most [`SeatingPolicy::group_limit`] guests. Strict
    /// runs also reject must-not-seat-with pairs and any group below the
    /// target size, the same rungs the heuristic refuses.
    pub fn validate(
        proposal: &GroupingProposal,
        matrix: &CompatibilityMatrix,
        options: RunOptions,
        policy: &SeatingPolicy,
        largest_table: u32,
    ) -> Result<ValidatedProposal, ProposalRejection> {
        if proposal.groups.is_empty() {
            return Err(ProposalRejection::Empty);
        }

        let g = options.group_size as usize;
        let limit = policy.group_limit(options, largest_table) as usize;

        let mut seen = vec![false; matrix.len()];
        let mut groups = Vec::with_capacity(proposal.groups.len());
        let mut oversized = Vec::new();

        for (k, members) in proposal.groups.iter().enumerate() {
            if members.is_empty() {
                return Err(ProposalRejection::EmptyGroup);
            }
            if members.len() > limit {
                return Err(ProposalRejection::GroupTooLarge {
                    size: members.len(),
                    limit,
                });
            }
            let mut positions = Vec::with_capacity(members.len());
            for id in members {
                let p = matrix
                    .position(id)
                    .ok_or_else(|| ProposalRejection::UnknownGuest(id.clone()))?;
                if seen[p] {
                    return Err(ProposalRejection::DuplicateGuest(id.clone()));
                }
                seen[p] = true;
                positions.push(p);
            }
            if !options.allow_relaxation {
                if members.len() < g {
                    return Err(ProposalRejection::GroupTooSmall {
                        size: members.len(),
                        target: g,
                    });
                }
                if let Some(&(i, j)) = matrix.apart_pairs(&positions).first() {
                    return Err(ProposalRejection::SeparationViolated(
                        matrix.id(i).clone(),
                        matrix.id(j).clone(),
                    ));
                }
            }
            if positions.len() > g {
                oversized.push(k);
            }
            groups.push(positions);
        }

        let missing = seen.iter().filter(|s| !**s).count();
        if missing > 0 {
            return Err(ProposalRejection::MissingGuests(missing));
        }

        Ok(ValidatedProposal { groups, oversized })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seating::compatibility::CompatibilityScorer;

    fn id(raw: &str) -> GuestId {
        GuestId::new(raw).unwrap()
    }

    fn profiles() -> Vec<GuestProfile> {
        let mut p: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|raw| GuestProfile::blank(id(raw)))
            .collect();
        p[0].must_not_seat_with.insert(id("b"));
        p
    }

    fn validate(groups: &[&[&str]], relax: bool) -> Result<ValidatedProposal, ProposalRejection> {
        let policy = SeatingPolicy::default();
        let matrix = CompatibilityMatrix::build(
            &profiles(),
            &CompatibilityScorer::new(policy.weights.clone()),
        );
        let proposal = GroupingProposal {
            groups: groups
                .iter()
                .map(|g| g.iter().map(|raw| id(raw)).collect())
                .collect(),
            rationale: None,
        };
        ProposalValidator::validate(
            &proposal,
            &matrix,
            RunOptions::new(2, relax).unwrap(),
            &policy,
            6,
        )
    }

    #[test]
    fn valid_proposal_maps_to_positions() {
        let v = validate(&[&["a", "c"], &["b", "d"], &["e"]], true).unwrap();
        assert_eq!(v.groups, vec![vec![0, 2], vec![1, 3], vec![4]]);
        assert!(v.oversized.is_empty());
    }

    #[test]
    fn oversize_only_when_relaxed() {
        let groups: &[&[&str]] = &[&["a", "c", "e"], &["b", "d"]];
        assert_eq!(
            validate(groups, false),
            Err(ProposalRejection::GroupTooLarge { size: 3, limit: 2 })
        );
        assert_eq!(validate(groups, true).unwrap().oversized, vec![0]);
    }

    #[test]
    fn unknown_duplicate_and_missing_guests_are_rejected() {
        assert_eq!(
            validate(&[&["a", "z"]], true),
            Err(ProposalRejection::UnknownGuest(id("z")))
        );
        assert_eq!(
            validate(&[&["a", "c"], &["c", "d"]], true),
            Err(ProposalRejection::DuplicateGuest(id("c")))
        );
        assert_eq!(
            validate(&[&["a", "c"], &["b", "d"]], true),
            Err(ProposalRejection::MissingGuests(1))
        );
        assert_eq!(validate(&[&[]], true), Err(ProposalRejection::EmptyGroup));
        assert_eq!(validate(&[], true), Err(ProposalRejection::Empty));
    }

    #[test]
    fn strict_runs_reject_any_undersized_group() {
        let groups: &[&[&str]] = &[&["a", "c"], &["b", "d"], &["e"]];
        assert_eq!(
            validate(groups, false),
            Err(ProposalRejection::GroupTooSmall { size: 1, target: 2 })
        );
        assert!(validate(groups, true).is_ok());
    }

    #[test]
    fn strict_runs_reject_forbidden_pairs() {
        let groups: &[&[&str]] = &[&["a", "b"], &["c", "d"], &["e"]];
        assert_eq!(
            validate(groups, false),
            Err(ProposalRejection::SeparationViolated(id("a"), id("b")))
        );
        assert!(validate(groups, true).is_ok());
    }

    #[test]
    fn digest_omits_contact_details() {
        let mut profile = GuestProfile::blank(id("a"));
        profile.contact.email = Some("a@example.com".into());
        let json = serde_json::to_string(&ProfileDigest::from_profile(&profile)).unwrap();
        assert!(!json.contains("example.com"));
        assert!(json.contains("\"id\":\"a\""));
    }
}
