//! Majority evaluation.
//!
//! Pure computation: weighted tallies plus a vote policy in, adoption
//! decision out. Quorum gates majority: a motion cannot pass without
//! quorum even if the few present unanimously approve.

use crate::error::EngineError;
use crate::quorum::QuorumResult;
use plenum_types::{VoteBase, VotePolicy};
use serde::{Deserialize, Serialize};

/// Effective denominators are never allowed to reach exactly zero.
const EPSILON: f64 = 1e-9;

/// Weighted inputs for one motion's majority evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MajorityInput {
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    /// Weight of expressed votes (for + against + abstain).
    pub expressed_weight: f64,
    /// Summed voting power of all eligible members.
    pub eligible_weight: f64,
}

/// The outcome of an applied vote policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MajorityOutcome {
    pub adopted: bool,
    pub ratio: f64,
    pub threshold: f64,
    pub base: VoteBase,
    /// The denominator weight the ratio was computed against.
    pub base_weight: f64,
    /// True when an evaluated quorum forced `adopted = false`.
    pub quorum_gated: bool,
    /// Against weight for reporting. Includes abstention weight when the
    /// policy says `abstention_as_against`; the adoption ratio never does.
    pub reported_against_weight: f64,
}

/// Majority evaluation result. `NoPolicy` is an explicit outcome, never
/// silently treated as adopted or rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MajorityResult {
    NoPolicy,
    Evaluated(MajorityOutcome),
}

impl MajorityResult {
    pub fn applied(&self) -> bool {
        matches!(self, Self::Evaluated(_))
    }

    pub fn adopted(&self) -> Option<bool> {
        match self {
            Self::NoPolicy => None,
            Self::Evaluated(outcome) => Some(outcome.adopted),
        }
    }

    pub fn outcome(&self) -> Option<&MajorityOutcome> {
        match self {
            Self::NoPolicy => None,
            Self::Evaluated(outcome) => Some(outcome),
        }
    }
}

/// Evaluates vote policies against weighted tallies.
pub struct MajorityEvaluator;

impl MajorityEvaluator {
    /// Evaluate a vote policy.
    ///
    /// `quorum` is the quorum result for the same motion; when it was
    /// evaluated and not met, adoption is forced to false regardless of
    /// the ratio.
    pub fn evaluate(
        &self,
        input: &MajorityInput,
        policy: Option<&VotePolicy>,
        quorum: &QuorumResult,
    ) -> Result<MajorityResult, EngineError> {
        let Some(policy) = policy else {
            return Ok(MajorityResult::NoPolicy);
        };
        policy
            .validate()
            .map_err(|e| EngineError::InvalidInput(e.to_string()))?;

        let base_weight = match policy.base {
            VoteBase::Expressed | VoteBase::Present => input.expressed_weight,
            VoteBase::Eligible => input.eligible_weight,
        };
        let ratio = input.for_weight / base_weight.max(EPSILON);

        let quorum_gated = quorum.blocks_adoption();
        let adopted = !quorum_gated
            && base_weight > 0.0
            && input.expressed_weight > 0.0
            && ratio >= policy.threshold;

        let reported_against_weight = if policy.abstention_as_against {
            input.against_weight + input.abstain_weight
        } else {
            input.against_weight
        };

        Ok(MajorityResult::Evaluated(MajorityOutcome {
            adopted,
            ratio,
            threshold: policy.threshold,
            base: policy.base,
            base_weight,
            quorum_gated,
            reported_against_weight,
        }))
    }
}
