//! Quorum evaluation.
//!
//! Given attendance and eligibility aggregates and a quorum policy,
//! decides whether the minimum participation is reached. Supports the
//! three policy modes (single, evolving, double), proxy and remote
//! counting flags, and late-arrival exclusion when evaluating quorum for
//! a specific motion.

use crate::error::EngineError;
use plenum_store::{AttendanceStore, MemberStore};
use plenum_types::{
    AttendanceMode, Context, MeetingId, QuorumBasis, QuorumMode, QuorumPolicy, Timestamp,
};
use plenum_utils::format_percent;
use serde::{Deserialize, Serialize};

/// One evaluated quorum dimension (a double policy has two).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuorumDimension {
    pub basis: QuorumBasis,
    pub numerator: f64,
    pub denominator: f64,
    pub ratio: f64,
    pub threshold: f64,
    pub met: bool,
}

/// The outcome of an applied quorum policy.
///
/// `ratio` and `threshold` mirror the first dimension; `dimensions` holds
/// every evaluated dimension for double policies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuorumOutcome {
    pub met: bool,
    pub ratio: f64,
    pub threshold: f64,
    pub convocation_no: u8,
    pub counted_modes: Vec<AttendanceMode>,
    pub late_exclusion: bool,
    pub dimensions: Vec<QuorumDimension>,
    pub justification: String,
}

/// Quorum evaluation result.
///
/// `NotApplicable` (no policy attached) is distinct from an evaluated
/// outcome with `met = false`: a missing policy never reads as a failed
/// or passed quorum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuorumResult {
    NotApplicable,
    Evaluated(QuorumOutcome),
}

impl QuorumResult {
    pub fn applied(&self) -> bool {
        matches!(self, Self::Evaluated(_))
    }

    pub fn met(&self) -> Option<bool> {
        match self {
            Self::NotApplicable => None,
            Self::Evaluated(outcome) => Some(outcome.met),
        }
    }

    /// Whether this result forces a motion to fail regardless of its
    /// majority: quorum was evaluated and not met.
    pub fn blocks_adoption(&self) -> bool {
        matches!(self, Self::Evaluated(outcome) if !outcome.met)
    }

    pub fn outcome(&self) -> Option<&QuorumOutcome> {
        match self {
            Self::NotApplicable => None,
            Self::Evaluated(outcome) => Some(outcome),
        }
    }
}

/// Evaluates quorum policies against attendance and member aggregates.
pub struct QuorumEvaluator<'a> {
    attendance: &'a dyn AttendanceStore,
    members: &'a dyn MemberStore,
}

impl<'a> QuorumEvaluator<'a> {
    pub fn new(attendance: &'a dyn AttendanceStore, members: &'a dyn MemberStore) -> Self {
        Self {
            attendance,
            members,
        }
    }

    /// Evaluate a quorum policy for a meeting.
    ///
    /// `late_cutoff` is the motion's opening time when evaluating quorum
    /// for a specific motion: members checked in strictly after it do not
    /// count toward that motion's quorum. Absent for whole-meeting quorum.
    pub fn evaluate(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        convocation_no: u8,
        policy: Option<&QuorumPolicy>,
        late_cutoff: Option<Timestamp>,
    ) -> Result<QuorumResult, EngineError> {
        let Some(policy) = policy else {
            return Ok(QuorumResult::NotApplicable);
        };
        policy
            .validate()
            .map_err(|e| EngineError::InvalidInput(e.to_string()))?;

        let modes = policy.counted_modes();
        let threshold = effective_threshold(policy, convocation_no);
        let first = self.dimension(ctx, meeting_id, &modes, late_cutoff, policy.basis, threshold)?;

        let mut dimensions = vec![first];
        let mut unconfigured_second = false;
        let met = match policy.mode {
            QuorumMode::Single | QuorumMode::Evolving => dimensions[0].met,
            QuorumMode::Double => match (policy.basis2, policy.threshold2) {
                (Some(basis2), Some(threshold2)) => {
                    let second =
                        self.dimension(ctx, meeting_id, &modes, late_cutoff, basis2, threshold2)?;
                    let met = dimensions[0].met && second.met;
                    dimensions.push(second);
                    met
                }
                // Half-configured double policy: fail safe, never fail open.
                _ => {
                    unconfigured_second = true;
                    false
                }
            },
        };

        let justification = justify(
            policy,
            convocation_no,
            &modes,
            late_cutoff.is_some(),
            &dimensions,
            unconfigured_second,
            met,
        );

        Ok(QuorumResult::Evaluated(QuorumOutcome {
            met,
            ratio: dimensions[0].ratio,
            threshold: dimensions[0].threshold,
            convocation_no,
            counted_modes: modes,
            late_exclusion: late_cutoff.is_some(),
            dimensions,
            justification,
        }))
    }

    fn dimension(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
        basis: QuorumBasis,
        threshold: f64,
    ) -> Result<QuorumDimension, EngineError> {
        let (numerator, denominator) = match basis {
            QuorumBasis::EligibleMembers => {
                let present =
                    self.attendance
                        .count_present(meeting_id, ctx.tenant_id, modes, late_cutoff)?;
                let eligible = self.members.count_active(ctx.tenant_id)?;
                (present as f64, eligible as f64)
            }
            QuorumBasis::EligibleWeight => {
                let present = self.attendance.sum_present_weight(
                    meeting_id,
                    ctx.tenant_id,
                    modes,
                    late_cutoff,
                )?;
                let eligible = self.members.sum_active_weight(ctx.tenant_id)?;
                (present, eligible)
            }
        };

        // Empty denominator can never satisfy a quorum.
        let ratio = if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        };
        let met = denominator > 0.0 && ratio >= threshold;

        Ok(QuorumDimension {
            basis,
            numerator,
            denominator,
            ratio,
            threshold,
            met,
        })
    }
}

/// The threshold in force for this convocation: evolving policies may
/// relax on the second call.
fn effective_threshold(policy: &QuorumPolicy, convocation_no: u8) -> f64 {
    match (policy.mode, convocation_no, policy.threshold_call2) {
        (QuorumMode::Evolving, 2, Some(relaxed)) => relaxed,
        _ => policy.threshold,
    }
}

fn justify(
    policy: &QuorumPolicy,
    convocation_no: u8,
    modes: &[AttendanceMode],
    late_exclusion: bool,
    dimensions: &[QuorumDimension],
    unconfigured_second: bool,
    met: bool,
) -> String {
    let mode_list = modes
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("+");
    let mut parts: Vec<String> = dimensions.iter().map(describe_dimension).collect();
    if unconfigured_second {
        parts.push("second dimension unconfigured, treated as not met".to_string());
    }
    format!(
        "quorum {} (call {}, modes {}, late arrivals {}): {} -> {}",
        policy.mode.as_str(),
        convocation_no,
        mode_list,
        if late_exclusion {
            "excluded"
        } else {
            "not excluded"
        },
        parts.join("; "),
        if met { "met" } else { "not met" },
    )
}

fn describe_dimension(dim: &QuorumDimension) -> String {
    let counts = match dim.basis {
        QuorumBasis::EligibleMembers => {
            format!("{:.0}/{:.0}", dim.numerator, dim.denominator)
        }
        QuorumBasis::EligibleWeight => {
            format!("{:.2}/{:.2}", dim.numerator, dim.denominator)
        }
    };
    format!(
        "{} {} = {} {} {}",
        dim.basis.as_str(),
        counts,
        format_percent(dim.ratio),
        if dim.met { ">=" } else { "<" },
        format_percent(dim.threshold),
    )
}
