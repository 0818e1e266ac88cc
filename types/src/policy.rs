//! Quorum and vote (majority) policies.
//!
//! A policy is an immutable value object attached to a motion directly or
//! inherited from its meeting. Thresholds are fractions in [0, 1].

use crate::attendance::AttendanceMode;
use crate::error::TypeError;
use serde::{Deserialize, Serialize};

/// How the quorum threshold is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumMode {
    /// One threshold, one dimension.
    Single,
    /// Threshold may relax on the second convocation of the same meeting.
    Evolving,
    /// Two dimensions (e.g. headcount AND weight), both must pass.
    Double,
}

impl QuorumMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Evolving => "evolving",
            Self::Double => "double",
        }
    }
}

/// The denominator a quorum ratio is computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumBasis {
    /// Headcount of active members.
    EligibleMembers,
    /// Sum of active members' voting power.
    EligibleWeight,
}

impl QuorumBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EligibleMembers => "eligible_members",
            Self::EligibleWeight => "eligible_weight",
        }
    }
}

/// A quorum policy: minimum participation required for votes to be valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    pub mode: QuorumMode,
    pub basis: QuorumBasis,
    /// Threshold fraction in [0, 1].
    pub threshold: f64,
    /// Relaxed threshold applied on the second convocation
    /// (`mode = Evolving` only).
    pub threshold_call2: Option<f64>,
    /// Second dimension for `mode = Double`. A double policy missing either
    /// field is treated as never satisfiable, not as single.
    pub basis2: Option<QuorumBasis>,
    pub threshold2: Option<f64>,
    /// Count proxy-represented members toward the numerator.
    pub include_proxies: bool,
    /// Count remote attendees toward the numerator.
    pub count_remote: bool,
}

impl QuorumPolicy {
    /// The attendance modes counted toward the numerator.
    pub fn counted_modes(&self) -> Vec<AttendanceMode> {
        let mut modes = vec![AttendanceMode::Present];
        if self.count_remote {
            modes.push(AttendanceMode::Remote);
        }
        if self.include_proxies {
            modes.push(AttendanceMode::Proxy);
        }
        modes
    }

    /// Whether the second dimension of a double policy is fully configured.
    pub fn has_second_dimension(&self) -> bool {
        self.basis2.is_some() && self.threshold2.is_some()
    }

    /// Check the policy invariants: every threshold must be in [0, 1].
    pub fn validate(&self) -> Result<(), TypeError> {
        check_fraction("threshold", self.threshold)?;
        if let Some(t) = self.threshold_call2 {
            check_fraction("threshold_call2", t)?;
        }
        if let Some(t) = self.threshold2 {
            check_fraction("threshold2", t)?;
        }
        Ok(())
    }
}

/// The population a majority ratio is computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteBase {
    /// Weight of expressed votes (for + against + abstain).
    Expressed,
    /// Weight of members present at the vote. Tallied identically to
    /// `Expressed` for adoption purposes.
    Present,
    /// Weight of all eligible members, voting or not.
    Eligible,
}

impl VoteBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expressed => "expressed",
            Self::Present => "present",
            Self::Eligible => "eligible",
        }
    }
}

/// A vote policy: the rule converting tallies into adopted/rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotePolicy {
    pub base: VoteBase,
    /// Threshold fraction in [0, 1] that the for-ratio must reach.
    pub threshold: f64,
    /// Report abstention weight on the against side. Affects reporting
    /// only, never the adoption ratio.
    pub abstention_as_against: bool,
}

impl VotePolicy {
    pub fn validate(&self) -> Result<(), TypeError> {
        check_fraction("threshold", self.threshold)
    }
}

fn check_fraction(field: &str, value: f64) -> Result<(), TypeError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TypeError::ThresholdOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}
