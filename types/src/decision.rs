//! Decision and official-source enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The certified outcome of a motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The motion passed its majority rule.
    Adopted,
    /// The motion failed its majority rule (ties included).
    Rejected,
    /// Quorum was evaluated and not met; majority is irrelevant.
    NoQuorum,
    /// No ballot or manual count was recorded at all.
    NoVotes,
    /// No vote policy is attached to the motion or its meeting.
    NoPolicy,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adopted => "adopted",
            Self::Rejected => "rejected",
            Self::NoQuorum => "no_quorum",
            Self::NoVotes => "no_votes",
            Self::NoPolicy => "no_policy",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tally source a certified result was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficialSource {
    /// Closed, internally consistent manual count (degraded mode).
    Manual,
    /// Aggregated electronic ballots.
    Evote,
}

impl OfficialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Evote => "evote",
        }
    }
}

impl fmt::Display for OfficialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
