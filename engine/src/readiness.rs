//! Meeting readiness assessment.
//!
//! A meeting may only advance in its lifecycle (e.g. be validated and
//! certified) once nothing blocks it: no motion still open, every closed
//! motion consolidated, and the meeting-level quorum satisfied when one
//! is configured. The report is a pure value; diffing two successive
//! reports yields only the blockers that appeared or cleared, which is
//! what the external notification layer broadcasts.

use crate::error::EngineError;
use crate::quorum::QuorumEvaluator;
use plenum_store::{AttendanceStore, MemberStore, MotionStore};
use plenum_types::{Context, MeetingId, QuorumPolicy};
use plenum_utils::format_percent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable blocker codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerCode {
    MotionsOpen,
    ResultsNotConsolidated,
    QuorumNotMet,
}

impl BlockerCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MotionsOpen => "motions_open",
            Self::ResultsNotConsolidated => "results_not_consolidated",
            Self::QuorumNotMet => "quorum_not_met",
        }
    }
}

impl fmt::Display for BlockerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a meeting can advance, and if not, why.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub can: bool,
    pub codes: Vec<BlockerCode>,
    pub reasons: Vec<String>,
}

impl ReadinessReport {
    /// Blockers that appeared in `next` and blockers that cleared since
    /// `prev`. Unchanged blockers are omitted so notification consumers
    /// never replay the full set.
    pub fn diff(prev: &ReadinessReport, next: &ReadinessReport) -> ReadinessDiff {
        let appeared = next
            .codes
            .iter()
            .filter(|code| !prev.codes.contains(code))
            .copied()
            .collect();
        let cleared = prev
            .codes
            .iter()
            .filter(|code| !next.codes.contains(code))
            .copied()
            .collect();
        ReadinessDiff { appeared, cleared }
    }
}

/// Change between two successive readiness evaluations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessDiff {
    pub appeared: Vec<BlockerCode>,
    pub cleared: Vec<BlockerCode>,
}

impl ReadinessDiff {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.cleared.is_empty()
    }
}

/// Evaluates whether a meeting may advance in its lifecycle.
pub struct Readiness<'a> {
    motions: &'a dyn MotionStore,
    attendance: &'a dyn AttendanceStore,
    members: &'a dyn MemberStore,
}

impl<'a> Readiness<'a> {
    pub fn new(
        motions: &'a dyn MotionStore,
        attendance: &'a dyn AttendanceStore,
        members: &'a dyn MemberStore,
    ) -> Self {
        Self {
            motions,
            attendance,
            members,
        }
    }

    /// Assess the meeting's current blockers.
    ///
    /// `quorum_policy` is the meeting-level policy (no motion cutoff
    /// applies here); pass `None` for meetings without one.
    pub fn assess(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        convocation_no: u8,
        quorum_policy: Option<&QuorumPolicy>,
    ) -> Result<ReadinessReport, EngineError> {
        let mut codes = Vec::new();
        let mut reasons = Vec::new();

        let open = self.motions.count_open_motions(meeting_id)?;
        if open > 0 {
            codes.push(BlockerCode::MotionsOpen);
            reasons.push(format!("{open} motion(s) still open"));
        }

        let undecided = self.motions.count_closed_undecided(meeting_id)?;
        if undecided > 0 {
            codes.push(BlockerCode::ResultsNotConsolidated);
            reasons.push(format!(
                "{undecided} closed motion(s) without a certified result"
            ));
        }

        let quorum = QuorumEvaluator::new(self.attendance, self.members).evaluate(
            ctx,
            meeting_id,
            convocation_no,
            quorum_policy,
            None,
        )?;
        if let Some(outcome) = quorum.outcome() {
            if !outcome.met {
                codes.push(BlockerCode::QuorumNotMet);
                reasons.push(format!(
                    "meeting quorum not met: {} < {}",
                    format_percent(outcome.ratio),
                    format_percent(outcome.threshold),
                ));
            }
        }

        Ok(ReadinessReport {
            can: codes.is_empty(),
            codes,
            reasons,
        })
    }
}
