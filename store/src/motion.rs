//! Motion storage trait and the policy-resolution context it returns.

use crate::StoreError;
use plenum_types::{Decision, MeetingId, MotionId, OfficialSource, PolicyId, TenantId, Timestamp};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to know about a motion in one read:
/// tenant linkage, policy overrides, manual tallies, and timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionContext {
    pub motion_id: MotionId,
    pub meeting_id: MeetingId,
    pub tenant_id: TenantId,
    /// Motion-level policy overrides; fall back to the meeting-level ids.
    pub motion_quorum_policy_id: Option<PolicyId>,
    pub meeting_quorum_policy_id: Option<PolicyId>,
    pub motion_vote_policy_id: Option<PolicyId>,
    pub meeting_vote_policy_id: Option<PolicyId>,
    /// Manual (degraded-mode) counts, if an operator entered any.
    pub manual_total: Option<f64>,
    pub manual_for: Option<f64>,
    pub manual_against: Option<f64>,
    pub manual_abstain: Option<f64>,
    pub opened_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    /// 1 for the first call of the meeting, 2 for the second.
    pub convocation_no: u8,
}

impl MotionContext {
    /// Motion-level quorum policy wins over the meeting-level one.
    pub fn quorum_policy_id(&self) -> Option<PolicyId> {
        self.motion_quorum_policy_id.or(self.meeting_quorum_policy_id)
    }

    /// Motion-level vote policy wins over the meeting-level one.
    pub fn vote_policy_id(&self) -> Option<PolicyId> {
        self.motion_vote_policy_id.or(self.meeting_vote_policy_id)
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// The four numeric fields plus decision written back onto a motion at
/// consolidation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfficialRecord {
    pub source: OfficialSource,
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    pub total_weight: f64,
    pub decision: Decision,
    pub reason: String,
}

pub trait MotionStore {
    /// Fetch a motion with its policy-resolution context.
    fn find_motion_context(&self, motion_id: MotionId) -> Result<Option<MotionContext>, StoreError>;

    /// All closed motions of a meeting, any order.
    fn list_closed_motions(&self, meeting_id: MeetingId) -> Result<Vec<MotionId>, StoreError>;

    /// Number of motions still open (opened and not closed).
    fn count_open_motions(&self, meeting_id: MeetingId) -> Result<u64, StoreError>;

    /// Number of closed motions with no recorded official result.
    fn count_closed_undecided(&self, meeting_id: MeetingId) -> Result<u64, StoreError>;

    /// Persist the certified result for a motion. Overwrites any prior
    /// record for the same motion.
    fn record_official_result(
        &self,
        motion_id: MotionId,
        record: &OfficialRecord,
    ) -> Result<(), StoreError>;
}
