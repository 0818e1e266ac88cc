//! Official (certified) results.
//!
//! Per motion, chooses the authoritative tally source (manual count vs
//! electronic ballots), runs the quorum and majority evaluators against
//! it, and derives a decision plus a human-readable reason citing the
//! concrete numbers. Consolidation batches this over every closed motion
//! of a meeting and persists the outcome.

use crate::error::EngineError;
use crate::events::DomainEvent;
use crate::majority::{MajorityEvaluator, MajorityInput, MajorityResult};
use crate::quorum::{QuorumEvaluator, QuorumResult};
use plenum_store::{
    AttendanceStore, BallotStore, MemberStore, MotionContext, MotionStore, OfficialRecord,
    PolicyStore,
};
use plenum_types::{
    Context, Decision, MeetingId, MotionId, OfficialSource, QuorumPolicy, VotePolicy,
};
use plenum_utils::format_percent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A manual count whose parts sum to the announced total within this
/// tolerance is considered internally consistent.
const MANUAL_TOLERANCE: f64 = 1e-6;

/// The certified result of one motion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfficialResult {
    pub motion_id: MotionId,
    pub source: OfficialSource,
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    pub total_weight: f64,
    pub decision: Decision,
    pub reason: String,
    pub quorum: QuorumResult,
    pub majority: MajorityResult,
}

impl OfficialResult {
    /// The fields persisted onto the motion at consolidation time.
    pub fn to_record(&self) -> OfficialRecord {
        OfficialRecord {
            source: self.source,
            for_weight: self.for_weight,
            against_weight: self.against_weight,
            abstain_weight: self.abstain_weight,
            total_weight: self.total_weight,
            decision: self.decision,
            reason: self.reason.clone(),
        }
    }
}

/// Outcome of a meeting-wide consolidation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consolidation {
    /// Number of motions whose result was computed and persisted.
    pub updated: u64,
    pub events: Vec<DomainEvent>,
}

/// Computes and certifies official results.
pub struct OfficialResults<'a> {
    motions: &'a dyn MotionStore,
    policies: &'a dyn PolicyStore,
    ballots: &'a dyn BallotStore,
    attendance: &'a dyn AttendanceStore,
    members: &'a dyn MemberStore,
}

impl<'a> OfficialResults<'a> {
    pub fn new(
        motions: &'a dyn MotionStore,
        policies: &'a dyn PolicyStore,
        ballots: &'a dyn BallotStore,
        attendance: &'a dyn AttendanceStore,
        members: &'a dyn MemberStore,
    ) -> Self {
        Self {
            motions,
            policies,
            ballots,
            attendance,
            members,
        }
    }

    /// Compute the official result for a motion without persisting it.
    ///
    /// Recomputable from scratch: calling this twice on unchanged inputs
    /// returns identical results.
    pub fn compute(&self, ctx: &Context, motion_id: MotionId) -> Result<OfficialResult, EngineError> {
        let motion = self.motion_in_tenant(ctx, motion_id)?;
        let quorum_policy = self.resolve_quorum_policy(&motion)?;
        let vote_policy = self.resolve_vote_policy(&motion)?;

        let (source, for_w, against_w, abstain_w, total_w) = self.choose_source(&motion)?;

        let quorum = QuorumEvaluator::new(self.attendance, self.members).evaluate(
            ctx,
            motion.meeting_id,
            motion.convocation_no,
            quorum_policy.as_ref(),
            motion.opened_at,
        )?;

        let input = MajorityInput {
            for_weight: for_w,
            against_weight: against_w,
            abstain_weight: abstain_w,
            expressed_weight: for_w + against_w + abstain_w,
            eligible_weight: self.members.sum_active_weight(ctx.tenant_id)?,
        };
        let majority = MajorityEvaluator.evaluate(&input, vote_policy.as_ref(), &quorum)?;

        let (decision, reason) = decide(&quorum, &majority, &input, source);

        Ok(OfficialResult {
            motion_id,
            source,
            for_weight: for_w,
            against_weight: against_w,
            abstain_weight: abstain_w,
            total_weight: total_w,
            decision,
            reason,
            quorum,
            majority,
        })
    }

    /// Compute and persist the official result for one closed motion.
    pub fn compute_and_persist(
        &self,
        ctx: &Context,
        motion_id: MotionId,
    ) -> Result<(OfficialResult, Vec<DomainEvent>), EngineError> {
        let motion = self.motion_in_tenant(ctx, motion_id)?;
        if !motion.is_closed() {
            return Err(EngineError::InvalidInput(format!(
                "motion {motion_id} is still open"
            )));
        }
        let result = self.compute(ctx, motion_id)?;
        self.motions
            .record_official_result(motion_id, &result.to_record())?;
        debug!(
            motion = %motion_id,
            source = %result.source,
            decision = %result.decision,
            "official result recorded"
        );
        let events = vec![DomainEvent::OfficialResultRecorded {
            motion_id,
            source: result.source,
            decision: result.decision,
            at: ctx.now,
        }];
        Ok((result, events))
    }

    /// Compute and persist official results for every closed motion of a
    /// meeting. Open motions are untouched; re-running without intervening
    /// ballot changes writes identical records.
    pub fn consolidate(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
    ) -> Result<Consolidation, EngineError> {
        let closed = self.motions.list_closed_motions(meeting_id)?;
        let mut events = Vec::with_capacity(closed.len());
        let mut updated = 0u64;
        for motion_id in closed {
            let (_, mut motion_events) = self.compute_and_persist(ctx, motion_id)?;
            events.append(&mut motion_events);
            updated += 1;
        }
        info!(meeting = %meeting_id, updated, "meeting consolidated");
        Ok(Consolidation { updated, events })
    }

    fn motion_in_tenant(
        &self,
        ctx: &Context,
        motion_id: MotionId,
    ) -> Result<MotionContext, EngineError> {
        let motion = self
            .motions
            .find_motion_context(motion_id)?
            .ok_or_else(|| EngineError::NotFound(format!("motion {motion_id}")))?;
        if motion.tenant_id != ctx.tenant_id {
            // Cross-tenant references read as absent, never as errors that
            // leak existence.
            return Err(EngineError::NotFound(format!("motion {motion_id}")));
        }
        Ok(motion)
    }

    fn resolve_quorum_policy(
        &self,
        motion: &MotionContext,
    ) -> Result<Option<QuorumPolicy>, EngineError> {
        match motion.quorum_policy_id() {
            None => Ok(None),
            Some(id) => self
                .policies
                .find_quorum_policy(id)?
                .map(Some)
                .ok_or_else(|| EngineError::NotFound(format!("quorum policy {id}"))),
        }
    }

    fn resolve_vote_policy(
        &self,
        motion: &MotionContext,
    ) -> Result<Option<VotePolicy>, EngineError> {
        match motion.vote_policy_id() {
            None => Ok(None),
            Some(id) => self
                .policies
                .find_vote_policy(id)?
                .map(Some)
                .ok_or_else(|| EngineError::NotFound(format!("vote policy {id}"))),
        }
    }

    /// Manual wins iff a positive manual total exists and the parts sum to
    /// it exactly (within floating tolerance). Anything else falls back to
    /// the electronic ballot aggregate.
    fn choose_source(
        &self,
        motion: &MotionContext,
    ) -> Result<(OfficialSource, f64, f64, f64, f64), EngineError> {
        let total = motion.manual_total.unwrap_or(0.0);
        if total > 0.0 {
            let for_w = motion.manual_for.unwrap_or(0.0);
            let against_w = motion.manual_against.unwrap_or(0.0);
            let abstain_w = motion.manual_abstain.unwrap_or(0.0);
            if ((for_w + against_w + abstain_w) - total).abs() <= MANUAL_TOLERANCE {
                return Ok((OfficialSource::Manual, for_w, against_w, abstain_w, total));
            }
            debug!(
                motion = %motion.motion_id,
                "inconsistent manual count, falling back to electronic ballots"
            );
        }
        let tally = self.ballots.weighted_tally(motion.motion_id)?;
        Ok((
            OfficialSource::Evote,
            tally.in_favor.weight,
            tally.against.weight,
            tally.abstain.weight,
            tally.total_weight(),
        ))
    }
}

/// Derive the decision and its reason from the evaluated results.
fn decide(
    quorum: &QuorumResult,
    majority: &MajorityResult,
    input: &MajorityInput,
    source: OfficialSource,
) -> (Decision, String) {
    if let Some(outcome) = quorum.outcome() {
        if !outcome.met {
            let reason = format!(
                "quorum not met: {} < {}",
                format_percent(outcome.ratio),
                format_percent(outcome.threshold),
            );
            return (Decision::NoQuorum, reason);
        }
    }

    match majority.outcome() {
        Some(outcome) => {
            if input.expressed_weight <= 0.0 {
                return (
                    Decision::NoVotes,
                    format!("no votes expressed ({} tally empty)", source),
                );
            }
            let decision = if outcome.adopted {
                Decision::Adopted
            } else {
                Decision::Rejected
            };
            let reason = format!(
                "majority on {}: {} {} {}",
                outcome.base.as_str(),
                format_percent(outcome.ratio),
                if outcome.adopted { ">=" } else { "<" },
                format_percent(outcome.threshold),
            );
            (decision, reason)
        }
        // No vote policy: strict for > against fallback, ties rejected.
        None => {
            if input.expressed_weight <= 0.0 {
                return (
                    Decision::NoVotes,
                    format!("no votes expressed ({} tally empty)", source),
                );
            }
            let adopted = input.for_weight > input.against_weight;
            let decision = if adopted {
                Decision::Adopted
            } else {
                Decision::Rejected
            };
            let reason = format!(
                "no vote policy, simple majority fallback: for {:.2} vs against {:.2}",
                input.for_weight, input.against_weight,
            );
            (decision, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plenum_nullables::NullStore;
    use plenum_types::{
        MeetingId, PolicyId, QuorumBasis, QuorumMode, Tally, TenantId, Timestamp, VoteBase,
        VoteCount,
    };

    const TENANT: u64 = 1;
    const MEETING: u64 = 10;
    const MOTION: u64 = 100;

    fn ctx() -> Context {
        Context::new(TenantId::new(TENANT), Timestamp::new(50_000))
    }

    fn base_motion() -> MotionContext {
        MotionContext {
            motion_id: MotionId::new(MOTION),
            meeting_id: MeetingId::new(MEETING),
            tenant_id: TenantId::new(TENANT),
            motion_quorum_policy_id: None,
            meeting_quorum_policy_id: None,
            motion_vote_policy_id: None,
            meeting_vote_policy_id: None,
            manual_total: None,
            manual_for: None,
            manual_against: None,
            manual_abstain: None,
            opened_at: Some(Timestamp::new(1_000)),
            closed_at: Some(Timestamp::new(2_000)),
            convocation_no: 1,
        }
    }

    fn store_with(motion: MotionContext) -> NullStore {
        let store = NullStore::new();
        store.set_members(TenantId::new(TENANT), 100, 100.0);
        store.set_attendance(MeetingId::new(MEETING), TenantId::new(TENANT), 80, 80.0);
        store.set_motion(motion);
        store
    }

    fn service(store: &NullStore) -> OfficialResults<'_> {
        OfficialResults::new(store, store, store, store, store)
    }

    fn evote(store: &NullStore, for_w: f64, against_w: f64, abstain_w: f64) {
        store.set_tally(
            MotionId::new(MOTION),
            Tally {
                in_favor: VoteCount::new(1, for_w),
                against: VoteCount::new(1, against_w),
                abstain: VoteCount::new(1, abstain_w),
                nsp: VoteCount::default(),
            },
        );
    }

    fn majority_policy(store: &NullStore) -> PolicyId {
        let id = PolicyId::new(7);
        store.set_vote_policy(
            id,
            VotePolicy {
                base: VoteBase::Expressed,
                threshold: 0.5,
                abstention_as_against: false,
            },
        );
        id
    }

    #[test]
    fn test_manual_precedence_over_electronic() {
        let mut motion = base_motion();
        motion.manual_total = Some(10.0);
        motion.manual_for = Some(6.0);
        motion.manual_against = Some(3.0);
        motion.manual_abstain = Some(1.0);
        let store = store_with(motion);
        // Electronic ballots exist but must be ignored.
        evote(&store, 5.0, 0.0, 0.0);

        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.source, OfficialSource::Manual);
        assert_eq!(result.for_weight, 6.0);
        assert_eq!(result.against_weight, 3.0);
        assert_eq!(result.abstain_weight, 1.0);
        assert_eq!(result.total_weight, 10.0);
        assert_eq!(result.decision, Decision::Adopted);
    }

    #[test]
    fn test_inconsistent_manual_falls_back_to_evote() {
        let mut motion = base_motion();
        motion.manual_total = Some(10.0);
        motion.manual_for = Some(6.0);
        motion.manual_against = Some(3.0);
        motion.manual_abstain = Some(0.0); // sums to 9, not 10
        let store = store_with(motion);
        evote(&store, 5.0, 2.0, 0.0);

        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.source, OfficialSource::Evote);
        assert_eq!(result.for_weight, 5.0);
        assert_eq!(result.total_weight, 7.0);
    }

    #[test]
    fn test_policy_applied_adopted_with_reason_numbers() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m
        });
        majority_policy(&store);
        evote(&store, 60.0, 30.0, 10.0);

        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::Adopted);
        // 60/100 expressed = 60.00% vs 50.00%
        assert!(result.reason.contains("60.00%"));
        assert!(result.reason.contains("50.00%"));
        assert!(result.reason.contains("expressed"));
    }

    #[test]
    fn test_motion_policy_overrides_meeting_policy() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m.motion_vote_policy_id = Some(PolicyId::new(8));
            m
        });
        majority_policy(&store); // id 7: threshold 0.5
        store.set_vote_policy(
            PolicyId::new(8),
            VotePolicy {
                base: VoteBase::Expressed,
                threshold: 0.66,
                abstention_as_against: false,
            },
        );
        evote(&store, 60.0, 40.0, 0.0);

        // 60% passes the meeting's 50% rule but fails the motion's 66%.
        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::Rejected);
        assert!(result.reason.contains("66.00%"));
    }

    #[test]
    fn test_quorum_gate_yields_no_quorum() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_quorum_policy_id = Some(PolicyId::new(3));
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m
        });
        store.set_quorum_policy(
            PolicyId::new(3),
            plenum_types::QuorumPolicy {
                mode: QuorumMode::Single,
                basis: QuorumBasis::EligibleMembers,
                threshold: 0.5,
                threshold_call2: None,
                basis2: None,
                threshold2: None,
                include_proxies: true,
                count_remote: true,
            },
        );
        majority_policy(&store);
        // 40 of 100 present: quorum fails despite unanimous approval.
        store.set_attendance(MeetingId::new(MEETING), TenantId::new(TENANT), 40, 40.0);
        evote(&store, 40.0, 0.0, 0.0);

        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::NoQuorum);
        assert!(result.reason.contains("40.00%"));
        assert!(result.reason.contains("50.00%"));
    }

    #[test]
    fn test_no_policy_fallback_and_tie_rejected() {
        let store = store_with(base_motion());
        evote(&store, 30.0, 30.0, 0.0);
        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::Rejected);
        assert!(result.reason.contains("for 30.00"));
        assert!(result.reason.contains("against 30.00"));

        evote(&store, 31.0, 30.0, 0.0);
        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::Adopted);
    }

    #[test]
    fn test_empty_tally_is_no_votes() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m
        });
        majority_policy(&store);
        // No ballots at all.
        let result = service(&store).compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(result.decision, Decision::NoVotes);
    }

    #[test]
    fn test_missing_motion_is_not_found() {
        let store = NullStore::new();
        let err = service(&store)
            .compute(&ctx(), MotionId::new(999))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_cross_tenant_motion_is_not_found() {
        let store = store_with(base_motion());
        let foreign = Context::new(TenantId::new(2), Timestamp::new(50_000));
        let err = service(&store)
            .compute(&foreign, MotionId::new(MOTION))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_dangling_policy_id_is_not_found() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(404));
            m
        });
        evote(&store, 1.0, 0.0, 0.0);
        let err = service(&store)
            .compute(&ctx(), MotionId::new(MOTION))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_persist_rejects_open_motion() {
        let store = store_with({
            let mut m = base_motion();
            m.closed_at = None;
            m
        });
        evote(&store, 1.0, 0.0, 0.0);
        let err = service(&store)
            .compute_and_persist(&ctx(), MotionId::new(MOTION))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_consolidation_is_idempotent() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m
        });
        majority_policy(&store);
        evote(&store, 60.0, 40.0, 0.0);

        let svc = service(&store);
        let first = svc.consolidate(&ctx(), MeetingId::new(MEETING)).unwrap();
        assert_eq!(first.updated, 1);
        let record_one = store.official_result(MotionId::new(MOTION)).unwrap();

        let second = svc.consolidate(&ctx(), MeetingId::new(MEETING)).unwrap();
        assert_eq!(second.updated, 1);
        let record_two = store.official_result(MotionId::new(MOTION)).unwrap();
        assert_eq!(record_one, record_two);
    }

    #[test]
    fn test_consolidation_skips_open_motions() {
        let store = store_with({
            let mut m = base_motion();
            m.closed_at = None;
            m
        });
        evote(&store, 1.0, 0.0, 0.0);
        let result = service(&store)
            .consolidate(&ctx(), MeetingId::new(MEETING))
            .unwrap();
        assert_eq!(result.updated, 0);
        assert!(store.official_result(MotionId::new(MOTION)).is_none());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let store = store_with({
            let mut m = base_motion();
            m.meeting_vote_policy_id = Some(PolicyId::new(7));
            m
        });
        majority_policy(&store);
        evote(&store, 60.0, 30.0, 10.0);
        let svc = service(&store);
        let a = svc.compute(&ctx(), MotionId::new(MOTION)).unwrap();
        let b = svc.compute(&ctx(), MotionId::new(MOTION)).unwrap();
        assert_eq!(a, b);
    }
}
