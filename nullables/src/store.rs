//! Nullable store: thread-safe in-memory storage for testing.
//!
//! One `NullStore` implements every persistence trait the engine
//! consumes. Fixtures are loaded through the `set_*` helpers; the trait
//! methods then behave like a real backend, including transactional
//! rollback for proxy mutations.

use plenum_store::{
    AttendanceStore, BallotStore, MemberStore, MotionContext, MotionStore, OfficialRecord,
    PolicyStore, ProxyRecord, ProxyStore, ProxyTxn, StoreError,
};
use plenum_types::{
    AttendanceMode, MeetingId, MemberId, MotionId, PolicyId, QuorumPolicy, Tally, TenantId,
    Timestamp, VotePolicy,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Clone, Debug)]
struct AttendanceGroup {
    mode: AttendanceMode,
    count: u64,
    weight: f64,
    checked_in_at: Timestamp,
}

/// An in-memory implementation of every store trait, for testing.
/// Thread-safe; proxy transactions serialize on one mutex and roll back
/// on error by restoring a snapshot.
pub struct NullStore {
    quorum_policies: Mutex<HashMap<PolicyId, QuorumPolicy>>,
    vote_policies: Mutex<HashMap<PolicyId, VotePolicy>>,
    motions: Mutex<HashMap<MotionId, MotionContext>>,
    official_results: Mutex<HashMap<MotionId, OfficialRecord>>,
    attendance: Mutex<HashMap<(MeetingId, TenantId), Vec<AttendanceGroup>>>,
    member_totals: Mutex<HashMap<TenantId, (u64, f64)>>,
    memberships: Mutex<HashSet<(MemberId, TenantId)>>,
    tallies: Mutex<HashMap<MotionId, Tally>>,
    proxy_edges: Mutex<Vec<ProxyRecord>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            quorum_policies: Mutex::new(HashMap::new()),
            vote_policies: Mutex::new(HashMap::new()),
            motions: Mutex::new(HashMap::new()),
            official_results: Mutex::new(HashMap::new()),
            attendance: Mutex::new(HashMap::new()),
            member_totals: Mutex::new(HashMap::new()),
            memberships: Mutex::new(HashSet::new()),
            tallies: Mutex::new(HashMap::new()),
            proxy_edges: Mutex::new(Vec::new()),
        }
    }

    pub fn set_quorum_policy(&self, id: PolicyId, policy: QuorumPolicy) {
        self.quorum_policies.lock().unwrap().insert(id, policy);
    }

    pub fn set_vote_policy(&self, id: PolicyId, policy: VotePolicy) {
        self.vote_policies.lock().unwrap().insert(id, policy);
    }

    pub fn set_motion(&self, motion: MotionContext) {
        self.motions.lock().unwrap().insert(motion.motion_id, motion);
    }

    /// Replace the meeting's attendance with one physically-present group
    /// checked in at the epoch.
    pub fn set_attendance(&self, meeting: MeetingId, tenant: TenantId, count: u64, weight: f64) {
        self.attendance.lock().unwrap().insert(
            (meeting, tenant),
            vec![AttendanceGroup {
                mode: AttendanceMode::Present,
                count,
                weight,
                checked_in_at: Timestamp::EPOCH,
            }],
        );
    }

    /// Replace the meeting's attendance with physically-present groups at
    /// explicit check-in times, for late-arrival tests.
    pub fn set_attendance_with_checkins(
        &self,
        meeting: MeetingId,
        tenant: TenantId,
        groups: &[(u64, f64, Timestamp)],
    ) {
        self.attendance.lock().unwrap().insert(
            (meeting, tenant),
            groups
                .iter()
                .map(|&(count, weight, checked_in_at)| AttendanceGroup {
                    mode: AttendanceMode::Present,
                    count,
                    weight,
                    checked_in_at,
                })
                .collect(),
        );
    }

    /// Add one attendance group in a specific mode.
    pub fn add_attendance_group(
        &self,
        meeting: MeetingId,
        tenant: TenantId,
        mode: AttendanceMode,
        count: u64,
        weight: f64,
        checked_in_at: Timestamp,
    ) {
        self.attendance
            .lock()
            .unwrap()
            .entry((meeting, tenant))
            .or_default()
            .push(AttendanceGroup {
                mode,
                count,
                weight,
                checked_in_at,
            });
    }

    /// Set the tenant's eligible totals (active member count and summed
    /// voting power).
    pub fn set_members(&self, tenant: TenantId, count: u64, weight: f64) {
        self.member_totals
            .lock()
            .unwrap()
            .insert(tenant, (count, weight));
    }

    /// Register an individual member of the tenant.
    pub fn add_member(&self, member: MemberId, tenant: TenantId) {
        self.memberships.lock().unwrap().insert((member, tenant));
    }

    pub fn set_tally(&self, motion: MotionId, tally: Tally) {
        self.tallies.lock().unwrap().insert(motion, tally);
    }

    /// The persisted official record for a motion, if any.
    pub fn official_result(&self, motion: MotionId) -> Option<OfficialRecord> {
        self.official_results.lock().unwrap().get(&motion).cloned()
    }

    /// Number of proxy edges ever written for a meeting, revoked included.
    pub fn edge_history_len(&self, meeting: MeetingId) -> usize {
        self.proxy_edges
            .lock()
            .unwrap()
            .iter()
            .filter(|edge| edge.meeting_id == meeting)
            .count()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for NullStore {
    fn find_quorum_policy(&self, id: PolicyId) -> Result<Option<QuorumPolicy>, StoreError> {
        Ok(self.quorum_policies.lock().unwrap().get(&id).cloned())
    }

    fn find_vote_policy(&self, id: PolicyId) -> Result<Option<VotePolicy>, StoreError> {
        Ok(self.vote_policies.lock().unwrap().get(&id).cloned())
    }
}

impl MotionStore for NullStore {
    fn find_motion_context(&self, motion_id: MotionId) -> Result<Option<MotionContext>, StoreError> {
        Ok(self.motions.lock().unwrap().get(&motion_id).cloned())
    }

    fn list_closed_motions(&self, meeting_id: MeetingId) -> Result<Vec<MotionId>, StoreError> {
        let mut ids: Vec<MotionId> = self
            .motions
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.meeting_id == meeting_id && m.is_closed())
            .map(|m| m.motion_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn count_open_motions(&self, meeting_id: MeetingId) -> Result<u64, StoreError> {
        Ok(self
            .motions
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.meeting_id == meeting_id && m.opened_at.is_some() && !m.is_closed())
            .count() as u64)
    }

    fn count_closed_undecided(&self, meeting_id: MeetingId) -> Result<u64, StoreError> {
        let results = self.official_results.lock().unwrap();
        Ok(self
            .motions
            .lock()
            .unwrap()
            .values()
            .filter(|m| {
                m.meeting_id == meeting_id && m.is_closed() && !results.contains_key(&m.motion_id)
            })
            .count() as u64)
    }

    fn record_official_result(
        &self,
        motion_id: MotionId,
        record: &OfficialRecord,
    ) -> Result<(), StoreError> {
        self.official_results
            .lock()
            .unwrap()
            .insert(motion_id, record.clone());
        Ok(())
    }
}

impl AttendanceStore for NullStore {
    fn count_present(
        &self,
        meeting_id: MeetingId,
        tenant_id: TenantId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
    ) -> Result<u64, StoreError> {
        Ok(self
            .counted_groups(meeting_id, tenant_id, modes, late_cutoff)
            .iter()
            .map(|g| g.count)
            .sum())
    }

    fn sum_present_weight(
        &self,
        meeting_id: MeetingId,
        tenant_id: TenantId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
    ) -> Result<f64, StoreError> {
        Ok(self
            .counted_groups(meeting_id, tenant_id, modes, late_cutoff)
            .iter()
            .map(|g| g.weight)
            .sum())
    }
}

impl NullStore {
    fn counted_groups(
        &self,
        meeting_id: MeetingId,
        tenant_id: TenantId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
    ) -> Vec<AttendanceGroup> {
        self.attendance
            .lock()
            .unwrap()
            .get(&(meeting_id, tenant_id))
            .map(|groups| {
                groups
                    .iter()
                    .filter(|g| modes.contains(&g.mode))
                    .filter(|g| match late_cutoff {
                        Some(cutoff) => !g.checked_in_at.is_after(cutoff),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl MemberStore for NullStore {
    fn count_active(&self, tenant_id: TenantId) -> Result<u64, StoreError> {
        Ok(self
            .member_totals
            .lock()
            .unwrap()
            .get(&tenant_id)
            .map(|&(count, _)| count)
            .unwrap_or(0))
    }

    fn sum_active_weight(&self, tenant_id: TenantId) -> Result<f64, StoreError> {
        Ok(self
            .member_totals
            .lock()
            .unwrap()
            .get(&tenant_id)
            .map(|&(_, weight)| weight)
            .unwrap_or(0.0))
    }

    fn belongs_to_tenant(
        &self,
        member_id: MemberId,
        tenant_id: TenantId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .contains(&(member_id, tenant_id)))
    }
}

impl BallotStore for NullStore {
    fn weighted_tally(&self, motion_id: MotionId) -> Result<Tally, StoreError> {
        Ok(self
            .tallies
            .lock()
            .unwrap()
            .get(&motion_id)
            .copied()
            .unwrap_or_default())
    }
}

/// Transaction view over a working copy of the edge table. Committed back
/// only when the transactional closure succeeds.
struct NullProxyTxn<'a> {
    edges: &'a mut Vec<ProxyRecord>,
}

impl ProxyTxn for NullProxyTxn<'_> {
    fn active_outgoing(
        &self,
        meeting_id: MeetingId,
        giver: MemberId,
    ) -> Result<Option<ProxyRecord>, StoreError> {
        Ok(self
            .edges
            .iter()
            .find(|e| e.meeting_id == meeting_id && e.giver == giver && e.is_active())
            .cloned())
    }

    fn active_incoming_count(
        &self,
        meeting_id: MeetingId,
        receiver: MemberId,
    ) -> Result<u64, StoreError> {
        Ok(self
            .edges
            .iter()
            .filter(|e| e.meeting_id == meeting_id && e.receiver == receiver && e.is_active())
            .count() as u64)
    }

    fn upsert_edge(&mut self, record: &ProxyRecord) -> Result<(), StoreError> {
        for edge in self.edges.iter_mut() {
            if edge.meeting_id == record.meeting_id && edge.giver == record.giver && edge.is_active()
            {
                edge.revoked_at = Some(record.created_at);
            }
        }
        self.edges.push(record.clone());
        Ok(())
    }

    fn revoke_active(
        &mut self,
        meeting_id: MeetingId,
        giver: MemberId,
        at: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut revoked = false;
        for edge in self.edges.iter_mut() {
            if edge.meeting_id == meeting_id && edge.giver == giver && edge.is_active() {
                edge.revoked_at = Some(at);
                revoked = true;
            }
        }
        Ok(revoked)
    }
}

impl ProxyStore for NullStore {
    fn count_active_as_giver(
        &self,
        meeting_id: MeetingId,
        member_id: MemberId,
    ) -> Result<u64, StoreError> {
        Ok(self
            .proxy_edges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.meeting_id == meeting_id && e.giver == member_id && e.is_active())
            .count() as u64)
    }

    fn count_active_as_receiver(
        &self,
        meeting_id: MeetingId,
        member_id: MemberId,
    ) -> Result<u64, StoreError> {
        Ok(self
            .proxy_edges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.meeting_id == meeting_id && e.receiver == member_id && e.is_active())
            .count() as u64)
    }

    fn active_edges(&self, meeting_id: MeetingId) -> Result<Vec<ProxyRecord>, StoreError> {
        Ok(self
            .proxy_edges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.meeting_id == meeting_id && e.is_active())
            .cloned()
            .collect())
    }

    fn transactionally(
        &self,
        _meeting_id: MeetingId,
        _lock_members: &[MemberId],
        f: &mut dyn FnMut(&mut dyn ProxyTxn) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        // Holding the table mutex for the whole closure is the in-memory
        // equivalent of row locks: concurrent transactions serialize.
        let mut table = self.proxy_edges.lock().unwrap();
        let mut working = table.clone();
        let mut txn = NullProxyTxn {
            edges: &mut working,
        };
        match f(&mut txn) {
            Ok(()) => {
                *table = working;
                Ok(())
            }
            // Working copy is dropped: nothing written inside survives.
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(meeting: u64, giver: u64, receiver: u64) -> ProxyRecord {
        ProxyRecord {
            meeting_id: MeetingId::new(meeting),
            giver: MemberId::new(giver),
            receiver: MemberId::new(receiver),
            created_at: Timestamp::new(100),
            revoked_at: None,
        }
    }

    #[test]
    fn test_transaction_commit_persists() {
        let store = NullStore::new();
        store
            .transactionally(MeetingId::new(1), &[], &mut |txn| {
                txn.upsert_edge(&edge(1, 1, 2))
            })
            .unwrap();
        assert_eq!(
            store
                .count_active_as_giver(MeetingId::new(1), MemberId::new(1))
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_transaction_error_rolls_back() {
        let store = NullStore::new();
        let result = store.transactionally(MeetingId::new(1), &[], &mut |txn| {
            txn.upsert_edge(&edge(1, 1, 2))?;
            Err(StoreError::Aborted("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.edge_history_len(MeetingId::new(1)), 0);
    }

    #[test]
    fn test_upsert_revokes_prior_edge_of_giver() {
        let store = NullStore::new();
        store
            .transactionally(MeetingId::new(1), &[], &mut |txn| {
                txn.upsert_edge(&edge(1, 1, 2))?;
                txn.upsert_edge(&edge(1, 1, 3))
            })
            .unwrap();
        assert_eq!(
            store
                .count_active_as_receiver(MeetingId::new(1), MemberId::new(2))
                .unwrap(),
            0
        );
        // Both rows kept for audit.
        assert_eq!(store.edge_history_len(MeetingId::new(1)), 2);
    }

    #[test]
    fn test_attendance_modes_and_cutoff() {
        let store = NullStore::new();
        let meeting = MeetingId::new(1);
        let tenant = TenantId::new(1);
        store.add_attendance_group(
            meeting,
            tenant,
            AttendanceMode::Present,
            5,
            5.0,
            Timestamp::new(100),
        );
        store.add_attendance_group(
            meeting,
            tenant,
            AttendanceMode::Remote,
            3,
            3.0,
            Timestamp::new(200),
        );
        store.add_attendance_group(
            meeting,
            tenant,
            AttendanceMode::Present,
            2,
            2.0,
            Timestamp::new(900),
        );

        let present_only = &[AttendanceMode::Present];
        let with_remote = &[AttendanceMode::Present, AttendanceMode::Remote];

        assert_eq!(
            store.count_present(meeting, tenant, present_only, None).unwrap(),
            7
        );
        assert_eq!(
            store.count_present(meeting, tenant, with_remote, None).unwrap(),
            10
        );
        // Cutoff at 500 drops the group checked in at 900.
        assert_eq!(
            store
                .count_present(meeting, tenant, with_remote, Some(Timestamp::new(500)))
                .unwrap(),
            8
        );
    }

    #[test]
    fn test_unknown_tenant_counts_are_zero() {
        let store = NullStore::new();
        assert_eq!(store.count_active(TenantId::new(9)).unwrap(), 0);
        assert_eq!(store.sum_active_weight(TenantId::new(9)).unwrap(), 0.0);
    }
}
