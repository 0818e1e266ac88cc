//! Proxy ("pouvoir") storage trait with an explicit transaction boundary.
//!
//! Proxy mutation is the one write path with a genuine race: two
//! concurrent delegations to the same receiver could both pass the cap
//! and chain checks before either commits. `transactionally` makes the
//! check-then-write sequence atomic by construction: the backend opens a
//! single transaction, takes update locks on the proxy rows of the listed
//! members, runs the closure, and commits only if it returned `Ok`. Any
//! `Err` rolls the whole transaction back.
//!
//! Backends that cannot lock promptly must fail with `LockUnavailable`
//! rather than block indefinitely; bounded retry is the caller's choice.

use crate::StoreError;
use plenum_types::{MeetingId, MemberId, Timestamp};
use serde::{Deserialize, Serialize};

/// A directed delegation edge within one meeting.
///
/// Edges are never deleted; revocation sets `revoked_at` and the history
/// stays behind for audit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub meeting_id: MeetingId,
    pub giver: MemberId,
    pub receiver: MemberId,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl ProxyRecord {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}

/// Operations available inside a proxy transaction. All reads see the
/// locked rows; all writes are provisional until the transaction commits.
pub trait ProxyTxn {
    /// The giver's current active outgoing edge, if any.
    fn active_outgoing(
        &self,
        meeting_id: MeetingId,
        giver: MemberId,
    ) -> Result<Option<ProxyRecord>, StoreError>;

    /// Number of active edges pointing at `receiver`.
    fn active_incoming_count(
        &self,
        meeting_id: MeetingId,
        receiver: MemberId,
    ) -> Result<u64, StoreError>;

    /// Insert a new active edge for the record's giver, soft-revoking any
    /// prior active edge of the same giver in the same meeting.
    fn upsert_edge(&mut self, record: &ProxyRecord) -> Result<(), StoreError>;

    /// Soft-revoke the giver's active edge. Returns false when the giver
    /// had no active edge.
    fn revoke_active(
        &mut self,
        meeting_id: MeetingId,
        giver: MemberId,
        at: Timestamp,
    ) -> Result<bool, StoreError>;
}

pub trait ProxyStore {
    /// Number of active edges where the member is the giver.
    fn count_active_as_giver(
        &self,
        meeting_id: MeetingId,
        member_id: MemberId,
    ) -> Result<u64, StoreError>;

    /// Number of active edges where the member is the receiver.
    fn count_active_as_receiver(
        &self,
        meeting_id: MeetingId,
        member_id: MemberId,
    ) -> Result<u64, StoreError>;

    /// All active edges of a meeting, for eligibility aggregation.
    fn active_edges(&self, meeting_id: MeetingId) -> Result<Vec<ProxyRecord>, StoreError>;

    /// Run `f` inside one transaction holding update locks on the proxy
    /// rows of `lock_members` for this meeting. An `Err` from `f` aborts
    /// the transaction with no partial state.
    fn transactionally(
        &self,
        meeting_id: MeetingId,
        lock_members: &[MemberId],
        f: &mut dyn FnMut(&mut dyn ProxyTxn) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
}
