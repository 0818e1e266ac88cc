//! Attendance aggregation trait.
//!
//! The late-arrival cutoff is part of the read contract: when set, the
//! backend must exclude attendees whose check-in is strictly after it.

use crate::StoreError;
use plenum_types::{AttendanceMode, MeetingId, TenantId, Timestamp};

pub trait AttendanceStore {
    /// Headcount of attendees in the given modes, excluding late arrivals
    /// when `late_cutoff` is set.
    fn count_present(
        &self,
        meeting_id: MeetingId,
        tenant_id: TenantId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
    ) -> Result<u64, StoreError>;

    /// Summed voting power of attendees in the given modes, excluding late
    /// arrivals when `late_cutoff` is set.
    fn sum_present_weight(
        &self,
        meeting_id: MeetingId,
        tenant_id: TenantId,
        modes: &[AttendanceMode],
        late_cutoff: Option<Timestamp>,
    ) -> Result<f64, StoreError>;
}
