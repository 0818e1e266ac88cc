//! Member aggregation trait.

use crate::StoreError;
use plenum_types::{MemberId, TenantId};

pub trait MemberStore {
    /// Headcount of active members of a tenant.
    fn count_active(&self, tenant_id: TenantId) -> Result<u64, StoreError>;

    /// Summed voting power of active members of a tenant.
    fn sum_active_weight(&self, tenant_id: TenantId) -> Result<f64, StoreError>;

    /// Whether a member exists, is active, and belongs to the tenant.
    fn belongs_to_tenant(&self, member_id: MemberId, tenant_id: TenantId)
        -> Result<bool, StoreError>;
}
