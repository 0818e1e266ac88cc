//! Explicit call context.
//!
//! Every engine operation receives the tenant and the evaluation time as
//! an explicit parameter. There is no ambient tenant or global clock.

use crate::ids::TenantId;
use crate::time::Timestamp;

/// The tenant scope and clock reading for one engine call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    pub tenant_id: TenantId,
    pub now: Timestamp,
}

impl Context {
    pub fn new(tenant_id: TenantId, now: Timestamp) -> Self {
        Self { tenant_id, now }
    }
}
