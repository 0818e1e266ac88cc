//! Typed identifiers for tenants, meetings, motions, members, and policies.
//!
//! All identifiers are opaque u64 surrogate keys. Wrapping them in distinct
//! newtypes keeps a `MotionId` from ever being passed where a `MeetingId`
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// A tenant (one association or company using the platform).
    TenantId
);
id_type!(
    /// A general assembly meeting.
    MeetingId
);
id_type!(
    /// A motion (resolution) put to vote within one meeting.
    MotionId
);
id_type!(
    /// A member of a tenant, holder of voting power.
    MemberId
);
id_type!(
    /// A quorum or vote policy record.
    PolicyId
);
