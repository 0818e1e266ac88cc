//! Fundamental types for the assembly decision engine.
//!
//! This crate defines the value objects shared across every other crate in
//! the workspace: typed identifiers, timestamps, attendance modes, quorum
//! and vote policies, tallies, decision enums, and the explicit call
//! context threaded through every engine operation.

pub mod attendance;
pub mod context;
pub mod decision;
pub mod error;
pub mod ids;
pub mod policy;
pub mod tally;
pub mod time;

pub use attendance::AttendanceMode;
pub use context::Context;
pub use decision::{Decision, OfficialSource};
pub use error::TypeError;
pub use ids::{MeetingId, MemberId, MotionId, PolicyId, TenantId};
pub use policy::{QuorumBasis, QuorumMode, QuorumPolicy, VoteBase, VotePolicy};
pub use tally::{Tally, VoteCount};
pub use time::Timestamp;
