//! Abstract storage traits for the assembly decision engine.
//!
//! The engine reads attendance, members, ballots, motions, and policies
//! through these traits and writes certified results and proxy edges back
//! through them. Every backend (SQL, in-memory for testing) implements
//! these traits; the engine depends only on the contracts.

pub mod attendance;
pub mod ballot;
pub mod error;
pub mod member;
pub mod motion;
pub mod policy;
pub mod proxy;

pub use attendance::AttendanceStore;
pub use ballot::BallotStore;
pub use error::StoreError;
pub use member::MemberStore;
pub use motion::{MotionContext, MotionStore, OfficialRecord};
pub use policy::PolicyStore;
pub use proxy::{ProxyRecord, ProxyStore, ProxyTxn};
