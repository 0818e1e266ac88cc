//! The assembly decision engine.
//!
//! Pure computations turning raw attendance and ballot aggregates into
//! certified, auditable outcomes:
//! - quorum evaluation (single / evolving / double modes, late-arrival
//!   exclusion)
//! - majority evaluation (configurable base, quorum gate)
//! - official-result reconciliation between manual and electronic tallies
//! - proxy delegation legality (no chains, receiver cap, atomic upsert)
//! - meeting readiness assessment and blocker diffing
//!
//! All evaluators are synchronous and deterministic: identical inputs
//! yield identical outputs. The only I/O is through the `plenum-store`
//! traits, and the only mutation paths are the proxy ledger and result
//! consolidation.

pub mod error;
pub mod events;
pub mod majority;
pub mod official;
pub mod proxy;
pub mod quorum;
pub mod readiness;

pub use error::{EngineError, RuleCode};
pub use events::DomainEvent;
pub use majority::{MajorityEvaluator, MajorityInput, MajorityOutcome, MajorityResult};
pub use official::{Consolidation, OfficialResult, OfficialResults};
pub use proxy::{ProxyLedger, ProxyOutcome, ProxyUpdate, DEFAULT_RECEIVER_CAP};
pub use quorum::{QuorumDimension, QuorumEvaluator, QuorumOutcome, QuorumResult};
pub use readiness::{BlockerCode, Readiness, ReadinessDiff, ReadinessReport};
