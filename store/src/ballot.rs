//! Electronic ballot aggregation trait.

use crate::StoreError;
use plenum_types::{MotionId, Tally};

pub trait BallotStore {
    /// Weighted aggregate of the electronic ballots for one motion.
    /// One ballot per member per motion; weight is voting power at cast
    /// time.
    fn weighted_tally(&self, motion_id: MotionId) -> Result<Tally, StoreError>;
}
