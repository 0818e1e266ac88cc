//! Policy storage trait.

use crate::StoreError;
use plenum_types::{PolicyId, QuorumPolicy, VotePolicy};

pub trait PolicyStore {
    fn find_quorum_policy(&self, id: PolicyId) -> Result<Option<QuorumPolicy>, StoreError>;
    fn find_vote_policy(&self, id: PolicyId) -> Result<Option<VotePolicy>, StoreError>;
}
