//! Per-motion vote tallies.

use serde::{Deserialize, Serialize};

/// One side of a tally: number of ballots and their summed voting power.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteCount {
    pub count: u64,
    pub weight: f64,
}

impl VoteCount {
    pub fn new(count: u64, weight: f64) -> Self {
        Self { count, weight }
    }
}

/// Aggregate tally for one motion.
///
/// `nsp` ("ne se prononce pas") are ballots cast without taking a side;
/// they count as participation but not as expressed votes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub in_favor: VoteCount,
    pub against: VoteCount,
    pub abstain: VoteCount,
    pub nsp: VoteCount,
}

impl Tally {
    /// Weight of expressed votes: for + against + abstain.
    pub fn expressed_weight(&self) -> f64 {
        self.in_favor.weight + self.against.weight + self.abstain.weight
    }

    /// Total ballot weight including nsp.
    pub fn total_weight(&self) -> f64 {
        self.expressed_weight() + self.nsp.weight
    }

    /// Whether any ballot at all was cast.
    pub fn is_empty(&self) -> bool {
        self.in_favor.count == 0
            && self.against.count == 0
            && self.abstain.count == 0
            && self.nsp.count == 0
    }
}
