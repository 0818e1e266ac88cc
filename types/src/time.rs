//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC). Check-in times, motion
//! open/close times, and proxy revocation times all use this type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether this timestamp is strictly after `other`.
    ///
    /// Used for late-arrival exclusion: a check-in strictly after a
    /// motion's opening does not count toward that motion's quorum.
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Timestamp::new(10) < Timestamp::new(11));
        assert!(Timestamp::new(11).is_after(Timestamp::new(10)));
        assert!(!Timestamp::new(10).is_after(Timestamp::new(10)));
    }

    #[test]
    fn test_epoch_is_zero() {
        assert_eq!(Timestamp::EPOCH.as_secs(), 0);
    }
}
