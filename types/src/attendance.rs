//! Attendance modes and the counted-mode derivation for quorum.

use serde::{Deserialize, Serialize};

/// How a member participates in a meeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    /// Physically present in the room.
    Present,
    /// Attending remotely (video, phone).
    Remote,
    /// Represented by a proxy holder.
    Proxy,
}

impl AttendanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Remote => "remote",
            Self::Proxy => "proxy",
        }
    }
}
