//! Domain events emitted by the mutating engine operations.
//!
//! The engine performs no audit or notification I/O itself. Mutations
//! return the events they produced and an external dispatcher decides
//! what to log, broadcast, or archive.

use plenum_types::{Decision, MeetingId, MemberId, MotionId, OfficialSource, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new proxy edge became active.
    ProxyDelegated {
        meeting_id: MeetingId,
        giver: MemberId,
        receiver: MemberId,
        at: Timestamp,
    },
    /// A giver's active edge was replaced by a new one.
    ProxyReplaced {
        meeting_id: MeetingId,
        giver: MemberId,
        previous_receiver: MemberId,
        receiver: MemberId,
        at: Timestamp,
    },
    /// A giver's active edge was revoked with no replacement.
    ProxyRevoked {
        meeting_id: MeetingId,
        giver: MemberId,
        receiver: MemberId,
        at: Timestamp,
    },
    /// A certified result was written onto a motion.
    OfficialResultRecorded {
        motion_id: MotionId,
        source: OfficialSource,
        decision: Decision,
        at: Timestamp,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_snake_case_kind() {
        let event = DomainEvent::OfficialResultRecorded {
            motion_id: MotionId::new(7),
            source: OfficialSource::Manual,
            decision: Decision::Adopted,
            at: Timestamp::new(1_000),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "official_result_recorded");
        assert_eq!(json["source"], "manual");
        assert_eq!(json["decision"], "adopted");

        let back: DomainEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
