//! Typed change notifications published by the monitor runtime.
//!
//! Observers subscribe through a non-blocking channel passed in
//! `MonitorConfig`; delivery is best-effort (a full channel drops the
//! event) so a slow observer can never stall snapshot processing.

use crate::signal::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Event published by the monitor runtime on its observer channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// A valid snapshot was applied.
    Snapshot { snapshot: Snapshot, voice_total: u64 },
    /// Voice presence ended.
    VoiceEnded,
    /// A new alert was raised.
    AlertRaised { id: u64, doa: u16, timestamp: i64 },
    /// An alert entered its dismissing state.
    AlertDismissing { id: u64 },
    /// An alert left the queue.
    AlertRemoved { id: u64 },
    /// The cumulative counter was reset by user action.
    CounterReset,
    /// The runtime finished teardown.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = MonitorEvent::AlertRaised {
            id: 3,
            doa: 120,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"alert_raised\""));
        assert!(json.contains("\"doa\":120"));

        let back: MonitorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn snapshot_event_round_trip() {
        let event = MonitorEvent::Snapshot {
            snapshot: Snapshot::new(90, true, 1_700_000_000_000),
            voice_total: 17,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MonitorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
