//! Default configuration constants for whispermon.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Number of history points kept for charting.
///
/// Each snapshot arrival appends one point; older points are evicted from
/// the front once the buffer exceeds this capacity. 30 points at the
/// default 100 ms update interval covers the last ~3 seconds of activity.
pub const HISTORY_CAPACITY: usize = 30;

/// Maximum number of alerts visible at once.
///
/// Raising a sixth alert drops the oldest immediately, regardless of how
/// much of its display time remains.
pub const MAX_ACTIVE_ALERTS: usize = 5;

/// Time an alert stays active before it starts dismissing (milliseconds).
pub const ALERT_AUTO_DISMISS_MS: u64 = 5000;

/// Grace period between entering the dismissing state and removal
/// (milliseconds). Gives a rendering surface time to play an exit
/// transition before the entry disappears.
pub const ALERT_REMOVE_GRACE_MS: u64 = 400;

/// Default interval between generated snapshots for simulated and replay
/// sources (milliseconds). Matches the push cadence of the upstream
/// tracker hardware loop.
pub const UPDATE_INTERVAL_MS: u64 = 100;

/// Interval at which the monitor runtime checks alert timers (milliseconds).
pub const TICK_INTERVAL_MS: u64 = 50;

/// Exclusive upper bound for a valid direction-of-arrival angle in degrees.
pub const DOA_DEGREES: u16 = 360;

/// strftime-style format for history point time labels.
pub const TIME_LABEL_FORMAT: &str = "%H:%M:%S";

/// Maximum number of alert records retained by the event log store.
pub const EVENT_LOG_CAPACITY: usize = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_timing_constants_are_ordered() {
        // The grace period is a tail on the active window, not an overlap.
        assert!(ALERT_REMOVE_GRACE_MS < ALERT_AUTO_DISMISS_MS);
    }

    #[test]
    fn tick_interval_resolves_grace_period() {
        // Timer checks must run at least a few times per grace window or
        // removal visibly lags the dismiss animation.
        assert!(TICK_INTERVAL_MS * 2 <= ALERT_REMOVE_GRACE_MS);
    }
}
