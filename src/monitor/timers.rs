//! Cancellable deadline bookkeeping for alert lifecycle timers.
//!
//! Every pending alert transition (auto-dismiss, removal) is an entry
//! keyed by alert id. Cancellation is a first-class operation: manual
//! dismissal, overflow eviction, and subscription teardown all cancel
//! entries rather than letting them fire against stale state.

use std::time::Instant;

/// Which lifecycle transition a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Move an active alert into its dismissing state.
    AutoDismiss,
    /// Remove a dismissing alert from the collection.
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    alert_id: u64,
    kind: TimerKind,
    deadline: Instant,
}

/// Pending alert timers, keyed by alert id.
#[derive(Debug, Default)]
pub struct AlertTimers {
    entries: Vec<TimerEntry>,
}

impl AlertTimers {
    /// Creates an empty timer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` for `alert_id` at `deadline`, replacing any
    /// pending timer of the same kind for that alert.
    pub fn schedule(&mut self, alert_id: u64, kind: TimerKind, deadline: Instant) {
        self.entries
            .retain(|e| !(e.alert_id == alert_id && e.kind == kind));
        self.entries.push(TimerEntry {
            alert_id,
            kind,
            deadline,
        });
    }

    /// Cancels every pending timer for `alert_id`. Unknown ids are a no-op.
    pub fn cancel(&mut self, alert_id: u64) {
        self.entries.retain(|e| e.alert_id != alert_id);
    }

    /// Cancels one pending timer kind for `alert_id`, if present.
    pub fn cancel_kind(&mut self, alert_id: u64, kind: TimerKind) {
        self.entries
            .retain(|e| !(e.alert_id == alert_id && e.kind == kind));
    }

    /// Cancels every pending timer. Called on subscription teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns all timers due at `now`, ordered by deadline.
    pub fn fire_due(&mut self, now: Instant) -> Vec<(u64, TimerKind)> {
        let mut due: Vec<TimerEntry> = Vec::new();
        let mut remaining: Vec<TimerEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.deadline <= now {
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;

        due.sort_by_key(|e| e.deadline);
        due.into_iter().map(|e| (e.alert_id, e.kind)).collect()
    }

    /// Returns the earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Returns the number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base() -> Instant {
        Instant::now()
    }

    #[test]
    fn starts_empty() {
        let timers = AlertTimers::new();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn fire_due_returns_only_elapsed_entries() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(100));
        timers.schedule(2, TimerKind::AutoDismiss, t0 + Duration::from_millis(300));

        let fired = timers.fire_due(t0 + Duration::from_millis(150));
        assert_eq!(fired, vec![(1, TimerKind::AutoDismiss)]);
        assert_eq!(timers.len(), 1);

        let fired = timers.fire_due(t0 + Duration::from_millis(400));
        assert_eq!(fired, vec![(2, TimerKind::AutoDismiss)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn fire_due_orders_by_deadline() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(7, TimerKind::Remove, t0 + Duration::from_millis(50));
        timers.schedule(3, TimerKind::AutoDismiss, t0 + Duration::from_millis(20));

        let fired = timers.fire_due(t0 + Duration::from_millis(60));
        assert_eq!(
            fired,
            vec![(3, TimerKind::AutoDismiss), (7, TimerKind::Remove)]
        );
    }

    #[test]
    fn schedule_replaces_same_kind() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(100));
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(500));
        assert_eq!(timers.len(), 1);

        // Old deadline must not fire.
        assert!(timers.fire_due(t0 + Duration::from_millis(200)).is_empty());
        assert_eq!(
            timers.fire_due(t0 + Duration::from_millis(600)),
            vec![(1, TimerKind::AutoDismiss)]
        );
    }

    #[test]
    fn cancel_drops_both_kinds_for_id() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(10));
        timers.schedule(1, TimerKind::Remove, t0 + Duration::from_millis(20));
        timers.schedule(2, TimerKind::AutoDismiss, t0 + Duration::from_millis(30));

        timers.cancel(1);
        assert_eq!(timers.len(), 1);
        assert_eq!(
            timers.fire_due(t0 + Duration::from_millis(60)),
            vec![(2, TimerKind::AutoDismiss)]
        );
    }

    #[test]
    fn cancel_unknown_id_is_noop() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(10));

        timers.cancel(99);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn cancel_kind_leaves_other_kind() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(10));
        timers.schedule(1, TimerKind::Remove, t0 + Duration::from_millis(20));

        timers.cancel_kind(1, TimerKind::AutoDismiss);
        assert_eq!(
            timers.fire_due(t0 + Duration::from_millis(30)),
            vec![(1, TimerKind::Remove)]
        );
    }

    #[test]
    fn clear_cancels_everything() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(10));
        timers.schedule(2, TimerKind::Remove, t0 + Duration::from_millis(10));

        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.fire_due(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn next_deadline_is_minimum() {
        let t0 = base();
        let mut timers = AlertTimers::new();
        timers.schedule(1, TimerKind::AutoDismiss, t0 + Duration::from_millis(500));
        timers.schedule(2, TimerKind::AutoDismiss, t0 + Duration::from_millis(100));

        assert_eq!(timers.next_deadline(), Some(t0 + Duration::from_millis(100)));
    }
}
