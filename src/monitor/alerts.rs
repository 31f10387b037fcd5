//! Alert queue: bounded, newest-first, with a timed per-alert lifecycle.
//!
//! Each alert moves through `active → dismissing → removed`, linear with
//! no back-transitions; the terminal state is absence from the queue.
//! Dismissal is driven either by the auto-dismiss timer or by an explicit
//! user request, and removal follows a short grace period so a rendering
//! surface can play an exit transition.

use crate::defaults;
use crate::monitor::timers::{AlertTimers, TimerKind};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One visible alert, derived from a rising voice edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Monotonically increasing id, unique for the queue's lifetime.
    pub id: u64,
    /// Direction of arrival copied from the triggering snapshot.
    pub doa: u16,
    /// Timestamp copied from the triggering snapshot (epoch ms).
    pub timestamp: i64,
    /// True once the exit phase has been entered; the entry is still
    /// present, pending removal.
    pub dismissing: bool,
}

/// State change produced by a queue operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChange {
    /// A new alert entered the queue.
    Raised(u64),
    /// An alert entered its dismissing state.
    Dismissing(u64),
    /// An alert left the queue.
    Removed(u64),
}

/// Bounded newest-first alert collection with cancellable timers.
#[derive(Debug)]
pub struct AlertQueue {
    entries: Vec<AlertEvent>,
    timers: AlertTimers,
    next_id: u64,
    max_alerts: usize,
    auto_dismiss: Duration,
    remove_grace: Duration,
}

impl AlertQueue {
    /// Creates a queue with the default cap and timing.
    pub fn new() -> Self {
        Self::with_limits(
            defaults::MAX_ACTIVE_ALERTS,
            Duration::from_millis(defaults::ALERT_AUTO_DISMISS_MS),
            Duration::from_millis(defaults::ALERT_REMOVE_GRACE_MS),
        )
    }

    /// Creates a queue with custom cap and timing.
    pub fn with_limits(max_alerts: usize, auto_dismiss: Duration, remove_grace: Duration) -> Self {
        Self {
            entries: Vec::new(),
            timers: AlertTimers::new(),
            next_id: 1,
            max_alerts,
            auto_dismiss,
            remove_grace,
        }
    }

    /// Raises a new alert at the head of the queue.
    ///
    /// The cap is unconditional: if the queue overflows, tail entries are
    /// dropped immediately with their timers cancelled, regardless of how
    /// much of their own display time remained.
    pub fn raise(&mut self, doa: u16, timestamp: i64, now: Instant) -> Vec<AlertChange> {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.insert(
            0,
            AlertEvent {
                id,
                doa,
                timestamp,
                dismissing: false,
            },
        );
        self.timers
            .schedule(id, TimerKind::AutoDismiss, now + self.auto_dismiss);

        let mut changes = vec![AlertChange::Raised(id)];
        while self.entries.len() > self.max_alerts {
            let Some(dropped) = self.entries.pop() else {
                break;
            };
            self.timers.cancel(dropped.id);
            changes.push(AlertChange::Removed(dropped.id));
        }
        changes
    }

    /// Moves the alert with `id` into its dismissing state and schedules
    /// removal after the grace period.
    ///
    /// Idempotent: a second call for the same id (or a call for an absent
    /// id) changes nothing and schedules no duplicate timer.
    pub fn begin_dismiss(&mut self, id: u64, now: Instant) -> Vec<AlertChange> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return Vec::new();
        };
        if entry.dismissing {
            return Vec::new();
        }

        entry.dismissing = true;
        self.timers.cancel_kind(id, TimerKind::AutoDismiss);
        self.timers
            .schedule(id, TimerKind::Remove, now + self.remove_grace);
        vec![AlertChange::Dismissing(id)]
    }

    /// Deletes the alert with `id` if present; absent ids are a no-op.
    pub fn remove(&mut self, id: u64) -> Vec<AlertChange> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.timers.cancel(id);
        if self.entries.len() < before {
            vec![AlertChange::Removed(id)]
        } else {
            Vec::new()
        }
    }

    /// Fires all timers due at `now`, applying their transitions in
    /// deadline order.
    pub fn tick(&mut self, now: Instant) -> Vec<AlertChange> {
        let mut changes = Vec::new();
        for (id, kind) in self.timers.fire_due(now) {
            match kind {
                TimerKind::AutoDismiss => changes.extend(self.begin_dismiss(id, now)),
                TimerKind::Remove => changes.extend(self.remove(id)),
            }
        }
        changes
    }

    /// Returns the visible alerts, newest first.
    pub fn alerts(&self) -> &[AlertEvent] {
        &self.entries
    }

    /// Returns the number of pending lifecycle timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancels every pending timer and drops all entries.
    ///
    /// Called on subscription teardown; afterwards no `tick` can mutate
    /// anything.
    pub fn shutdown(&mut self) {
        self.timers.clear();
        self.entries.clear();
    }
}

impl Default for AlertQueue {
    fn default() -> Self {
        Self::new()
    }
}
