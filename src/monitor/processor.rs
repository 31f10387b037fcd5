//! Live signal processor.
//!
//! Consumes the push feed of sensor snapshots and derives the observable
//! monitor state: current reading, bounded chart history, the
//! edge-triggered alert queue, and the cumulative voice counter. All
//! mutation happens through `observe`, `tick`, and the explicit alert
//! operations; the runtime serializes those calls, so the processor
//! itself needs no locking.

use crate::alert::announcer::{Announcer, NullAnnouncer};
use crate::defaults;
use crate::monitor::alerts::{AlertChange, AlertEvent, AlertQueue};
use crate::monitor::clock::{Clock, SystemClock};
use crate::signal::edge::{EdgeDetector, VoiceEdge};
use crate::signal::history::RollingHistory;
use crate::signal::snapshot::{HistoryPoint, Snapshot};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the live signal processor.
#[derive(Debug, Clone, Copy)]
pub struct ProcessorConfig {
    /// Chart history capacity.
    pub history_capacity: usize,
    /// Maximum concurrently visible alerts.
    pub max_alerts: usize,
    /// Delay before an untouched alert starts dismissing (ms).
    pub auto_dismiss_ms: u64,
    /// Delay between dismissing and removal (ms).
    pub remove_grace_ms: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            history_capacity: defaults::HISTORY_CAPACITY,
            max_alerts: defaults::MAX_ACTIVE_ALERTS,
            auto_dismiss_ms: defaults::ALERT_AUTO_DISMISS_MS,
            remove_grace_ms: defaults::ALERT_REMOVE_GRACE_MS,
        }
    }
}

/// State change produced by a processor call, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorEvent {
    /// A valid snapshot was applied to current state and history.
    Snapshot(Snapshot),
    /// Voice presence ended (falling edge). Informational only.
    VoiceEnded,
    /// A rising voice edge raised a new alert.
    AlertRaised { id: u64, doa: u16, timestamp: i64 },
    /// An alert entered its dismissing state.
    AlertDismissing { id: u64 },
    /// An alert left the queue.
    AlertRemoved { id: u64 },
}

/// Stream processor over sensor snapshots.
pub struct LiveSignalProcessor<C: Clock = SystemClock> {
    clock: C,
    announcer: Arc<dyn Announcer>,
    auto_dismiss: Duration,
    remove_grace: Duration,
    current: Option<Snapshot>,
    history: RollingHistory,
    edge: EdgeDetector,
    queue: AlertQueue,
    voice_total: u64,
    active: bool,
}

impl LiveSignalProcessor<SystemClock> {
    /// Creates a processor with the system clock and no side effects.
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LiveSignalProcessor<C> {
    /// Creates a processor with a custom clock (deterministic testing).
    pub fn with_clock(config: ProcessorConfig, clock: C) -> Self {
        Self {
            clock,
            announcer: Arc::new(NullAnnouncer),
            auto_dismiss: Duration::from_millis(config.auto_dismiss_ms),
            remove_grace: Duration::from_millis(config.remove_grace_ms),
            current: None,
            history: RollingHistory::with_capacity(config.history_capacity),
            edge: EdgeDetector::new(),
            queue: AlertQueue::with_limits(
                config.max_alerts,
                Duration::from_millis(config.auto_dismiss_ms),
                Duration::from_millis(config.remove_grace_ms),
            ),
            voice_total: 0,
            active: true,
        }
    }

    /// Sets the announcer invoked on raised alerts.
    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    /// Applies one update from the snapshot source.
    ///
    /// Absent (`None`) and out-of-domain payloads are ignored without any
    /// state mutation. Each valid snapshot is treated as full ground
    /// truth: it becomes the current reading, lands in the history, bumps
    /// the counter when voiced, and is edge-checked against the previous
    /// voice flag.
    pub fn observe(&mut self, update: Option<Snapshot>) -> Vec<ProcessorEvent> {
        if !self.active {
            return Vec::new();
        }
        let Some(snapshot) = update else {
            return Vec::new();
        };
        if !snapshot.is_valid() {
            return Vec::new();
        }

        self.current = Some(snapshot);
        self.history.record(&snapshot);
        if snapshot.is_voice {
            // Level-triggered: every voiced sample counts, edges don't matter.
            self.voice_total += 1;
        }

        let mut events = vec![ProcessorEvent::Snapshot(snapshot)];
        match self.edge.observe(snapshot.is_voice) {
            VoiceEdge::Rising => {
                events.extend(self.raise_alert(snapshot.doa, snapshot.timestamp));
            }
            VoiceEdge::Falling => events.push(ProcessorEvent::VoiceEnded),
            VoiceEdge::Level => {}
        }
        events
    }

    /// Fires any due alert timers.
    pub fn tick(&mut self) -> Vec<ProcessorEvent> {
        if !self.active {
            return Vec::new();
        }
        let now = self.clock.now();
        let changes = self.queue.tick(now);
        self.map_changes(changes)
    }

    /// Begins dismissing the alert with `id` (user action).
    ///
    /// Idempotent; stale ids are a no-op.
    pub fn dismiss(&mut self, id: u64) -> Vec<ProcessorEvent> {
        if !self.active {
            return Vec::new();
        }
        let now = self.clock.now();
        let changes = self.queue.begin_dismiss(id, now);
        self.map_changes(changes)
    }

    /// Removes the alert with `id` immediately; absent ids are a no-op.
    pub fn remove_alert(&mut self, id: u64) -> Vec<ProcessorEvent> {
        if !self.active {
            return Vec::new();
        }
        let changes = self.queue.remove(id);
        self.map_changes(changes)
    }

    /// Resets the cumulative voice counter. No other state is touched.
    pub fn reset_counter(&mut self) {
        self.voice_total = 0;
    }

    /// Cancels all pending timers and discards derived state.
    ///
    /// After shutdown no call mutates the processor; a fresh subscription
    /// uses a fresh instance.
    pub fn shutdown(&mut self) {
        self.queue.shutdown();
        self.history.clear();
        self.edge.reset();
        self.current = None;
        self.active = false;
    }

    fn raise_alert(&mut self, doa: u16, timestamp: i64) -> Vec<ProcessorEvent> {
        let now = self.clock.now();
        let changes = self.queue.raise(doa, timestamp, now);

        // Fire-and-forget side effects: outcome is ignored by contract,
        // a failed cue never touches queue or counter state.
        self.announcer.play_tone().ok();
        if self.announcer.has_permission() {
            self.announcer.notify(doa).ok();
        }

        self.map_changes(changes)
    }

    fn map_changes(&self, changes: Vec<AlertChange>) -> Vec<ProcessorEvent> {
        changes
            .into_iter()
            .map(|change| match change {
                AlertChange::Raised(id) => {
                    let entry = self.queue.alerts().iter().find(|a| a.id == id);
                    ProcessorEvent::AlertRaised {
                        id,
                        doa: entry.map(|a| a.doa).unwrap_or_default(),
                        timestamp: entry.map(|a| a.timestamp).unwrap_or_default(),
                    }
                }
                AlertChange::Dismissing(id) => ProcessorEvent::AlertDismissing { id },
                AlertChange::Removed(id) => ProcessorEvent::AlertRemoved { id },
            })
            .collect()
    }

    /// Returns the most recent valid snapshot.
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Returns the chart history, oldest first.
    pub fn history(&self) -> &[HistoryPoint] {
        self.history.points()
    }

    /// Returns the visible alerts, newest first.
    pub fn alerts(&self) -> &[AlertEvent] {
        self.queue.alerts()
    }

    /// Returns the cumulative count of voiced samples.
    pub fn voice_total(&self) -> u64 {
        self.voice_total
    }

    /// Returns the number of pending alert timers.
    pub fn pending_timers(&self) -> usize {
        self.queue.pending_timers()
    }

    /// Returns the configured auto-dismiss delay.
    pub fn auto_dismiss(&self) -> Duration {
        self.auto_dismiss
    }

    /// Returns the configured dismiss-to-removal grace period.
    pub fn remove_grace(&self) -> Duration {
        self.remove_grace
    }

    /// Returns false once `shutdown` has run.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
