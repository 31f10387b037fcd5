//! Monitor runtime: one tokio task owns the processor and serializes
//! every mutation (source push, timer tick, handle command), so the
//! shared state never sees interleaved writers.
//!
//! Teardown is a hard contract: stopping the monitor cancels every
//! outstanding alert timer before the task exits, whether shutdown came
//! from the handle, from dropping it, or from the source closing.

use crate::alert::announcer::Announcer;
use crate::defaults;
use crate::error::Result;
use crate::monitor::clock::{Clock, SystemClock};
use crate::monitor::event::MonitorEvent;
use crate::monitor::processor::{LiveSignalProcessor, ProcessorConfig, ProcessorEvent};
use crate::monitor::sink::{AlertSink, ChartSink};
use crate::source::SnapshotSource;
use crate::store::event_log::{AlertHistory, AlertRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Configuration for the monitor runtime.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Processor configuration (capacities and alert timing).
    pub processor: ProcessorConfig,
    /// Interval between alert-timer checks (ms).
    pub tick_interval_ms: u64,
    /// Buffer size of the handle command channel.
    pub command_buffer: usize,
    /// Optional event sender for observers (non-blocking; a full channel
    /// drops events rather than stalling the feed).
    pub event_tx: Option<crossbeam_channel::Sender<MonitorEvent>>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            processor: ProcessorConfig::default(),
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
            command_buffer: 32,
            event_tx: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorCommand {
    Dismiss(u64),
    ResetCounter,
    Shutdown,
}

/// Handle given to notification surfaces for requesting dismissal by
/// alert id.
#[derive(Debug, Clone)]
pub struct DismissHandle {
    tx: mpsc::Sender<MonitorCommand>,
}

impl DismissHandle {
    /// Requests dismissal of the alert with `id`.
    ///
    /// Returns false if the monitor is gone or its command buffer is
    /// full; stale requests are harmless either way.
    pub fn request_dismiss(&self, id: u64) -> bool {
        self.tx.try_send(MonitorCommand::Dismiss(id)).is_ok()
    }
}

/// Monitor builder and launcher.
pub struct Monitor {
    config: MonitorConfig,
    clock: Arc<dyn Clock>,
    event_log: Option<Box<dyn AlertHistory>>,
}

impl Monitor {
    /// Creates a monitor with the system clock and no event log.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            event_log: None,
        }
    }

    /// Sets a custom clock (for deterministic testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the alert history recorder fed on every raised alert.
    pub fn with_event_log(mut self, event_log: Box<dyn AlertHistory>) -> Self {
        self.event_log = Some(event_log);
        self
    }

    /// Subscribes to the source and starts the monitor task.
    ///
    /// # Arguments
    /// * `source` - Snapshot feed to subscribe to
    /// * `chart` - Consumer of the rolling history
    /// * `alerts` - Consumer of the alert collection (gets the dismiss handle)
    /// * `announcer` - Best-effort side channel fired on raised alerts
    pub fn start(
        self,
        mut source: Box<dyn SnapshotSource>,
        mut chart: Box<dyn ChartSink>,
        mut alerts: Box<dyn AlertSink>,
        announcer: Arc<dyn Announcer>,
    ) -> Result<MonitorHandle> {
        let mut feed = source.subscribe()?;

        let (cmd_tx, mut cmd_rx) = mpsc::channel(self.config.command_buffer.max(1));
        alerts.bind(DismissHandle {
            tx: cmd_tx.clone(),
        });

        let running = Arc::new(AtomicBool::new(true));
        let task_running = running.clone();

        let mut processor =
            LiveSignalProcessor::with_clock(self.config.processor, self.clock.clone())
                .with_announcer(announcer);
        let event_tx = self.config.event_tx.clone();
        let mut event_log = self.event_log;
        let tick_interval = Duration::from_millis(self.config.tick_interval_ms.max(1));

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            // Surfaces render the empty state before the first push.
            chart.on_history(processor.history());
            alerts.on_alerts(processor.alerts());

            loop {
                tokio::select! {
                    command = cmd_rx.recv() => match command {
                        Some(MonitorCommand::Dismiss(id)) => {
                            let events = processor.dismiss(id);
                            deliver(
                                &events,
                                &processor,
                                chart.as_mut(),
                                alerts.as_mut(),
                                &event_tx,
                                &mut event_log,
                            );
                        }
                        Some(MonitorCommand::ResetCounter) => {
                            processor.reset_counter();
                            publish(&event_tx, MonitorEvent::CounterReset);
                        }
                        // Explicit shutdown, or every handle dropped.
                        Some(MonitorCommand::Shutdown) | None => break,
                    },
                    update = feed.recv() => match update {
                        Some(update) => {
                            let events = processor.observe(update);
                            deliver(
                                &events,
                                &processor,
                                chart.as_mut(),
                                alerts.as_mut(),
                                &event_tx,
                                &mut event_log,
                            );
                        }
                        // Source closed its feed.
                        None => break,
                    },
                    _ = interval.tick() => {
                        let events = processor.tick();
                        deliver(
                            &events,
                            &processor,
                            chart.as_mut(),
                            alerts.as_mut(),
                            &event_tx,
                            &mut event_log,
                        );
                    }
                }
            }

            let total = processor.voice_total();
            processor.shutdown();
            if let Err(e) = source.unsubscribe() {
                eprintln!("whispermon: {} source unsubscribe failed: {e}", source.name());
            }
            // Deliver the cleared state so surfaces don't show a stale frame.
            chart.on_history(processor.history());
            alerts.on_alerts(processor.alerts());
            publish(&event_tx, MonitorEvent::Stopped);
            task_running.store(false, Ordering::SeqCst);
            total
        });

        Ok(MonitorHandle {
            cmd_tx,
            running,
            join: Some(join),
        })
    }
}

fn publish(event_tx: &Option<crossbeam_channel::Sender<MonitorEvent>>, event: MonitorEvent) {
    if let Some(tx) = event_tx {
        // Full or disconnected observer channels drop the event.
        tx.try_send(event).ok();
    }
}

fn deliver(
    events: &[ProcessorEvent],
    processor: &LiveSignalProcessor<Arc<dyn Clock>>,
    chart: &mut dyn ChartSink,
    alerts: &mut dyn AlertSink,
    event_tx: &Option<crossbeam_channel::Sender<MonitorEvent>>,
    event_log: &mut Option<Box<dyn AlertHistory>>,
) {
    if events.is_empty() {
        return;
    }

    let mut history_changed = false;
    let mut alerts_changed = false;
    for event in events {
        match event {
            ProcessorEvent::Snapshot(snapshot) => {
                history_changed = true;
                publish(
                    event_tx,
                    MonitorEvent::Snapshot {
                        snapshot: *snapshot,
                        voice_total: processor.voice_total(),
                    },
                );
            }
            ProcessorEvent::VoiceEnded => publish(event_tx, MonitorEvent::VoiceEnded),
            ProcessorEvent::AlertRaised { id, doa, timestamp } => {
                alerts_changed = true;
                if let Some(log) = event_log {
                    log.record(&AlertRecord {
                        id: *id,
                        doa: *doa,
                        timestamp: *timestamp,
                    });
                }
                publish(
                    event_tx,
                    MonitorEvent::AlertRaised {
                        id: *id,
                        doa: *doa,
                        timestamp: *timestamp,
                    },
                );
            }
            ProcessorEvent::AlertDismissing { id } => {
                alerts_changed = true;
                publish(event_tx, MonitorEvent::AlertDismissing { id: *id });
            }
            ProcessorEvent::AlertRemoved { id } => {
                alerts_changed = true;
                publish(event_tx, MonitorEvent::AlertRemoved { id: *id });
            }
        }
    }

    if history_changed {
        chart.on_history(processor.history());
    }
    if alerts_changed {
        alerts.on_alerts(processor.alerts());
    }
}

/// Handle to a running monitor.
pub struct MonitorHandle {
    cmd_tx: mpsc::Sender<MonitorCommand>,
    running: Arc<AtomicBool>,
    join: Option<JoinHandle<u64>>,
}

impl MonitorHandle {
    /// Requests dismissal of the alert with `id`.
    pub fn dismiss(&self, id: u64) -> bool {
        self.cmd_tx.try_send(MonitorCommand::Dismiss(id)).is_ok()
    }

    /// Resets the cumulative voice counter.
    pub fn reset_counter(&self) -> bool {
        self.cmd_tx.try_send(MonitorCommand::ResetCounter).is_ok()
    }

    /// Returns a dismiss handle for wiring into additional surfaces.
    pub fn dismiss_handle(&self) -> DismissHandle {
        DismissHandle {
            tx: self.cmd_tx.clone(),
        }
    }

    /// Returns true while the monitor task is alive.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the monitor and returns the final cumulative voice count.
    ///
    /// Waits up to 5s for the task to finish its teardown (cancel timers,
    /// unsubscribe, flush sinks); after the deadline the task is aborted.
    pub async fn stop(mut self) -> u64 {
        self.cmd_tx.send(MonitorCommand::Shutdown).await.ok();

        let Some(join) = self.join.take() else {
            return 0;
        };
        let abort = join.abort_handle();
        match tokio::time::timeout(Duration::from_secs(5), join).await {
            Ok(Ok(total)) => total,
            Ok(Err(e)) => {
                eprintln!("whispermon: monitor task panicked: {e}");
                0
            }
            Err(_) => {
                eprintln!("whispermon: shutdown timeout — aborting monitor task");
                abort.abort();
                0
            }
        }
    }
}
