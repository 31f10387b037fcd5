//! Scripted snapshot generator.
//!
//! Stands in for the hardware tracker during demos and development:
//! phases of silence and voice at a fixed push cadence, mirroring the
//! 100 ms update loop of the real sensor backend.

use crate::defaults;
use crate::error::{MonitorError, Result};
use crate::signal::snapshot::Snapshot;
use crate::source::{SnapshotSource, SnapshotUpdate};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One scripted stretch of the voice flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePhase {
    /// Voice flag pushed for every update in this phase.
    pub is_voice: bool,
    /// Number of updates in this phase.
    pub count: u32,
    /// DOA angle reported during this phase.
    pub doa: u16,
}

/// Configuration for the simulated source.
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    /// Interval between pushed updates (ms).
    pub interval_ms: u64,
    /// Phases played in order.
    pub phases: Vec<VoicePhase>,
    /// Whether to loop the phase script until unsubscribed.
    pub repeat: bool,
    /// Feed channel capacity.
    pub channel_buffer: usize,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::UPDATE_INTERVAL_MS,
            phases: vec![
                VoicePhase {
                    is_voice: false,
                    count: 25,
                    doa: 180,
                },
                VoicePhase {
                    is_voice: true,
                    count: 8,
                    doa: 135,
                },
                VoicePhase {
                    is_voice: false,
                    count: 30,
                    doa: 180,
                },
                VoicePhase {
                    is_voice: true,
                    count: 4,
                    doa: 310,
                },
                VoicePhase {
                    is_voice: false,
                    count: 40,
                    doa: 180,
                },
            ],
            repeat: true,
            channel_buffer: 64,
        }
    }
}

/// Snapshot source that plays a phase script.
pub struct SimulatedSource {
    config: SimulateConfig,
    task: Option<JoinHandle<()>>,
}

impl SimulatedSource {
    /// Creates a simulator with the default classroom-like script.
    pub fn new() -> Self {
        Self::with_config(SimulateConfig::default())
    }

    /// Creates a simulator with a custom script.
    pub fn with_config(config: SimulateConfig) -> Self {
        Self { config, task: None }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for SimulatedSource {
    /// Starts the script. Must be called within a tokio runtime.
    fn subscribe(&mut self) -> Result<mpsc::Receiver<SnapshotUpdate>> {
        if self.task.is_some() {
            return Err(MonitorError::SourceAlreadySubscribed);
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer.max(1));
        let config = self.config.clone();
        let handle = tokio::spawn(async move {
            let interval = Duration::from_millis(config.interval_ms.max(1));
            loop {
                if config.phases.is_empty() {
                    return;
                }
                for phase in &config.phases {
                    for _ in 0..phase.count {
                        let snapshot = Snapshot::new(
                            phase.doa,
                            phase.is_voice,
                            Utc::now().timestamp_millis(),
                        );
                        if tx.send(Some(snapshot)).await.is_err() {
                            return;
                        }
                        tokio::time::sleep(interval).await;
                    }
                }
                if !config.repeat {
                    return;
                }
            }
        });

        self.task = Some(handle);
        Ok(rx)
    }

    fn unsubscribe(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "simulate"
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
