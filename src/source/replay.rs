//! Replay source: feeds recorded snapshots from a JSONL file.
//!
//! One update per line, either a snapshot object or `null` for an absent
//! payload. Lines are replayed in file order at a fixed cadence, then
//! the feed closes.

use crate::defaults;
use crate::error::{MonitorError, Result};
use crate::source::{SnapshotSource, SnapshotUpdate};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Snapshot source backed by a recorded JSONL session.
pub struct ReplaySource {
    path: PathBuf,
    interval: Duration,
    channel_buffer: usize,
    task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    /// Creates a replay source for `path` at the default push cadence.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: Duration::from_millis(defaults::UPDATE_INTERVAL_MS),
            channel_buffer: 64,
            task: None,
        }
    }

    /// Overrides the interval between replayed updates.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Parses the file into updates, failing on the first bad line.
    fn load_updates(&self) -> Result<Vec<SnapshotUpdate>> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| MonitorError::Replay {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut updates = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let update: SnapshotUpdate =
                serde_json::from_str(line).map_err(|e| MonitorError::Replay {
                    path: self.path.display().to_string(),
                    message: format!("line {}: {}", index + 1, e),
                })?;
            updates.push(update);
        }
        Ok(updates)
    }
}

impl SnapshotSource for ReplaySource {
    /// Starts the replay. Must be called within a tokio runtime.
    fn subscribe(&mut self) -> Result<mpsc::Receiver<SnapshotUpdate>> {
        if self.task.is_some() {
            return Err(MonitorError::SourceAlreadySubscribed);
        }

        let updates = self.load_updates()?;
        let interval = self.interval.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel(self.channel_buffer.max(1));

        let handle = tokio::spawn(async move {
            for update in updates {
                if tx.send(update).await.is_err() {
                    return;
                }
                tokio::time::sleep(interval).await;
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
        "replay"
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
