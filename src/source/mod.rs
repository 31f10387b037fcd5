//! Snapshot sources: the push feed the monitor subscribes to.
//!
//! The realtime transport behind the feed is deliberately opaque: the
//! contract is only "whole-snapshot updates, in delivery order, possibly
//! null". `ChannelSource` adapts any external transport; the simulator
//! and replay sources exist for demos, development, and tests.

pub mod replay;
pub mod simulate;

use crate::error::{MonitorError, Result};
use crate::signal::snapshot::Snapshot;
use tokio::sync::mpsc;

pub use replay::ReplaySource;
pub use simulate::{SimulatedSource, SimulateConfig, VoicePhase};

/// One delivery from a source. `None` models an absent/null payload,
/// which the processor ignores.
pub type SnapshotUpdate = Option<Snapshot>;

/// Push source of sensor snapshots.
///
/// `subscribe` hands out the receiving end of the feed exactly once;
/// dropping the receiver or calling `unsubscribe` tears the feed down.
pub trait SnapshotSource: Send + 'static {
    /// Starts the feed and returns its receiver.
    fn subscribe(&mut self) -> Result<mpsc::Receiver<SnapshotUpdate>>;

    /// Stops the feed. Idempotent.
    fn unsubscribe(&mut self) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "source"
    }
}

/// Adapter for external push transports.
///
/// The owner of the transport keeps the sender and forwards every
/// upstream update into it; the monitor consumes the receiver.
pub struct ChannelSource {
    sender: mpsc::Sender<SnapshotUpdate>,
    receiver: Option<mpsc::Receiver<SnapshotUpdate>>,
}

impl ChannelSource {
    /// Creates a channel-backed source with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// Returns a sender for feeding updates into the source.
    pub fn sender(&self) -> mpsc::Sender<SnapshotUpdate> {
        self.sender.clone()
    }
}

impl SnapshotSource for ChannelSource {
    fn subscribe(&mut self) -> Result<mpsc::Receiver<SnapshotUpdate>> {
        self.receiver
            .take()
            .ok_or(MonitorError::SourceAlreadySubscribed)
    }

    fn unsubscribe(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}

/// Mock snapshot source for testing.
///
/// Delivers its configured updates immediately and then closes the feed.
#[derive(Debug, Clone, Default)]
pub struct MockSnapshotSource {
    updates: Vec<SnapshotUpdate>,
    should_fail_subscribe: bool,
    error_message: String,
}

impl MockSnapshotSource {
    /// Creates a mock with no updates.
    pub fn new() -> Self {
        Self {
            updates: Vec::new(),
            should_fail_subscribe: false,
            error_message: "mock source error".to_string(),
        }
    }

    /// Configures the updates to deliver, in order.
    pub fn with_updates(mut self, updates: Vec<SnapshotUpdate>) -> Self {
        self.updates = updates;
        self
    }

    /// Appends one update.
    pub fn with_update(mut self, update: SnapshotUpdate) -> Self {
        self.updates.push(update);
        self
    }

    /// Configures the mock to fail on subscribe.
    pub fn with_subscribe_failure(mut self) -> Self {
        self.should_fail_subscribe = true;
        self
    }

    /// Configures the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }
}

impl SnapshotSource for MockSnapshotSource {
    fn subscribe(&mut self) -> Result<mpsc::Receiver<SnapshotUpdate>> {
        if self.should_fail_subscribe {
            return Err(MonitorError::SourceSubscribe {
                message: self.error_message.clone(),
            });
        }

        let (tx, rx) = mpsc::channel(self.updates.len().max(1));
        for update in self.updates.drain(..) {
            // Capacity covers every update; a full channel is impossible here.
            tx.try_send(update).ok();
        }
        // Dropping the sender closes the feed once the updates drain.
        Ok(rx)
    }

    fn unsubscribe(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(doa: u16) -> Snapshot {
        Snapshot::new(doa, false, 1_700_000_000_000)
    }

    #[test]
    fn source_trait_is_object_safe() {
        let _source: Box<dyn SnapshotSource> = Box::new(MockSnapshotSource::new());
    }

    #[tokio::test]
    async fn mock_source_delivers_updates_in_order_then_closes() {
        let mut source = MockSnapshotSource::new()
            .with_update(Some(snapshot(1)))
            .with_update(None)
            .with_update(Some(snapshot(3)));

        let mut rx = source.subscribe().unwrap();
        assert_eq!(rx.recv().await, Some(Some(snapshot(1))));
        assert_eq!(rx.recv().await, Some(None));
        assert_eq!(rx.recv().await, Some(Some(snapshot(3))));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn mock_source_subscribe_failure() {
        let mut source = MockSnapshotSource::new()
            .with_subscribe_failure()
            .with_error_message("transport offline");

        match source.subscribe() {
            Err(MonitorError::SourceSubscribe { message }) => {
                assert_eq!(message, "transport offline");
            }
            other => panic!("Expected SourceSubscribe error, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn channel_source_forwards_sender_updates() {
        let mut source = ChannelSource::new(8);
        let feed = source.sender();
        let mut rx = source.subscribe().unwrap();

        feed.send(Some(snapshot(45))).await.unwrap();
        assert_eq!(rx.recv().await, Some(Some(snapshot(45))));

        drop(feed);
        // The source keeps its own sender clone, so the feed stays open
        // until the source itself goes away.
        drop(source);
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn channel_source_second_subscribe_fails() {
        let mut source = ChannelSource::new(4);
        let _rx = source.subscribe().unwrap();
        assert!(matches!(
            source.subscribe(),
            Err(MonitorError::SourceAlreadySubscribed)
        ));
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut source = MockSnapshotSource::new();
        assert!(source.unsubscribe().is_ok());
        assert!(source.unsubscribe().is_ok());
    }
}
