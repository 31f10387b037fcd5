//! Bounded rolling history buffer feeding the chart sinks.

use crate::defaults;
use crate::signal::snapshot::{HistoryPoint, Snapshot};

/// Fixed-capacity ordered sequence of history points.
///
/// Append-and-trim only: new points go on the back, the front is evicted
/// once capacity is exceeded. Order is insertion order (chronological for
/// an in-order feed) and is never rearranged.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    points: Vec<HistoryPoint>,
    capacity: usize,
}

impl RollingHistory {
    /// Creates a history buffer with the default chart capacity.
    pub fn new() -> Self {
        Self::with_capacity(defaults::HISTORY_CAPACITY)
    }

    /// Creates a history buffer with a custom capacity.
    ///
    /// A capacity of zero keeps the buffer permanently empty.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Appends a point derived from `snapshot`, evicting from the front
    /// down to capacity.
    pub fn record(&mut self, snapshot: &Snapshot) {
        self.points.push(HistoryPoint::from_snapshot(snapshot));
        if self.points.len() > self.capacity {
            let excess = self.points.len() - self.capacity;
            self.points.drain(..excess);
        }
    }

    /// Returns the points oldest→newest.
    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    /// Returns the number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when no points are retained.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all retained points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new()
    }
}
