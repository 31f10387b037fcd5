//! Sink traits for monitor output.
//!
//! Two consumers exist at the boundary: a chart surface fed the rolling
//! history and a notification surface fed the alert collection plus a
//! dismiss handle. Collector implementations support tests and library
//! embedding.

use crate::monitor::alerts::AlertEvent;
use crate::monitor::runtime::DismissHandle;
use crate::signal::snapshot::HistoryPoint;
use std::sync::{Arc, Mutex};

/// Consumer of the rolling chart history.
///
/// Called with the full ordered sequence (oldest→newest, bounded) on
/// every change; an empty sequence is valid.
pub trait ChartSink: Send + 'static {
    /// Handles the updated history.
    fn on_history(&mut self, history: &[HistoryPoint]);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "chart"
    }
}

/// Consumer of the alert collection.
///
/// Called with the visible alerts (newest first, bounded) on every
/// change. `bind` hands over a dismiss handle so the surface can request
/// dismissal keyed by alert id.
pub trait AlertSink: Send + 'static {
    /// Handles the updated alert collection.
    fn on_alerts(&mut self, alerts: &[AlertEvent]);

    /// Receives the dismiss handle when the monitor starts.
    fn bind(&mut self, _dismiss: DismissHandle) {}

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "alerts"
    }
}

/// Chart sink that keeps the latest history for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectorChartSink {
    latest: Arc<Mutex<Vec<HistoryPoint>>>,
    updates: Arc<Mutex<usize>>,
}

impl CollectorChartSink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently delivered history.
    pub fn latest(&self) -> Vec<HistoryPoint> {
        #[allow(clippy::unwrap_used)]
        self.latest.lock().unwrap().clone()
    }

    /// Returns how many times the sink was called.
    pub fn update_count(&self) -> usize {
        #[allow(clippy::unwrap_used)]
        *self.updates.lock().unwrap()
    }
}

impl ChartSink for CollectorChartSink {
    fn on_history(&mut self, history: &[HistoryPoint]) {
        #[allow(clippy::unwrap_used)]
        {
            *self.latest.lock().unwrap() = history.to_vec();
            *self.updates.lock().unwrap() += 1;
        }
    }

    fn name(&self) -> &'static str {
        "collector-chart"
    }
}

/// Alert sink that keeps the latest collection for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectorAlertSink {
    latest: Arc<Mutex<Vec<AlertEvent>>>,
    dismiss: Arc<Mutex<Option<DismissHandle>>>,
}

impl CollectorAlertSink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently delivered alerts.
    pub fn latest(&self) -> Vec<AlertEvent> {
        #[allow(clippy::unwrap_used)]
        self.latest.lock().unwrap().clone()
    }

    /// Returns the bound dismiss handle, if the monitor has started.
    pub fn dismiss_handle(&self) -> Option<DismissHandle> {
        #[allow(clippy::unwrap_used)]
        self.dismiss.lock().unwrap().clone()
    }
}

impl AlertSink for CollectorAlertSink {
    fn on_alerts(&mut self, alerts: &[AlertEvent]) {
        #[allow(clippy::unwrap_used)]
        {
            *self.latest.lock().unwrap() = alerts.to_vec();
        }
    }

    fn bind(&mut self, dismiss: DismissHandle) {
        #[allow(clippy::unwrap_used)]
        {
            *self.dismiss.lock().unwrap() = Some(dismiss);
        }
    }

    fn name(&self) -> &'static str {
        "collector-alerts"
    }
}

/// Sink that discards everything. Useful when only one surface matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ChartSink for NullSink {
    fn on_history(&mut self, _history: &[HistoryPoint]) {}

    fn name(&self) -> &'static str {
        "null"
    }
}

impl AlertSink for NullSink {
    fn on_alerts(&mut self, _alerts: &[AlertEvent]) {}

    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::snapshot::Snapshot;

    #[test]
    fn sink_traits_are_object_safe() {
        let _chart: Box<dyn ChartSink> = Box::new(CollectorChartSink::new());
        let _alerts: Box<dyn AlertSink> = Box::new(CollectorAlertSink::new());
    }

    #[test]
    fn collector_chart_sink_keeps_latest() {
        let mut sink = CollectorChartSink::new();
        let reader = sink.clone();

        let point = HistoryPoint::from_snapshot(&Snapshot::new(5, true, 1_700_000_000_000));
        sink.on_history(&[point.clone()]);
        sink.on_history(&[point.clone(), point.clone()]);

        assert_eq!(reader.latest().len(), 2);
        assert_eq!(reader.update_count(), 2);
    }

    #[test]
    fn collector_chart_sink_tolerates_empty() {
        let mut sink = CollectorChartSink::new();
        sink.on_history(&[]);
        assert!(sink.latest().is_empty());
        assert_eq!(sink.update_count(), 1);
    }

    #[test]
    fn collector_alert_sink_keeps_latest() {
        let mut sink = CollectorAlertSink::new();
        let reader = sink.clone();

        let alert = AlertEvent {
            id: 1,
            doa: 45,
            timestamp: 1,
            dismissing: false,
        };
        sink.on_alerts(&[alert.clone()]);
        assert_eq!(reader.latest(), vec![alert]);

        sink.on_alerts(&[]);
        assert!(reader.latest().is_empty());
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        ChartSink::on_history(&mut sink, &[]);
        AlertSink::on_alerts(&mut sink, &[]);
        assert_eq!(ChartSink::name(&sink), "null");
    }
}
