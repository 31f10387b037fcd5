//! Live-signal processing core: the processor, its alert queue and timer
//! bookkeeping, and the tokio runtime that drives them.

pub mod alerts;
pub mod clock;
pub mod event;
pub mod processor;
pub mod runtime;
pub mod sink;
pub mod timers;

pub use alerts::{AlertEvent, AlertQueue};
pub use clock::{Clock, MockClock, SystemClock};
pub use event::MonitorEvent;
pub use processor::{LiveSignalProcessor, ProcessorConfig, ProcessorEvent};
pub use runtime::{DismissHandle, Monitor, MonitorConfig, MonitorHandle};
pub use sink::{AlertSink, ChartSink, CollectorAlertSink, CollectorChartSink, NullSink};
