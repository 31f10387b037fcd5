//! Signal types and stateless/stateful derivations over the snapshot feed.

pub mod edge;
pub mod history;
pub mod snapshot;

pub use edge::{EdgeDetector, VoiceEdge};
pub use history::RollingHistory;
pub use snapshot::{HistoryPoint, Snapshot};
