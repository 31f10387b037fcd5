//! whispermon - Live whisper/voice-presence monitor for microphone arrays
//!
//! Consumes a push feed of sensor snapshots (DOA angle + voice flag) and
//! derives a rolling chart history, an edge-triggered auto-expiring alert
//! queue, and a cumulative voice counter.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod alert;
#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod monitor;
#[cfg(feature = "cli")]
pub mod output;
pub mod signal;
pub mod source;
pub mod store;

// Core traits (source → process → sink)
pub use alert::announcer::{Announcer, NullAnnouncer};
pub use monitor::sink::{AlertSink, ChartSink};
pub use source::SnapshotSource;

// Processor and runtime
pub use monitor::processor::{LiveSignalProcessor, ProcessorConfig, ProcessorEvent};
pub use monitor::runtime::{DismissHandle, Monitor, MonitorConfig, MonitorHandle};

// Data types
pub use monitor::alerts::AlertEvent;
pub use monitor::event::MonitorEvent;
pub use signal::snapshot::{HistoryPoint, Snapshot};

// Error handling
pub use error::{MonitorError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.0.1+abc1234"` when git hash is available, `"0.0.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        // In a git repo build, GIT_HASH is set → expect "0.0.1+<hash>"
        // In CI without git, expect plain "0.0.1"
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(
                hash_part.len(),
                7,
                "Git hash should be 7 chars, got: {}",
                hash_part
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
