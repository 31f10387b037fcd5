//! Snapshot and history point types for the monitor feed.
//!
//! A snapshot is one full-state sample of the sensor as pushed by the
//! upstream source: direction-of-arrival angle, voice-presence flag, and
//! capture timestamp. It is ground truth, not a delta.

use crate::defaults;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// One full-state sensor sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Direction of arrival in degrees, valid range `[0, 360)`.
    pub doa: u16,
    /// True while voice/whisper energy is currently detected.
    pub is_voice: bool,
    /// Capture time as epoch milliseconds.
    pub timestamp: i64,
}

impl Snapshot {
    /// Creates a new snapshot.
    pub fn new(doa: u16, is_voice: bool, timestamp: i64) -> Self {
        Self {
            doa,
            is_voice,
            timestamp,
        }
    }

    /// Returns true if the sample is within the sensor's value domain.
    ///
    /// Out-of-domain samples are dropped by the processor without any
    /// state mutation.
    pub fn is_valid(&self) -> bool {
        self.doa < defaults::DOA_DEGREES && self.timestamp >= 0
    }
}

/// A snapshot projected for charting, owned by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Direction of arrival in degrees.
    pub doa: u16,
    /// Voice-presence flag as sampled.
    pub is_voice: bool,
    /// Capture time as epoch milliseconds.
    pub timestamp: i64,
    /// Numeric projection of `is_voice` (0 or 1) for chart series.
    pub voice_value: u8,
    /// Local wall-clock label ("HH:MM:SS") for chart axes.
    pub label: String,
}

impl HistoryPoint {
    /// Derives a history point from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            doa: snapshot.doa,
            is_voice: snapshot.is_voice,
            timestamp: snapshot.timestamp,
            voice_value: u8::from(snapshot.is_voice),
            label: format_time_label(snapshot.timestamp),
        }
    }
}

impl From<&Snapshot> for HistoryPoint {
    fn from(snapshot: &Snapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

/// Formats epoch milliseconds as a local "HH:MM:SS" label.
///
/// Unrepresentable timestamps produce a placeholder instead of an error;
/// a chart label is never worth failing a sample over.
pub fn format_time_label(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(when) => when.format(defaults::TIME_LABEL_FORMAT).to_string(),
        None => "--:--:--".to_string(),
    }
}
