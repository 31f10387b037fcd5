//! Bounded alert history backing the history view.
//!
//! The runtime appends a record per raised alert; the history surface
//! queries recent entries or a time range. Writes are best-effort at the
//! runtime boundary; a failing store costs records, never monitoring.

use crate::defaults;
use crate::error::Result;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Store key under which the alert log lives.
pub const EVENT_LOG_KEY: &str = "alert_log";

/// One recorded alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Alert id within its monitoring session.
    pub id: u64,
    /// Direction of arrival in degrees.
    pub doa: u16,
    /// Trigger timestamp (epoch ms).
    pub timestamp: i64,
}

/// Consumer of raised-alert records, as seen by the monitor runtime.
pub trait AlertHistory: Send + 'static {
    /// Records one raised alert. Implementations swallow their own
    /// failures; recording never propagates into monitor state.
    fn record(&mut self, record: &AlertRecord);
}

/// Alert history persisted through a key-value store.
pub struct EventLog<S: KeyValueStore> {
    store: S,
    capacity: usize,
}

impl<S: KeyValueStore> EventLog<S> {
    /// Creates a log with the default retention cap.
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, defaults::EVENT_LOG_CAPACITY)
    }

    /// Creates a log retaining at most `capacity` records.
    pub fn with_capacity(store: S, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Appends a record, evicting the oldest beyond the retention cap.
    pub fn append(&self, record: &AlertRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record.clone());
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }
        self.save(&records)
    }

    /// Returns up to `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AlertRecord>> {
        let records = self.load()?;
        Ok(records.into_iter().rev().take(limit).collect())
    }

    /// Returns records with `from <= timestamp < to`, oldest first.
    pub fn range(&self, from: i64, to: i64) -> Result<Vec<AlertRecord>> {
        let records = self.load()?;
        Ok(records
            .into_iter()
            .filter(|r| r.timestamp >= from && r.timestamp < to)
            .collect())
    }

    /// Returns the number of retained records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Returns true when no records are retained.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }

    /// Deletes every record.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(EVENT_LOG_KEY)
    }

    fn load(&self) -> Result<Vec<AlertRecord>> {
        match self.store.get(EVENT_LOG_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[AlertRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(EVENT_LOG_KEY, &raw)
    }
}

impl<S: KeyValueStore + 'static> AlertHistory for EventLog<S> {
    fn record(&mut self, record: &AlertRecord) {
        if let Err(e) = self.append(record) {
            eprintln!("whispermon: alert history write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn record(id: u64, timestamp: i64) -> AlertRecord {
        AlertRecord {
            id,
            doa: (id % 360) as u16,
            timestamp,
        }
    }

    #[test]
    fn starts_empty() {
        let log = EventLog::new(MemoryStore::new());
        assert!(log.is_empty().unwrap());
        assert_eq!(log.recent(10).unwrap(), Vec::new());
    }

    #[test]
    fn append_and_recent_newest_first() {
        let log = EventLog::new(MemoryStore::new());
        log.append(&record(1, 100)).unwrap();
        log.append(&record(2, 200)).unwrap();
        log.append(&record(3, 300)).unwrap();

        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 3);
        assert_eq!(recent[1].id, 2);
    }

    #[test]
    fn retention_cap_evicts_oldest() {
        let log = EventLog::with_capacity(MemoryStore::new(), 3);
        for n in 1..=5 {
            log.append(&record(n, i64::from(n as i32) * 100)).unwrap();
        }

        assert_eq!(log.len().unwrap(), 3);
        let recent = log.recent(10).unwrap();
        let ids: Vec<u64> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[test]
    fn range_is_half_open() {
        let log = EventLog::new(MemoryStore::new());
        for n in 1..=4 {
            log.append(&record(n, i64::from(n as i32) * 100)).unwrap();
        }

        let hits = log.range(200, 400).unwrap();
        let ids: Vec<u64> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn clear_removes_everything() {
        let log = EventLog::new(MemoryStore::new());
        log.append(&record(1, 100)).unwrap();
        log.clear().unwrap();
        assert!(log.is_empty().unwrap());
    }

    #[test]
    fn record_swallows_store_failures() {
        // A store that always fails: record() must not panic or propagate.
        struct BrokenStore;
        impl KeyValueStore for BrokenStore {
            fn get(&self, key: &str) -> crate::error::Result<Option<String>> {
                Err(crate::error::MonitorError::Store {
                    key: key.to_string(),
                    message: "broken".to_string(),
                })
            }
            fn set(&self, key: &str, _value: &str) -> crate::error::Result<()> {
                Err(crate::error::MonitorError::Store {
                    key: key.to_string(),
                    message: "broken".to_string(),
                })
            }
            fn remove(&self, _key: &str) -> crate::error::Result<()> {
                Ok(())
            }
        }

        let mut log = EventLog::new(BrokenStore);
        log.record(&record(1, 100));
    }
}
