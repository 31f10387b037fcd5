use crate::defaults;
use crate::monitor::processor::ProcessorConfig;
use crate::monitor::runtime::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorSection,
    pub alerts: AlertsSection,
    pub simulate: SimulateSection,
}

/// Monitor core configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorSection {
    pub history_capacity: usize,
    pub max_alerts: usize,
    pub auto_dismiss_ms: u64,
    pub remove_grace_ms: u64,
    pub tick_interval_ms: u64,
}

/// Alert side-channel configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertsSection {
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    /// Tone player invocation; empty uses the built-in default.
    pub tone_command: Vec<String>,
}

/// Simulated source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulateSection {
    pub interval_ms: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            history_capacity: defaults::HISTORY_CAPACITY,
            max_alerts: defaults::MAX_ACTIVE_ALERTS,
            auto_dismiss_ms: defaults::ALERT_AUTO_DISMISS_MS,
            remove_grace_ms: defaults::ALERT_REMOVE_GRACE_MS,
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
        }
    }
}

impl Default for AlertsSection {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            notifications_enabled: false,
            tone_command: Vec::new(),
        }
    }
}

impl Default for SimulateSection {
    fn default() -> Self {
        Self {
            interval_ms: defaults::UPDATE_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - WHISPERMON_UPDATE_INTERVAL_MS → simulate.interval_ms
    /// - WHISPERMON_SOUND → alerts.sound_enabled ("0"/"false" disables)
    /// - WHISPERMON_NOTIFICATIONS → alerts.notifications_enabled
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(interval) = std::env::var("WHISPERMON_UPDATE_INTERVAL_MS")
            && let Ok(ms) = interval.parse::<u64>()
            && ms > 0
        {
            self.simulate.interval_ms = ms;
        }

        if let Ok(sound) = std::env::var("WHISPERMON_SOUND")
            && !sound.is_empty()
        {
            self.alerts.sound_enabled = !matches!(sound.as_str(), "0" | "false" | "off");
        }

        if let Ok(notify) = std::env::var("WHISPERMON_NOTIFICATIONS")
            && !notify.is_empty()
        {
            self.alerts.notifications_enabled = !matches!(notify.as_str(), "0" | "false" | "off");
        }

        self
    }

    /// Validate value domains that serde cannot express.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.monitor.max_alerts == 0 {
            return Err(crate::error::MonitorError::ConfigInvalidValue {
                key: "monitor.max_alerts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.monitor.tick_interval_ms == 0 {
            return Err(crate::error::MonitorError::ConfigInvalidValue {
                key: "monitor.tick_interval_ms".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Processor configuration derived from the `[monitor]` section.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            history_capacity: self.monitor.history_capacity,
            max_alerts: self.monitor.max_alerts,
            auto_dismiss_ms: self.monitor.auto_dismiss_ms,
            remove_grace_ms: self.monitor.remove_grace_ms,
        }
    }

    /// Runtime configuration derived from this config (no observer channel).
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            processor: self.processor_config(),
            tick_interval_ms: self.monitor.tick_interval_ms,
            ..Default::default()
        }
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/whispermon/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("whispermon")
            .join("config.toml")
    }

    /// Get the default key-value store path (profile + alert history)
    ///
    /// Returns ~/.local/share/whispermon/store.json on Linux
    #[cfg(feature = "cli")]
    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("whispermon")
            .join("store.json")
    }
}
