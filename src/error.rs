//! Error types for whispermon.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Snapshot source errors
    #[error("Snapshot source subscribe failed: {message}")]
    SourceSubscribe { message: String },

    #[error("Snapshot source already subscribed")]
    SourceAlreadySubscribed,

    #[error("Replay file error at {path}: {message}")]
    Replay { path: String, message: String },

    // Store errors
    #[error("Store error for key {key}: {message}")]
    Store { key: String, message: String },

    // Alert side-channel errors (always swallowed by callers)
    #[error("Announcer failed: {message}")]
    Announce { message: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MonitorError>;
