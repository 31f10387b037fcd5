//! User profile settings persisted in the key-value store.
//!
//! The equivalent of the dashboard's settings page: who is monitoring,
//! which room, and whether the alert side channels are wanted. The
//! processor never reads these; the composition root uses them to
//! configure the announcer.

use crate::error::Result;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Store key under which the profile blob lives.
pub const PROFILE_KEY: &str = "profile";

/// Persisted user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Display name shown in the monitor header.
    pub display_name: String,
    /// Label of the monitored room.
    pub room: String,
    /// Whether to play an audible tone on raised alerts.
    pub sound_enabled: bool,
    /// Whether system notifications have been opted into.
    pub notifications_enabled: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            room: String::new(),
            sound_enabled: true,
            notifications_enabled: false,
        }
    }
}

impl ProfileSettings {
    /// Loads the profile, falling back to defaults when none is stored.
    ///
    /// A stored but unparseable blob is an error, not a silent reset.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        match store.get(PROFILE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Self::default()),
        }
    }

    /// Saves the profile.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.set(PROFILE_KEY, &raw)
    }
}
