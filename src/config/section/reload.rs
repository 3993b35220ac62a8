//! `[reload]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [reload]
//! delay_ms = 100                 # Wait after saving state before reloading
//! storage_key = "__dev_state"    # Key of the state snapshot in the store
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::reload::snapshot::{DEFAULT_RELOAD_DELAY, DEFAULT_STORAGE_KEY};

/// Reload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Milliseconds to let the snapshot write settle before reloading.
    pub delay_ms: u64,

    /// Storage key holding the snapshot.
    pub storage_key: String,
}

impl ReloadConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.storage_key.trim().is_empty() {
            diag.error("reload.storage_key", "must not be empty");
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_RELOAD_DELAY.as_millis() as u64,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_reload_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.reload.delay(), Duration::from_millis(100));
        assert_eq!(config.reload.storage_key, "__dev_state");
    }

    #[test]
    fn test_reload_config_override() {
        let config = test_parse_config("[reload]\ndelay_ms = 0\nstorage_key = \"app\"");
        assert_eq!(config.reload.delay(), Duration::ZERO);
        assert_eq!(config.reload.storage_key, "app");
    }

    #[test]
    fn test_empty_storage_key_rejected() {
        let config = test_parse_config("[reload]\nstorage_key = \" \"");
        let mut diag = ConfigDiagnostics::new();
        config.reload.validate(&mut diag);
        assert_eq!(diag.error_count(), 1);
    }
}
