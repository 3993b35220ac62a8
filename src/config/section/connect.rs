//! `[connect]` section configuration.
//!
//! Controls when the client activates and how it reconnects.
//!
//! # Example
//!
//! ```toml
//! [connect]
//! allow_hosts = ["localhost", "127.0.0.1"]   # Hosts treated as local development
//! path = "/ws"                               # Live reload endpoint on the page host
//! max_attempts = 10                          # Automatic reconnects before giving up
//! base_delay_ms = 1000                       # Delay before attempt k is base * 1.5^k
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::core::{DEFAULT_ALLOW_HOSTS, DEFAULT_WS_PATH};
use crate::reload::backoff::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};

/// Connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Hostnames on which the client starts automatically.
    pub allow_hosts: Vec<String>,

    /// Endpoint path, appended to the page host.
    pub path: String,

    /// Automatic reconnect attempts before going idle.
    pub max_attempts: u32,

    /// Base reconnect delay in milliseconds.
    pub base_delay_ms: u64,
}

impl ConnectConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.path.starts_with('/') {
            diag.error_with_hint(
                "connect.path",
                format!("`{}` is not an absolute path", self.path),
                format!("use \"/{}\"", self.path.trim_start_matches('/')),
            );
        }
        if self.base_delay_ms == 0 {
            diag.error("connect.base_delay_ms", "must be greater than 0");
        }
        if self.allow_hosts.is_empty() {
            diag.warning(
                "connect.allow_hosts",
                "empty allow list: the client only connects with --force",
            );
        }
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            allow_hosts: DEFAULT_ALLOW_HOSTS.iter().map(|h| h.to_string()).collect(),
            path: DEFAULT_WS_PATH.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_connect_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.connect.allow_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(config.connect.path, "/ws");
        assert_eq!(config.connect.max_attempts, 10);
        assert_eq!(config.connect.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_connect_config_partial_override() {
        let config = test_parse_config("[connect]\nmax_attempts = 3\npath = \"/livereload\"");

        assert_eq!(config.connect.max_attempts, 3);
        assert_eq!(config.connect.path, "/livereload");
        // allow_hosts uses default
        assert_eq!(config.connect.allow_hosts.len(), 2);
    }

    #[test]
    fn test_connect_config_validation() {
        let config = test_parse_config("[connect]\npath = \"ws\"\nbase_delay_ms = 0");
        let mut diag = ConfigDiagnostics::new();
        config.connect.validate(&mut diag);
        assert_eq!(diag.error_count(), 2);
    }

    #[test]
    fn test_empty_allow_list_is_warning() {
        let config = test_parse_config("[connect]\nallow_hosts = []");
        let mut diag = ConfigDiagnostics::new();
        config.connect.validate(&mut diag);
        assert_eq!(diag.error_count(), 0);
        assert_eq!(diag.warning_count(), 1);
    }
}
