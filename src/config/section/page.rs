//! `[page]` section configuration.
//!
//! Describes the "page" the CLI reloads: an optional command standing in for
//! the page, the JSON file it keeps its state in, and where snapshots go.
//!
//! # Example
//!
//! ```toml
//! [page]
//! command = ["cargo", "run"]   # Restarted on every reload
//! state = "state.json"         # Application state carried across reloads
//! store_dir = ".relive"        # Snapshot storage
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::host::store::STORE_DIR;

/// Page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Command run as the page (empty = no child process).
    pub command: Vec<String>,

    /// Application state file.
    pub state: Option<PathBuf>,

    /// Snapshot storage directory.
    pub store_dir: PathBuf,
}

impl PageConfig {
    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        if let Some(state) = self.state.take() {
            self.state = Some(root.join(state));
        }
        self.store_dir = root.join(&self.store_dir);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.first().is_some_and(|program| program.trim().is_empty()) {
            diag.error("page.command", "program name must not be empty");
        }
        if let Some(state) = &self.state
            && state.is_dir()
        {
            diag.error("page.state", format!("`{}` is a directory", state.display()));
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            state: None,
            store_dir: PathBuf::from(STORE_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_page_config_defaults() {
        let config = test_parse_config("");
        assert!(config.page.command.is_empty());
        assert_eq!(config.page.state, None);
        assert_eq!(config.page.store_dir, PathBuf::from(".relive"));
    }

    #[test]
    fn test_page_config_normalize() {
        let mut config =
            test_parse_config("[page]\nstate = \"app/state.json\"\ncommand = [\"npm\", \"start\"]");
        config.page.normalize(Path::new("/project"));

        assert_eq!(
            config.page.state,
            Some(PathBuf::from("/project/app/state.json"))
        );
        assert_eq!(config.page.store_dir, PathBuf::from("/project/.relive"));
        assert_eq!(config.page.command, vec!["npm", "start"]);
    }

    #[test]
    fn test_absolute_paths_kept() {
        let mut config = test_parse_config("[page]\nstore_dir = \"/var/tmp/relive\"");
        config.page.normalize(Path::new("/project"));
        assert_eq!(config.page.store_dir, PathBuf::from("/var/tmp/relive"));
    }

    #[test]
    fn test_blank_program_rejected() {
        let config = test_parse_config("[page]\ncommand = [\"\"]");
        let mut diag = ConfigDiagnostics::new();
        config.page.validate(&mut diag);
        assert_eq!(diag.error_count(), 1);
    }
}
