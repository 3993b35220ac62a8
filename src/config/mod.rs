//! Client configuration management for `relive.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── connect    # [connect]
//! │   ├── page       # [page]
//! │   └── reload     # [reload]
//! ├── types/         # Utility types
//! │   └── error      # ConfigError, ConfigDiagnostics
//! └── mod.rs         # ClientConfig (this file)
//! ```
//!
//! A missing config file is not an error: every field has a default, so
//! `relive connect http://localhost:3000/` works in an empty directory.
//! Command-line flags override file values.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ConnectConfig, PageConfig, ReloadConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

use crate::actor::ClientSettings;
use crate::cli::{Cli, Commands, ConnectArgs};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing relive.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Absolute path to the config file (may not exist)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory, parent of the config file
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub connect: ConnectConfig,

    #[serde(default)]
    pub reload: ReloadConfig,

    #[serde(default)]
    pub page: PageConfig,
}

impl ClientConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, the
    /// defaults apply and cwd is the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, config_path) = match find_config_file(&cli.config) {
            Some(path) => (Self::from_path(&path)?, path),
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                (Self::default(), cwd.join(&cli.config))
            }
        };

        config.config_path = config_path;
        config.finalize(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Settings handed to the reload client.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            allow_hosts: self.connect.allow_hosts.clone(),
            ws_path: self.connect.path.clone(),
            max_attempts: self.connect.max_attempts,
            base_delay: self.connect.base_delay(),
            reload_delay: self.reload.delay(),
            storage_key: self.reload.storage_key.clone(),
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn finalize(&mut self, cli: &Cli, cwd: &Path) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        self.root = root;

        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.page.store_dir, cli.store_dir.as_ref());
        if let Commands::Connect { args } = &cli.command {
            self.apply_connect_args(args);
        }

        self.page.normalize(&self.root);
    }

    /// Apply connect arguments from CLI.
    fn apply_connect_args(&mut self, args: &ConnectArgs) {
        Self::update_option(&mut self.connect.max_attempts, args.max_attempts.as_ref());
        Self::update_option(&mut self.connect.path, args.path.as_ref());
        if args.state.is_some() {
            self.page.state = args.state.clone();
        }
        if !args.command.is_empty() {
            self.page.command = args.command.clone();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.connect.validate(&mut diag);
        self.reload.validate(&mut diag);
        self.page.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ClientConfig {
    let (parsed, ignored) = ClientConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
