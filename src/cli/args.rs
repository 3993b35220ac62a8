//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// relive - live reload client for local development
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: relive.toml)
    #[arg(short = 'C', long, global = true, default_value = "relive.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Snapshot store directory (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub store_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Connect to a dev server and reload the page on notification
    #[command(visible_alias = "c")]
    Connect {
        #[command(flatten)]
        args: ConnectArgs,
    },

    /// Show or clear the pending state snapshot
    #[command(visible_alias = "s")]
    Snapshot {
        /// Delete the pending snapshot instead of printing it
        #[arg(long)]
        clear: bool,
    },
}

/// Connect command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConnectArgs {
    /// URL of the page being developed (e.g., http://localhost:3000/)
    #[arg(value_hint = clap::ValueHint::Url)]
    pub page: String,

    /// JSON file holding the application state to carry across reloads (relative to project root)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub state: Option<PathBuf>,

    /// Connect even when the page host is not a local development host
    #[arg(short, long)]
    pub force: bool,

    /// Automatic reconnect attempts before giving up
    #[arg(short = 'n', long)]
    pub max_attempts: Option<u32>,

    /// Live reload endpoint path on the page host
    #[arg(short, long)]
    pub path: Option<String>,

    /// Command to run as the page; restarted on every reload
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}
