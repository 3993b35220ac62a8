//! relive - live reload client for local development.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use relive::cli::{self, Cli, Commands};
use relive::config::ClientConfig;
use relive::core;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ClientConfig::load(&cli)?;

    match &cli.command {
        Commands::Connect { args } => cli::connect::run_connect(&config, &args.page, args.force),
        Commands::Snapshot { clear } => cli::snapshot::run_snapshot(&config, *clear),
    }
}
