//! Command-line interface module.

mod args;
pub mod connect;
pub mod snapshot;

pub use args::{Cli, Commands, ConnectArgs};
