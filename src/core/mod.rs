//! Core types - pure abstractions shared across the codebase.

mod location;
mod state;

pub use location::{DEFAULT_ALLOW_HOSTS, DEFAULT_WS_PATH, LocationError, PageLocation};
pub use state::{is_shutdown, register_shutdown_notifier, request_shutdown, setup_shutdown_handler};
