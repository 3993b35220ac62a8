//! relive - live reload client for local development.
//!
//! Connects to a dev server's notification socket, reloads the page when
//! told, and carries a slice of application state across the reload.
//!
//! ```ignore
//! use relive::{ClientSettings, HostPage, PageLocation, ReloadClient};
//!
//! let page = HostPage::new(PageLocation::parse("http://localhost:3000/")?, store, reloader)
//!     .with_state(state);
//! let client = ReloadClient::new(page, ClientSettings::default());
//! client.restore_on_load()?;
//! let (handle, session) = client.spawn();
//! handle.start().await;
//! ```

pub mod actor;
pub mod cli;
pub mod config;
pub mod core;
pub mod host;
pub mod logger;
pub mod reload;

pub use actor::{ClientHandle, ClientSettings, Phase, ReloadClient, SessionEnd};
pub use core::PageLocation;
pub use host::{AppState, DurableStore, HostPage, Reloader};
