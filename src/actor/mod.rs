//! Actor System for Live Reload
//!
//! One actor per page load owns the connection, the backoff counter and the
//! pending timers:
//!
//! ```text
//! Transport --SocketMsg--> ClientActor <--ClientMsg-- ClientHandle
//!                              |
//!                              v
//!                  HostPage (state, store, reloader)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Control and socket event messages
//! - `client` - The reload client actor
//! - `handle` - Cloneable control surface (reconnect, disconnect, shutdown)
//! - `transport` - WebSocket connection tasks

pub mod client;
pub mod handle;
pub mod messages;
pub mod transport;

pub use client::{ClientSettings, Phase, ReloadClient, SessionEnd};
pub use handle::ClientHandle;
pub use transport::{Connection, Transport, WsTransport};
