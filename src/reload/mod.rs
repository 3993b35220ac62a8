//! Reload Module
//!
//! Client-side pieces of live reload that do not depend on the runtime:
//!
//! - `backoff` - Reconnect attempt counter and delay growth
//! - `message` - Inbound notification types (reload vs. ignored)
//! - `snapshot` - State snapshot persist/restore across a reload

pub mod backoff;
pub mod message;
pub mod snapshot;

pub use backoff::Backoff;
pub use message::Notification;
pub use snapshot::{RestoreOutcome, StateSnapshot};
