//! Host Capabilities
//!
//! The reload client never reaches for globals. Everything it needs from the
//! page that embeds it is injected through three traits:
//!
//! | Trait          | Browser counterpart        | Implementations                 |
//! |----------------|----------------------------|---------------------------------|
//! | `AppState`     | `window.app.state`         | `SharedState`, `JsonFileState`  |
//! | `DurableStore` | `localStorage`             | `MemoryStore`, `FileStore`      |
//! | `Reloader`     | `location.reload()`        | `ProcessPage`, `ReloadFlag`     |
//!
//! `HostPage` bundles them together with the page location.

mod process;
mod state;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::PageLocation;

pub use process::{ProcessPage, ReloadFlag};
pub use state::{JsonFileState, SharedState};
pub use store::{FileStore, MemoryStore, STORE_DIR};

/// Object fields of a JSON state value.
pub type StateFields = Map<String, Value>;

/// Errors raised by host capabilities
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("failed to run `{0}`")]
    Spawn(String, #[source] std::io::Error),
}

/// Mutable application state exposed by the host.
///
/// The client reads it to take a snapshot and merges fields into it on
/// restore. It never replaces the state object itself.
pub trait AppState: Send + Sync {
    /// Current state, `None` when the application has not published any.
    fn get(&self) -> Option<StateFields>;

    /// Assign `fields` onto the live state, keeping fields not mentioned.
    fn merge(&self, fields: StateFields) -> Result<(), HostError>;
}

/// Durable key/value storage that survives a reload.
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, HostError>;
    fn set(&self, key: &str, value: &str) -> Result<(), HostError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), HostError>;
}

/// Reloads the current page.
pub trait Reloader: Send + Sync {
    fn reload(&self) -> Result<(), HostError>;
}

/// The page a reload client lives in.
#[derive(Clone)]
pub struct HostPage {
    location: PageLocation,
    state: Option<Arc<dyn AppState>>,
    store: Arc<dyn DurableStore>,
    reloader: Arc<dyn Reloader>,
}

impl HostPage {
    pub fn new(
        location: PageLocation,
        store: Arc<dyn DurableStore>,
        reloader: Arc<dyn Reloader>,
    ) -> Self {
        Self {
            location,
            state: None,
            store,
            reloader,
        }
    }

    /// Attach the application state accessor.
    pub fn with_state(mut self, state: Arc<dyn AppState>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// Application state, if the host exposes one.
    pub fn state(&self) -> Option<&dyn AppState> {
        self.state.as_deref()
    }

    pub fn store(&self) -> &dyn DurableStore {
        self.store.as_ref()
    }

    pub fn reloader(&self) -> &dyn Reloader {
        self.reloader.as_ref()
    }
}

impl std::fmt::Debug for HostPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostPage")
            .field("location", &self.location)
            .field("has_state", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
