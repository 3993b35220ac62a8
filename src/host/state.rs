//! Application state accessors.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::store::write_atomic;
use super::{AppState, HostError, StateFields};

// =============================================================================
// SharedState
// =============================================================================

/// In-memory state shared between the application and the reload client.
///
/// Clones share the same underlying object, so a restore is visible to every
/// holder.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<Option<StateFields>>>,
}

impl SharedState {
    /// State that has not been published yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(fields: StateFields) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(fields))),
        }
    }

    /// Build from a JSON object value. Non-objects give empty state.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::new(fields),
            _ => Self::empty(),
        }
    }

    /// Replace a single field, as the application would while running.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner
            .write()
            .get_or_insert_with(StateFields::new)
            .insert(key.into(), value);
    }

    /// Current state as a JSON value (`null` when unpublished).
    pub fn to_value(&self) -> Value {
        self.inner
            .read()
            .clone()
            .map_or(Value::Null, Value::Object)
    }
}

impl AppState for SharedState {
    fn get(&self) -> Option<StateFields> {
        self.inner.read().clone()
    }

    fn merge(&self, fields: StateFields) -> Result<(), HostError> {
        let mut guard = self.inner.write();
        let state = guard.get_or_insert_with(StateFields::new);
        for (key, value) in fields {
            state.insert(key, value);
        }
        Ok(())
    }
}

// =============================================================================
// JsonFileState
// =============================================================================

/// State kept in a JSON file the application reads at startup and rewrites
/// while it runs.
#[derive(Debug, Clone)]
pub struct JsonFileState {
    path: PathBuf,
}

impl JsonFileState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StateFields>, HostError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HostError::Io(self.path.clone(), e)),
        };
        match serde_json::from_str(&content) {
            Ok(Value::Object(fields)) => Ok(Some(fields)),
            Ok(_) => Ok(None),
            Err(e) => Err(HostError::Json(self.path.clone(), e)),
        }
    }
}

impl AppState for JsonFileState {
    fn get(&self) -> Option<StateFields> {
        match self.read() {
            Ok(fields) => fields,
            Err(e) => {
                crate::debug!("state"; "unreadable state: {}", e);
                None
            }
        }
    }

    /// Merge into the file, keeping fields that are not in the snapshot.
    ///
    /// An unreadable or non-object file is treated as empty and rewritten.
    fn merge(&self, fields: StateFields) -> Result<(), HostError> {
        let mut state = self.read().ok().flatten().unwrap_or_default();
        for (key, value) in fields {
            state.insert(key, value);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| HostError::Io(parent.to_path_buf(), e))?;
        }

        let json = serde_json::to_string_pretty(&Value::Object(state))
            .map_err(|e| HostError::Json(self.path.clone(), e))?;
        write_atomic(&self.path, &json)
    }
}
