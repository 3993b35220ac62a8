//! State Snapshot Persistence
//!
//! Carries application state across a reload:
//!
//! ```text
//! reload notification -> persist(state) -> store[key]
//! page load           -> store[key] -> merge into state -> delete store[key]
//! ```
//!
//! The stored value is transient. It is read at most once: the entry is
//! deleted on load whether or not it could be applied.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::host::{AppState, HostError, HostPage, StateFields};

/// Default storage key
pub const DEFAULT_STORAGE_KEY: &str = "__dev_state";

/// Time given to the snapshot write before the page reloads.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(100);

/// Errors from decoding a stored snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("snapshot is not a JSON object")]
    NotAnObject,
}

/// Serialized copy of application state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot(StateFields);

impl StateSnapshot {
    /// Capture the current application state, if any.
    pub fn capture(state: &dyn AppState) -> Option<Self> {
        state.get().map(Self)
    }

    /// Decode a stored snapshot.
    pub fn parse(raw: &str) -> Result<Self, SnapshotError> {
        match serde_json::from_str(raw)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(SnapshotError::NotAnObject),
        }
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn fields(&self) -> &StateFields {
        &self.0
    }

    pub fn into_fields(self) -> StateFields {
        self.0
    }
}

/// What happened to a stored snapshot on page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was stored
    NoSnapshot,
    /// A snapshot was stored but the page exposes no state to merge into
    NoState,
    /// Fields were merged into the live state
    Restored { fields: usize },
    /// The snapshot could not be decoded and was dropped
    Discarded { reason: String },
}

/// Snapshot the page state into durable storage.
///
/// Returns `false` when the page has no state to snapshot.
pub fn persist(page: &HostPage, key: &str) -> Result<bool, HostError> {
    let Some(snapshot) = page.state().and_then(StateSnapshot::capture) else {
        crate::debug!("snapshot"; "no application state, skipping");
        return Ok(false);
    };

    page.store().set(key, &snapshot.to_json())?;
    crate::debug!("snapshot"; "saved {} field(s) under `{}`", snapshot.fields().len(), key);
    Ok(true)
}

/// Restore a stored snapshot into the page state, then clear it.
///
/// Decode failures are reported through the outcome, not as errors. Only
/// storage and state-write failures are errors.
pub fn restore_on_load(page: &HostPage, key: &str) -> Result<RestoreOutcome, HostError> {
    let Some(raw) = page.store().get(key)? else {
        return Ok(RestoreOutcome::NoSnapshot);
    };

    let outcome = apply(page, &raw);

    // Never replay a snapshot, even when the merge above failed
    let cleared = page.store().remove(key);
    let outcome = outcome?;
    cleared?;

    if let RestoreOutcome::Discarded { reason } = &outcome {
        crate::log!("warning"; "failed to restore state: {}", reason);
    }
    Ok(outcome)
}

fn apply(page: &HostPage, raw: &str) -> Result<RestoreOutcome, HostError> {
    let Some(state) = page.state() else {
        crate::debug!("snapshot"; "no application state to restore into");
        return Ok(RestoreOutcome::NoState);
    };

    match StateSnapshot::parse(raw) {
        Ok(snapshot) => {
            let fields = snapshot.fields().len();
            state.merge(snapshot.into_fields())?;
            crate::debug!("snapshot"; "restored {} field(s)", fields);
            Ok(RestoreOutcome::Restored { fields })
        }
        Err(e) => Ok(RestoreOutcome::Discarded {
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::core::PageLocation;
    use crate::host::{DurableStore, MemoryStore, ReloadFlag, SharedState};

    fn page(store: Arc<MemoryStore>, state: Option<SharedState>) -> HostPage {
        let location = PageLocation::parse("http://localhost:3000/").unwrap();
        let page = HostPage::new(location, store, Arc::new(ReloadFlag::new()));
        match state {
            Some(state) => page.with_state(Arc::new(state)),
            None => page,
        }
    }

    #[test]
    fn test_persist_writes_state() {
        let store = Arc::new(MemoryStore::new());
        let state = SharedState::from_value(json!({"count": 5}));
        let page = page(store.clone(), Some(state));

        assert!(persist(&page, DEFAULT_STORAGE_KEY).unwrap());

        let raw = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, json!({"count": 5}));
    }

    #[test]
    fn test_persist_without_state_skips() {
        let store = Arc::new(MemoryStore::new());

        let no_host = page(store.clone(), None);
        assert!(!persist(&no_host, DEFAULT_STORAGE_KEY).unwrap());

        let unpublished = page(store.clone(), Some(SharedState::empty()));
        assert!(!persist(&unpublished, DEFAULT_STORAGE_KEY).unwrap());

        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_overwrites_previous_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let state = SharedState::from_value(json!({"count": 1}));
        let page = page(store.clone(), Some(state.clone()));

        persist(&page, DEFAULT_STORAGE_KEY).unwrap();
        state.set("count", json!(2));
        persist(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"count":2}"#)
        );
    }

    #[test]
    fn test_restore_merges_and_clears() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEFAULT_STORAGE_KEY, r#"{"count":5}"#).unwrap();
        let state = SharedState::from_value(json!({"count": 0, "name": "x"}));
        let page = page(store.clone(), Some(state.clone()));

        let outcome = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(outcome, RestoreOutcome::Restored { fields: 1 });
        assert_eq!(state.to_value(), json!({"count": 5, "name": "x"}));
        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_invalid_json_discarded() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEFAULT_STORAGE_KEY, "{bad").unwrap();
        let state = SharedState::from_value(json!({"count": 0}));
        let page = page(store.clone(), Some(state.clone()));

        let outcome = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert!(matches!(outcome, RestoreOutcome::Discarded { .. }));
        assert_eq!(state.to_value(), json!({"count": 0}));
        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_non_object_discarded() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEFAULT_STORAGE_KEY, "[1,2]").unwrap();
        let state = SharedState::from_value(json!({"count": 0}));
        let page = page(store.clone(), Some(state.clone()));

        let outcome = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(
            outcome,
            RestoreOutcome::Discarded {
                reason: "snapshot is not a JSON object".into()
            }
        );
        assert_eq!(state.to_value(), json!({"count": 0}));
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_without_state_still_clears() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEFAULT_STORAGE_KEY, r#"{"count":5}"#).unwrap();
        let page = page(store.clone(), None);

        let outcome = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(outcome, RestoreOutcome::NoState);
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_nothing_stored() {
        let store = Arc::new(MemoryStore::new());
        let state = SharedState::from_value(json!({"count": 0}));
        let page = page(store, Some(state.clone()));

        let outcome = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(outcome, RestoreOutcome::NoSnapshot);
        assert_eq!(state.to_value(), json!({"count": 0}));
    }

    #[test]
    fn test_restore_runs_once() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEFAULT_STORAGE_KEY, r#"{"count":5}"#).unwrap();
        let state = SharedState::from_value(json!({"count": 0}));
        let page = page(store, Some(state.clone()));

        restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();
        state.set("count", json!(6));
        let second = restore_on_load(&page, DEFAULT_STORAGE_KEY).unwrap();

        assert_eq!(second, RestoreOutcome::NoSnapshot);
        assert_eq!(state.to_value(), json!({"count": 6}));
    }
}
