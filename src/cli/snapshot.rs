//! `relive snapshot`: inspect or clear the pending state snapshot.

use anyhow::Result;

use crate::config::ClientConfig;
use crate::host::{DurableStore, FileStore};
use crate::log;
use crate::reload::StateSnapshot;

/// What `relive snapshot` found.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotStatus {
    Missing,
    Cleared,
    Valid(StateSnapshot),
    Invalid(String),
}

/// Print (or with `clear`, delete) the snapshot the next load would restore.
pub fn run_snapshot(config: &ClientConfig, clear: bool) -> Result<()> {
    let store = FileStore::new(&config.page.store_dir);
    let key = &config.reload.storage_key;
    let path = store.path_for(key);

    match inspect(&store, key, clear)? {
        SnapshotStatus::Missing => log!("relive"; "no pending snapshot in {}", store.dir().display()),
        SnapshotStatus::Cleared => log!("relive"; "removed {}", path.display()),
        SnapshotStatus::Valid(snapshot) => {
            println!("{}", serde_json::to_string_pretty(snapshot.fields())?);
        }
        SnapshotStatus::Invalid(reason) => {
            log!("warning"; "{} will be discarded on next load: {}", path.display(), reason);
        }
    }
    Ok(())
}

fn inspect(store: &dyn DurableStore, key: &str, clear: bool) -> Result<SnapshotStatus> {
    let Some(raw) = store.get(key)? else {
        return Ok(SnapshotStatus::Missing);
    };

    if clear {
        store.remove(key)?;
        return Ok(SnapshotStatus::Cleared);
    }

    Ok(match StateSnapshot::parse(&raw) {
        Ok(snapshot) => SnapshotStatus::Valid(snapshot),
        Err(e) => SnapshotStatus::Invalid(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "__dev_state";

    #[test]
    fn test_inspect_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(inspect(&store, KEY, false).unwrap(), SnapshotStatus::Missing);
        assert_eq!(inspect(&store, KEY, true).unwrap(), SnapshotStatus::Missing);
    }

    #[test]
    fn test_inspect_valid_keeps_entry() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.set(KEY, r#"{"count":5}"#).unwrap();

        let SnapshotStatus::Valid(snapshot) = inspect(&store, KEY, false).unwrap() else {
            panic!("expected a valid snapshot");
        };
        assert_eq!(snapshot.fields()["count"], 5);
        assert!(store.get(KEY).unwrap().is_some());
    }

    #[test]
    fn test_inspect_invalid() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.set(KEY, "{bad").unwrap();

        assert!(matches!(
            inspect(&store, KEY, false).unwrap(),
            SnapshotStatus::Invalid(_)
        ));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let mut config = ClientConfig::default();
        config.page.store_dir = dir.path().join(".relive");

        let store = FileStore::new(&config.page.store_dir);
        store.set(KEY, r#"{"count":5}"#).unwrap();

        run_snapshot(&config, true).unwrap();
        assert!(!store.path_for(KEY).exists());
    }
}
