//! Durable storage backends.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{DurableStore, HostError};

/// Default store directory (relative to the project root)
pub const STORE_DIR: &str = ".relive";

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store. Lives as long as the value, so it only survives reloads
/// that keep the process around.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HostError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// One file per key under a directory.
///
/// ```text
/// .relive/
/// └── __dev_state.json
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_.-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HostError::Io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
        fs::create_dir_all(&self.dir).map_err(|e| HostError::Io(self.dir.clone(), e))?;
        let path = self.path_for(key);
        write_atomic(&path, value)?;
        crate::debug!("store"; "wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HostError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HostError::Io(path, e)),
        }
    }
}

/// Write through a sibling temp file so readers never see a partial value.
pub(super) fn write_atomic(path: &Path, content: &str) -> Result<(), HostError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| HostError::Io(tmp.clone(), e))?;
    fs::rename(&tmp, path).map_err(|e| HostError::Io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join(STORE_DIR));

        assert_eq!(store.get("__dev_state").unwrap(), None);

        store.set("__dev_state", r#"{"count":5}"#).unwrap();
        assert!(temp.path().join(".relive/__dev_state.json").exists());
        assert_eq!(
            store.get("__dev_state").unwrap().as_deref(),
            Some(r#"{"count":5}"#)
        );

        store.remove("__dev_state").unwrap();
        assert_eq!(store.get("__dev_state").unwrap(), None);
    }

    #[test]
    fn test_file_store_remove_missing() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        assert!(store.remove("never-written").is_ok());
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_store_key_sanitized() {
        let store = FileStore::new("/tmp/store");
        assert_eq!(
            store.path_for("../app/state"),
            PathBuf::from("/tmp/store/.._app_state.json")
        );
        assert_eq!(
            store.path_for("__dev_state"),
            PathBuf::from("/tmp/store/__dev_state.json")
        );
    }
}
