//! Persisted kit selection state.
//!
//! The active kit is remembered by name so that the same kit is selected
//! again on the next run.

use chrono::{DateTime, Utc};
use cmkits_types::{KitError, Result, StateStore};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk form of the state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    active_kit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// [`StateStore`] backed by a small JSON file.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    cached: RwLock<PersistedState>,
}

impl FileStateStore {
    /// Open (or lazily create) the state file at `path`.
    ///
    /// An unreadable or corrupt file is treated as "no active kit".
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt state file {:?}: {}", path, e);
                PersistedState::default()
            }),
            Err(_) => PersistedState::default(),
        };

        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn active_kit_name(&self) -> Option<String> {
        self.cached.read().active_kit_name.clone()
    }

    fn set_active_kit_name(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.cached.write();
        state.active_kit_name = name.map(str::to_string);
        state.updated_at = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KitError::State(format!("Failed to create state directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&*state)?;
        std::fs::write(&self.path, content)
            .map_err(|e| KitError::State(format!("Failed to write state file: {}", e)))?;

        debug!("Persisted active kit {:?} to {:?}", name, self.path);
        Ok(())
    }
}

/// In-memory [`StateStore`], for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    name: RwLock<Option<String>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already remembers `name`.
    pub fn with_active(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(Some(name.into())),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn active_kit_name(&self) -> Option<String> {
        self.name.read().clone()
    }

    fn set_active_kit_name(&self, name: Option<&str>) -> Result<()> {
        *self.name.write() = name.map(str::to_string);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");

        let store = FileStateStore::open(&path);
        assert_eq!(store.active_kit_name(), None);
        store.set_active_kit_name(Some("GCC 9.3.0")).unwrap();

        let reopened = FileStateStore::open(&path);
        assert_eq!(reopened.active_kit_name().as_deref(), Some("GCC 9.3.0"));

        reopened.set_active_kit_name(None).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"activeKitName\": null"));
        assert_eq!(FileStateStore::open(&path).active_kit_name(), None);
    }

    #[test]
    fn test_corrupt_state_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStateStore::open(&path);
        assert_eq!(store.active_kit_name(), None);
    }

    #[test]
    fn test_memory_state() {
        let store = MemoryStateStore::with_active("Clang 14.0.0");
        assert_eq!(store.active_kit_name().as_deref(), Some("Clang 14.0.0"));
        store.set_active_kit_name(None).unwrap();
        assert_eq!(store.active_kit_name(), None);
    }
}
