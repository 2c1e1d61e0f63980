//! Key/value state carried from the start phase to the stop phase.

use crate::{LifecycleError, LifecycleResult};

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::debug;

pub const STATE_PID: &str = "omni-cache-pid";
pub const STATE_LOG: &str = "omni-cache-log";
pub const STATE_HOST: &str = "omni-cache-host";

/// Last-write-wins string store. Blank values read back as absent.
pub trait StateStore {
    fn save(&mut self, key: &str, value: &str) -> LifecycleResult<()>;
    fn load(&self, key: &str) -> Option<String>;
}

/// State persisted as a flat JSON object, rewritten on every save.
pub struct FileStateStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStateStore {
    /// Start from an empty store, discarding whatever a previous run left behind.
    pub fn create(path: &Path) -> LifecycleResult<Self> {
        let store = Self {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
        };
        store.flush()?;
        Ok(store)
    }

    /// Open existing state. A missing file is an empty store.
    pub fn open(path: &Path) -> LifecycleResult<Self> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| LifecycleError::state_store(path.to_path_buf(), e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| {
                LifecycleError::state_store(path.to_path_buf(), format!("invalid state file: {e}"))
            })?
        } else {
            debug!("No state file at {}", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write via a sibling temp file so readers never see a torn file.
    fn flush(&self) -> LifecycleResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| LifecycleError::state_store(dir.to_path_buf(), e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| LifecycleError::state_store(self.path.clone(), e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .map_err(|e| LifecycleError::state_store(tmp.clone(), e.to_string()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| LifecycleError::state_store(self.path.clone(), e.to_string()))?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn save(&mut self, key: &str, value: &str) -> LifecycleResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}

/// Process-local store, for callers that bridge state some other way.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: HashMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn save(&mut self, key: &str, value: &str) -> LifecycleResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}
