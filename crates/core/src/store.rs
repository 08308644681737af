//! Preference Store
//!
//! Typed key-value settings with explicit commit. Writes are staged and only
//! become visible to readers (and to disk) once `commit` runs, the way an
//! Android `SharedPreferences.Editor` behaves.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{StoreBackend, StoreConfig};
use crate::error::{Result, TaoError};

/// A stored preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrefValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    StringSet(BTreeSet<String>),
}

impl PrefValue {
    /// Name of the value kind, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Int(_) => "int",
            PrefValue::Long(_) => "long",
            PrefValue::Float(_) => "float",
            PrefValue::String(_) => "string",
            PrefValue::StringSet(_) => "string set",
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(v) => write!(f, "{}", v),
            PrefValue::Int(v) => write!(f, "{}", v),
            PrefValue::Long(v) => write!(f, "{}", v),
            PrefValue::Float(v) => write!(f, "{}", v),
            PrefValue::String(v) => f.write_str(v),
            PrefValue::StringSet(set) => {
                let items: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

fn typed<T>(
    key: &str,
    expected: &'static str,
    stored: Option<PrefValue>,
    default: T,
    extract: impl FnOnce(PrefValue) -> std::result::Result<T, PrefValue>,
) -> Result<T> {
    match stored {
        None => Ok(default),
        Some(value) => extract(value).map_err(|other| TaoError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: other.kind(),
        }),
    }
}

/// Persisted key-value settings
///
/// Reads see committed state only. `put`, `remove` and `clear` are staged
/// until `commit`, which applies a pending clear first and the staged
/// changes after it.
pub trait ConfigStore: Send + Sync {
    /// Committed value for a key
    fn get(&self, key: &str) -> Option<PrefValue>;

    /// Stage a value
    fn put(&self, key: &str, value: PrefValue);

    /// Stage a removal
    fn remove(&self, key: &str);

    /// Stage removal of every entry
    fn clear(&self);

    /// Apply staged edits and persist them synchronously
    fn commit(&self) -> Result<()>;

    /// Committed entries ordered by key
    fn all_entries(&self) -> BTreeMap<String, PrefValue>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        typed(key, "bool", self.get(key), default, |v| match v {
            PrefValue::Bool(b) => Ok(b),
            other => Err(other),
        })
    }

    fn get_int(&self, key: &str, default: i32) -> Result<i32> {
        typed(key, "int", self.get(key), default, |v| match v {
            PrefValue::Int(i) => Ok(i),
            other => Err(other),
        })
    }

    /// Reads a long. An `Int` stored under the key is widened.
    fn get_long(&self, key: &str, default: i64) -> Result<i64> {
        typed(key, "long", self.get(key), default, |v| match v {
            PrefValue::Long(l) => Ok(l),
            PrefValue::Int(i) => Ok(i64::from(i)),
            other => Err(other),
        })
    }

    fn get_float(&self, key: &str, default: f32) -> Result<f32> {
        typed(key, "float", self.get(key), default, |v| match v {
            PrefValue::Float(x) => Ok(x),
            other => Err(other),
        })
    }

    fn get_string(&self, key: &str, default: &str) -> Result<String> {
        typed(key, "string", self.get(key), default.to_string(), |v| match v {
            PrefValue::String(s) => Ok(s),
            other => Err(other),
        })
    }

    fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> Result<BTreeSet<String>> {
        typed(key, "string set", self.get(key), default, |v| match v {
            PrefValue::StringSet(s) => Ok(s),
            other => Err(other),
        })
    }
}

#[derive(Debug, Default)]
struct StoreState {
    committed: BTreeMap<String, PrefValue>,
    clear_pending: bool,
    changes: BTreeMap<String, Option<PrefValue>>,
}

impl StoreState {
    fn with_entries(committed: BTreeMap<String, PrefValue>) -> Self {
        Self {
            committed,
            ..Default::default()
        }
    }

    fn stage(&mut self, key: &str, value: Option<PrefValue>) {
        // JSON has no NaN or infinity, such a value could never be read back
        if let Some(PrefValue::Float(x)) = &value {
            if !x.is_finite() {
                warn!("Ignoring non-finite float for '{}': {}", key, x);
                return;
            }
        }
        self.changes.insert(key.to_string(), value);
    }

    fn stage_clear(&mut self) {
        self.clear_pending = true;
        self.changes.clear();
    }

    /// Committed entries with the staged edits applied
    fn pending_entries(&self) -> BTreeMap<String, PrefValue> {
        let mut entries = if self.clear_pending {
            BTreeMap::new()
        } else {
            self.committed.clone()
        };
        for (key, change) in &self.changes {
            match change {
                Some(value) => {
                    entries.insert(key.clone(), value.clone());
                }
                None => {
                    entries.remove(key);
                }
            }
        }
        entries
    }

    fn finish_commit(&mut self, entries: BTreeMap<String, PrefValue>) {
        self.committed = entries;
        self.clear_pending = false;
        self.changes.clear();
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with committed entries
    pub fn with_entries(entries: BTreeMap<String, PrefValue>) -> Self {
        Self {
            state: RwLock::new(StoreState::with_entries(entries)),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.state.read().committed.get(key).cloned()
    }

    fn put(&self, key: &str, value: PrefValue) {
        self.state.write().stage(key, Some(value));
    }

    fn remove(&self, key: &str) {
        self.state.write().stage(key, None);
    }

    fn clear(&self) {
        self.state.write().stage_clear();
    }

    fn commit(&self) -> Result<()> {
        let mut state = self.state.write();
        let entries = state.pending_entries();
        state.finish_commit(entries);
        Ok(())
    }

    fn all_entries(&self) -> BTreeMap<String, PrefValue> {
        self.state.read().committed.clone()
    }
}

/// Store persisted as a JSON document
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Open the store at `path`, loading committed entries if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let committed = if path.exists() {
            debug!("Loading preferences from {:?}", path);
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                Self::parse_document(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            state: RwLock::new(StoreState::with_entries(committed)),
        })
    }

    /// Decode every entry on its own so one unreadable value does not lose the rest
    fn parse_document(contents: &str) -> Result<BTreeMap<String, PrefValue>> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(contents)?;
        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            match serde_json::from_value::<PrefValue>(value) {
                Ok(value) => {
                    entries.insert(key, value);
                }
                Err(e) => warn!("Dropping unreadable preference '{}': {}", key, e),
            }
        }
        Ok(entries)
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, entries: &BTreeMap<String, PrefValue>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Preferences written to {:?}", self.path);
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.state.read().committed.get(key).cloned()
    }

    fn put(&self, key: &str, value: PrefValue) {
        self.state.write().stage(key, Some(value));
    }

    fn remove(&self, key: &str) {
        self.state.write().stage(key, None);
    }

    fn clear(&self) {
        self.state.write().stage_clear();
    }

    fn commit(&self) -> Result<()> {
        // Held across the write so concurrent commits land in order.
        // Staged edits survive a failed write and go out with the next commit.
        let mut state = self.state.write();
        let entries = state.pending_entries();
        self.write_document(&entries)?;
        state.finish_commit(entries);
        Ok(())
    }

    fn all_entries(&self) -> BTreeMap<String, PrefValue> {
        self.state.read().committed.clone()
    }
}

/// Opens the store that belongs to one package
pub trait StoreProvider: Send + Sync {
    fn open(&self, scope: &str) -> Result<Arc<dyn ConfigStore>>;
}

/// Hands out one in-memory store per scope
#[derive(Debug, Default)]
pub struct MemoryStoreProvider {
    stores: Mutex<HashMap<String, Arc<MemoryStore>>>,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn open(&self, scope: &str) -> Result<Arc<dyn ConfigStore>> {
        let store = self
            .stores
            .lock()
            .entry(scope.to_string())
            .or_default()
            .clone();
        Ok(store)
    }
}

/// Opens `<dir>/<scope>.json`
#[derive(Debug, Clone)]
pub struct FileStoreProvider {
    dir: PathBuf,
}

impl FileStoreProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the document backing a scope
    pub fn path_for(&self, scope: &str) -> Result<PathBuf> {
        if scope.is_empty() || scope.contains(['/', '\\']) || scope.starts_with('.') {
            return Err(TaoError::Store(format!("Invalid store scope: {:?}", scope)));
        }
        Ok(self.dir.join(format!("{}.json", scope)))
    }
}

impl StoreProvider for FileStoreProvider {
    fn open(&self, scope: &str) -> Result<Arc<dyn ConfigStore>> {
        let path = self.path_for(scope)?;
        Ok(Arc::new(FileStore::open(path)?))
    }
}

/// Build the provider selected by the configuration
pub fn provider_from_config(config: &StoreConfig) -> Result<Arc<dyn StoreProvider>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStoreProvider::new())),
        StoreBackend::File => {
            let dir = config.resolved_dir()?;
            info!("Preferences directory: {:?}", dir);
            Ok(Arc::new(FileStoreProvider::new(dir)))
        }
    }
}
