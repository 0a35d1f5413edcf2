//! Saved-search persistence.
//!
//! Stores hold one opaque JSON blob under [`SAVED_SEARCHES_KEY`], the way a
//! browser's local storage would. [`SearchHistory`] owns the
//! read-modify-write cycle and the ten-entry cap.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use safemom_types::{AnalysisResult, SafeMomError, SavedSearches};

/// Storage key of the saved-search blob.
pub const SAVED_SEARCHES_KEY: &str = "savedSearches";

/// Key/value storage for the saved-search blob.
pub trait SearchStore: Send + Sync {
    /// Read the raw blob, `None` when nothing was stored yet.
    ///
    /// # Errors
    /// Returns `Storage` when the backing medium cannot be read.
    fn load(&self) -> Result<Option<String>, SafeMomError>;

    /// Replace the raw blob.
    ///
    /// # Errors
    /// Returns `Storage` when the backing medium cannot be written.
    fn save(&self, blob: &str) -> Result<(), SafeMomError>;

    /// Drop the blob entirely.
    ///
    /// # Errors
    /// Returns `Storage` when the backing medium cannot be written.
    fn remove(&self) -> Result<(), SafeMomError>;
}

/// In-process store, handy for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw blob (which need not be valid JSON).
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }
}

fn poisoned() -> SafeMomError {
    SafeMomError::storage("store lock poisoned")
}

impl SearchStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, SafeMomError> {
        Ok(self.blob.lock().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, blob: &str) -> Result<(), SafeMomError> {
        *self.blob.lock().map_err(|_| poisoned())? = Some(blob.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), SafeMomError> {
        *self.blob.lock().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// File-backed store: a JSON object mapping storage keys to string values.
///
/// Other keys in the file are preserved on write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SafeMomError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SafeMomError::storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let raw = String::from_utf8(bytes).map_err(|e| {
            SafeMomError::Data(format!("{} is not UTF-8: {e}", self.path.display()))
        })?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            SafeMomError::Data(format!("{} is not a storage object: {e}", self.path.display()))
        })
    }

    /// Like [`Self::read_map`], but an unreadable file starts over as empty.
    /// I/O failures still propagate so a write never clobbers a file it could not read.
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, SafeMomError> {
        match self.read_map() {
            Err(SafeMomError::Data(_)) => Ok(BTreeMap::new()),
            other => other,
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SafeMomError> {
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| SafeMomError::Data(format!("encode storage object: {e}")))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| SafeMomError::storage(format!("write {}: {e}", self.path.display())))
    }
}

impl SearchStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, SafeMomError> {
        match self.read_map() {
            Ok(mut map) => Ok(map.remove(SAVED_SEARCHES_KEY)),
            // A mangled file is treated like a mangled blob: nothing saved.
            Err(SafeMomError::Data(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, blob: &str) -> Result<(), SafeMomError> {
        let mut map = self.read_map_for_write()?;
        map.insert(SAVED_SEARCHES_KEY.to_string(), blob.to_string());
        self.write_map(&map)
    }

    fn remove(&self) -> Result<(), SafeMomError> {
        let mut map = self.read_map_for_write()?;
        if map.remove(SAVED_SEARCHES_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Newest-first, ten-entry saved-search list on top of a [`SearchStore`].
///
/// Each mutation is a single read-modify-write under one lock.
#[derive(Clone)]
pub struct SearchHistory {
    store: Arc<dyn SearchStore>,
    gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory").finish_non_exhaustive()
    }
}

impl SearchHistory {
    /// History backed by `store`.
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self {
            store,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// History backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn read(&self) -> Result<SavedSearches, SafeMomError> {
        let Some(blob) = self.store.load()? else {
            return Ok(SavedSearches::default());
        };
        match serde_json::from_str::<SavedSearches>(&blob) {
            Ok(saved) => Ok(saved),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "saved searches are corrupt; starting empty");
                Ok(SavedSearches::default())
            }
        }
    }

    fn write(&self, saved: &SavedSearches) -> Result<(), SafeMomError> {
        let blob = serde_json::to_string(saved)
            .map_err(|e| SafeMomError::Data(format!("encode saved searches: {e}")))?;
        self.store.save(&blob)
    }

    /// Insert `result` as the newest entry. Returns the evicted oldest entry
    /// when the list was already full.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn save(&self, result: AnalysisResult) -> Result<Option<AnalysisResult>, SafeMomError> {
        let _guard = self.gate.lock().map_err(|_| poisoned())?;
        let mut saved = self.read()?;
        saved.searches.remove_where(|r| r.id == result.id);
        let evicted = saved.searches.push_front(result);
        self.write(&saved)?;
        #[cfg(feature = "tracing")]
        if let Some(old) = &evicted {
            tracing::debug!(id = %old.id, "evicted oldest saved search");
        }
        Ok(evicted)
    }

    /// All saved results, newest first.
    ///
    /// # Errors
    /// Propagates store failures; corrupt data reads as empty.
    pub fn all(&self) -> Result<Vec<AnalysisResult>, SafeMomError> {
        Ok(self.read()?.searches.into())
    }

    /// Look up a saved result by id.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn get(&self, id: &str) -> Result<Option<AnalysisResult>, SafeMomError> {
        Ok(self.read()?.searches.find(|r| r.id == id).cloned())
    }

    /// Delete one result by id. Returns whether anything was removed.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn delete(&self, id: &str) -> Result<bool, SafeMomError> {
        let _guard = self.gate.lock().map_err(|_| poisoned())?;
        let mut saved = self.read()?;
        let removed = saved.searches.remove_where(|r| r.id == id) > 0;
        if removed {
            self.write(&saved)?;
        }
        Ok(removed)
    }

    /// Delete every saved result.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn clear(&self) -> Result<(), SafeMomError> {
        let _guard = self.gate.lock().map_err(|_| poisoned())?;
        self.store.remove()
    }
}
