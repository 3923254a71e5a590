use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::core::Coordinates;
use crate::foundation::error::{FamapError, FamapResult};

/// Current on-disk format version of the persisted cache.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Full place-name to coordinates mapping, ordered by key.
pub type CacheEntries = BTreeMap<String, Coordinates>;

/// Backing store for [`crate::GeocodeCache`].
///
/// Stores persist the whole mapping at once; there is no incremental append.
pub trait CacheStore {
    /// Read the persisted mapping. A store with nothing persisted yet returns an empty map.
    fn load(&self) -> FamapResult<CacheEntries>;
    /// Replace the persisted mapping with `entries`.
    fn save(&mut self, entries: &CacheEntries) -> FamapResult<()>;
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheFile {
    version: u32,
    entries: CacheEntries,
}

/// JSON file store. The file is rewritten in full on every save.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path` (which need not exist yet).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self) -> FamapResult<CacheEntries> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheEntries::new()),
            Err(e) => return Err(FamapError::io(&self.path, e)),
        };

        let file: CacheFile = serde_json::from_slice(&bytes).map_err(|e| {
            FamapError::serde(format!(
                "parse geocode cache '{}': {e}",
                self.path.display()
            ))
        })?;
        if file.version != CACHE_FORMAT_VERSION {
            return Err(FamapError::serde(format!(
                "geocode cache '{}' has unsupported version {} (expected {CACHE_FORMAT_VERSION})",
                self.path.display(),
                file.version
            )));
        }
        Ok(file.entries)
    }

    fn save(&mut self, entries: &CacheEntries) -> FamapResult<()> {
        #[derive(serde::Serialize)]
        struct CacheFileRef<'a> {
            version: u32,
            entries: &'a CacheEntries,
        }

        let bytes = serde_json::to_vec_pretty(&CacheFileRef {
            version: CACHE_FORMAT_VERSION,
            entries,
        })
        .map_err(|e| FamapError::serde(format!("serialize geocode cache: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FamapError::io(parent, e))?;
        }
        std::fs::write(&self.path, bytes).map_err(|e| FamapError::io(&self.path, e))
    }
}

/// In-memory store for tests and runs that should not touch disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: CacheEntries,
    saves: usize,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `entries`, as if loaded from a previous run.
    pub fn with_entries(entries: CacheEntries) -> Self {
        Self { entries, saves: 0 }
    }

    /// Last saved mapping.
    pub fn entries(&self) -> &CacheEntries {
        &self.entries
    }

    /// Number of times [`CacheStore::save`] was called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> FamapResult<CacheEntries> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &CacheEntries) -> FamapResult<()> {
        self.entries = entries.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geocode/store.rs"]
mod tests;
