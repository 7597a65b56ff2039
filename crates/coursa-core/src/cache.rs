//! Rebuildable caches for derived data.
//!
//! Each cache key (`course_features`, `item_sim`, `idf`) is one JSON file under the
//! cache directory and one in-memory snapshot. A rebuild writes the new file
//! atomically and only then swaps the snapshot, so readers keep using the previous
//! version until the new one is committed, and a failed rebuild changes nothing.
//! Caches are never a source of truth: a missing or unreadable file simply means
//! the recommenders compute on the fly.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use coursa_keywords::IdfTable;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    collaborative::ItemSimilarity,
    error::CoreError,
    features::FeatureSet,
    model::CourseId,
    persist::{read_json, write_json_atomic},
};

/// Feature tokens per course.
pub type CourseFeatures = BTreeMap<CourseId, FeatureSet>;

/// Cache key for course features.
pub const FEATURES_KEY: &str = "course_features";

/// Cache key for the item similarity structure.
pub const ITEM_SIM_KEY: &str = "item_sim";

/// Cache key for the IDF table.
pub const IDF_KEY: &str = "idf";

/// One cache key: a file plus the snapshot loaded from it.
#[derive(Debug)]
struct CacheSlot<T> {
    /// Cache key, also the file stem.
    key: &'static str,
    /// Current snapshot.
    value: RwLock<Option<Arc<T>>>,
}

impl<T: Serialize + DeserializeOwned> CacheSlot<T> {
    /// Loads the slot from `dir`, treating unreadable files as absent.
    fn load(key: &'static str, dir: Option<&Path>) -> Self {
        let value = dir.and_then(|dir| match read_json(&slot_path(dir, key)) {
            Ok(value) => value.map(Arc::new),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cache");
                None
            }
        });
        Self {
            key,
            value: RwLock::new(value),
        }
    }

    /// Returns the current snapshot.
    fn get(&self) -> Option<Arc<T>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persists `value` and swaps it in.
    fn replace(&self, dir: Option<&Path>, value: T) -> Result<Arc<T>, CoreError> {
        if let Some(dir) = dir {
            write_json_atomic(&slot_path(dir, self.key), &value).map_err(|e| CoreError::Cache {
                key: self.key,
                message: e.to_string(),
            })?;
        }
        let value = Arc::new(value);
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&value));
        debug!(key = self.key, "cache replaced");
        Ok(value)
    }
}

/// File path for a cache key.
fn slot_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

/// The feature, similarity and IDF caches.
#[derive(Debug)]
pub struct CacheStore {
    /// Cache directory; `None` keeps everything in memory.
    dir: Option<PathBuf>,
    /// Course feature sets.
    features: CacheSlot<CourseFeatures>,
    /// Item-item similarities.
    item_sim: CacheSlot<ItemSimilarity>,
    /// Corpus IDF table.
    idf: CacheSlot<IdfTable>,
}

impl CacheStore {
    /// Opens the caches in `dir`, loading whatever files exist.
    pub fn open(dir: &Path) -> Self {
        Self::load(Some(dir.to_path_buf()))
    }

    /// Creates empty caches that are never persisted.
    pub fn in_memory() -> Self {
        Self::load(None)
    }

    /// Loads every slot.
    fn load(dir: Option<PathBuf>) -> Self {
        let path = dir.as_deref();
        Self {
            features: CacheSlot::load(FEATURES_KEY, path),
            item_sim: CacheSlot::load(ITEM_SIM_KEY, path),
            idf: CacheSlot::load(IDF_KEY, path),
            dir,
        }
    }

    /// Cached course features, if built.
    pub fn features(&self) -> Option<Arc<CourseFeatures>> {
        self.features.get()
    }

    /// Cached item similarities, if built.
    pub fn item_similarity(&self) -> Option<Arc<ItemSimilarity>> {
        self.item_sim.get()
    }

    /// Cached IDF table, if built.
    pub fn idf(&self) -> Option<Arc<IdfTable>> {
        self.idf.get()
    }

    /// Replaces the course feature cache.
    pub fn replace_features(&self, value: CourseFeatures) -> Result<Arc<CourseFeatures>, CoreError> {
        self.features.replace(self.dir.as_deref(), value)
    }

    /// Replaces the item similarity cache.
    pub fn replace_item_similarity(
        &self,
        value: ItemSimilarity,
    ) -> Result<Arc<ItemSimilarity>, CoreError> {
        self.item_sim.replace(self.dir.as_deref(), value)
    }

    /// Replaces the IDF table.
    pub fn replace_idf(&self, value: IdfTable) -> Result<Arc<IdfTable>, CoreError> {
        self.idf.replace(self.dir.as_deref(), value)
    }
}
