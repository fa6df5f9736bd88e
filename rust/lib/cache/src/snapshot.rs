use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;
use crate::memory::MemorySnapshots;
use crate::redb::RedbSnapshots;
use crate::traits::SnapshotStore;

/// A cached value together with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub saved_at: DateTime<Utc>,
    pub value: T,
}

/// Typed, JSON-encoded snapshot cache over a [`SnapshotStore`].
///
/// Cheap to clone; clones share the same backing store.
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Cache kept in memory only.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemorySnapshots::new()))
    }

    /// Cache persisted to a redb file.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        Ok(Self::new(Arc::new(RedbSnapshots::open(path)?)))
    }

    /// Serialize `value` and store it under `key`, stamped with the current time.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<DateTime<Utc>, CacheError> {
        let saved_at = Utc::now();
        let envelope = Snapshot { saved_at, value };
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.store.write(key, &bytes)?;
        debug!(key, bytes = bytes.len(), "snapshot saved");
        Ok(saved_at)
    }

    /// Load the snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is cached and
    /// `Err(CacheError::Serialization)` when the stored bytes no longer decode
    /// as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Snapshot<T>>, CacheError> {
        let Some(bytes) = self.store.read(key)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        Ok(Some(snapshot))
    }

    pub fn clear(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        title: String,
    }

    #[test]
    fn load_empty() {
        let cache = SnapshotCache::memory();
        let got: Option<Snapshot<Vec<Row>>> = cache.load("jobs").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn save_and_load_typed() {
        let cache = SnapshotCache::memory();
        let rows = vec![
            Row { id: 1, title: "DevOps Engineer".into() },
            Row { id: 2, title: "Data Scientist".into() },
        ];
        let saved_at = cache.save("jobs", &rows).unwrap();

        let got: Snapshot<Vec<Row>> = cache.load("jobs").unwrap().unwrap();
        assert_eq!(got.value, rows);
        assert_eq!(got.saved_at, saved_at);
    }

    #[test]
    fn mismatched_type_is_serialization_error() {
        let cache = SnapshotCache::memory();
        cache.save("jobs", &"not a list").unwrap();

        let err = cache.load::<Vec<Row>>("jobs").unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn clones_share_store() {
        let cache = SnapshotCache::memory();
        let other = cache.clone();
        cache.save("n", &7u32).unwrap();
        assert_eq!(other.load::<u32>("n").unwrap().unwrap().value, 7);

        other.clear("n").unwrap();
        assert!(cache.load::<u32>("n").unwrap().is_none());
    }

    #[test]
    fn redb_backed_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.redb");
        SnapshotCache::open(&path).unwrap().save("n", &42u32).unwrap();

        let reopened = SnapshotCache::open(&path).unwrap();
        assert_eq!(reopened.load::<u32>("n").unwrap().unwrap().value, 42);
    }
}
