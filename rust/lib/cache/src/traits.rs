use crate::error::CacheError;

/// Byte-level backing store for cached snapshots.
///
/// Keys are short namespaced names such as `jobs:listing`. A store holds at
/// most one value per key; writing replaces the previous snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Read the raw bytes stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace the bytes stored under `key`.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}
