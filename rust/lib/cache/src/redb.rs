use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::CacheError;
use crate::traits::SnapshotStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

fn storage<E: std::fmt::Display>(e: E) -> CacheError {
    CacheError::Storage(e.to_string())
}

/// Snapshot store persisted in a single redb file.
///
/// Survives process restarts, so a CLI run that cannot reach the backend can
/// still show what the previous successful run saw.
pub struct RedbSnapshots {
    db: Arc<Database>,
}

impl RedbSnapshots {
    /// Open or create the cache file at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage)?;
            }
        }
        let db = Database::create(path).map_err(storage)?;

        // Create the table up front so reads on a fresh file see an empty table.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        debug!(path = %path.display(), "opened snapshot cache");
        Ok(Self { db: Arc::new(db) })
    }
}

impl SnapshotStore for RedbSnapshots {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;
        let value = table.get(key).map_err(storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)
    }
}
