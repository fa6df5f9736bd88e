pub mod error;
pub mod memory;
pub mod redb;
pub mod snapshot;
pub mod traits;

pub use error::CacheError;
pub use memory::MemorySnapshots;
pub use redb::RedbSnapshots;
pub use snapshot::{Snapshot, SnapshotCache};
pub use traits::SnapshotStore;
