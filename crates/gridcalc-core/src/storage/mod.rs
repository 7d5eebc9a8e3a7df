//! Snapshot persistence.
//!
//! Sheets are saved as a serialized snapshot under a string key in a
//! key-value store. Two stores are provided: an in-process map and a
//! directory with one file per key.

mod file;
mod memory;
mod snapshot;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{decode_snapshot, encode_snapshot};

use crate::error::Result;

/// A key-value store holding serialized snapshots.
pub trait SnapshotStore: Send {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing what was there.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
