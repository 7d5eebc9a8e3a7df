//! Sparse storage for raw cell values.
//!
//! Values are kept as `row -> column -> raw string`, the same shape the sheet
//! is persisted in. Absent cells read as the empty string. The extent only
//! ever grows, one row or column at a time.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::coord::{Coord, Extent};

/// Nested `row -> column -> raw value` map of every stored cell.
pub type Snapshot = BTreeMap<usize, BTreeMap<usize, String>>;

/// Thread-safe sparse grid. Clones are cheap handles onto the same storage.
#[derive(Clone, Debug, Default)]
pub struct GridStore {
    rows: Arc<DashMap<usize, BTreeMap<usize, String>>>,
    max_x: Arc<AtomicUsize>,
    max_y: Arc<AtomicUsize>,
    dirty: Arc<AtomicBool>,
}

impl GridStore {
    pub fn new(extent: Extent) -> GridStore {
        GridStore {
            rows: Arc::new(DashMap::new()),
            max_x: Arc::new(AtomicUsize::new(extent.max_x)),
            max_y: Arc::new(AtomicUsize::new(extent.max_y)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a store from persisted contents. The store starts clean.
    pub fn from_snapshot(snapshot: Snapshot, extent: Extent) -> GridStore {
        let store = GridStore::new(extent);
        for (y, row) in snapshot {
            if !row.is_empty() {
                store.rows.insert(y, row);
            }
        }
        store
    }

    /// Raw value at `(x, y)`, or `""` when nothing is stored there.
    pub fn get(&self, x: usize, y: usize) -> String {
        self.rows
            .get(&y)
            .and_then(|row| row.get(&x).cloned())
            .unwrap_or_default()
    }

    pub fn get_at(&self, coord: Coord) -> String {
        self.get(coord.x, coord.y)
    }

    /// Overwrite or insert the raw value at `(x, y)` and mark the store dirty.
    pub fn set(&self, x: usize, y: usize, value: impl Into<String>) {
        self.rows.entry(y).or_default().insert(x, value.into());
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn set_at(&self, coord: Coord, value: impl Into<String>) {
        self.set(coord.x, coord.y, value);
    }

    pub fn has_row(&self, y: usize) -> bool {
        self.rows.contains_key(&y)
    }

    pub fn grow_columns(&self) {
        self.max_x.fetch_add(1, Ordering::SeqCst);
    }

    pub fn grow_rows(&self) {
        self.max_y.fetch_add(1, Ordering::SeqCst);
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.max_x.load(Ordering::SeqCst),
            self.max_y.load(Ordering::SeqCst),
        )
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn mark_clean(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Number of stored cells (including ones set to `""`).
    pub fn len(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Snapshot {
        self.rows
            .iter()
            .map(|row| (*row.key(), row.value().clone()))
            .collect()
    }
}
