use crate::config::Config;
use crate::error::{GridcalcError, Result};
use crate::storage::SnapshotStore;
use gridcalc_engine::engine::{Coord, Extent, FormulaEvaluator, GridStore, Snapshot};

/// UI-agnostic sheet: a grid store, its evaluator and an optional snapshot
/// store it is persisted to.
pub struct Document {
    /// Shared with the evaluator; clones are handles onto the same cells.
    pub(crate) grid: GridStore,
    pub(crate) evaluator: FormulaEvaluator,
    /// Key the snapshot is stored under (`gridData-<id>`).
    pub(crate) table_key: String,
    pub(crate) store: Option<Box<dyn SnapshotStore>>,
    pub(crate) save_to_store: bool,
}

impl Document {
    /// Create an empty document with the configured extent.
    ///
    /// This constructor is side-effect free: it has no store attached.
    pub fn new(config: &Config) -> Self {
        Self::from_snapshot(config, Snapshot::new(), config.extent(), None)
    }

    /// Attach `store` and load the snapshot saved under the table key.
    ///
    /// Nothing is read when `save_to_store` is off; the store is then never
    /// written either. The extent is widened to cover every stored cell, and
    /// a stored cell past [`Config::limit`] fails the open.
    pub fn open(config: &Config, store: Box<dyn SnapshotStore>) -> Result<Self> {
        let snapshot = if config.save_to_store {
            Self::load_snapshot(store.as_ref(), &config.table_key())?
        } else {
            Snapshot::new()
        };
        let stored = stored_extent(&snapshot, config.limit())?;
        let initial = config.extent();
        let extent = Extent::new(
            initial.max_x.max(stored.max_x),
            initial.max_y.max(stored.max_y),
        );
        Ok(Self::from_snapshot(config, snapshot, extent, Some(store)))
    }

    fn from_snapshot(
        config: &Config,
        snapshot: Snapshot,
        extent: Extent,
        store: Option<Box<dyn SnapshotStore>>,
    ) -> Self {
        let grid = GridStore::from_snapshot(snapshot, extent);
        let evaluator = FormulaEvaluator::with_options(grid.clone(), config.eval_options());
        Document {
            grid,
            evaluator,
            table_key: config.table_key(),
            store,
            save_to_store: config.save_to_store,
        }
    }

    pub fn extent(&self) -> Extent {
        self.grid.extent()
    }

    pub fn table_key(&self) -> &str {
        &self.table_key
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn evaluator(&self) -> &FormulaEvaluator {
        &self.evaluator
    }

    pub fn is_modified(&self) -> bool {
        self.grid.is_dirty()
    }

    pub fn store(&self) -> Option<&dyn SnapshotStore> {
        self.store.as_deref()
    }
}

/// Smallest extent holding every cell in `snapshot`.
///
/// Header coordinates and cells past `limit` are rejected.
pub(crate) fn stored_extent(snapshot: &Snapshot, limit: Extent) -> Result<Extent> {
    let mut extent = Extent::default();
    for (&y, row) in snapshot {
        for &x in row.keys() {
            let coord = Coord::new(x, y);
            if coord.is_header() || !limit.contains(coord) {
                return Err(GridcalcError::StoredCellOutOfBounds { coord, limit });
            }
            extent.max_x = extent.max_x.max(x);
            extent.max_y = extent.max_y.max(y);
        }
    }
    Ok(extent)
}
