use super::Document;
use crate::error::Result;
use crate::storage::{SnapshotStore, decode_snapshot, encode_snapshot};
use gridcalc_engine::engine::Snapshot;
use tracing::{debug, info};

impl Document {
    pub(crate) fn load_snapshot(store: &dyn SnapshotStore, key: &str) -> Result<Snapshot> {
        match store.get(key)? {
            Some(content) => {
                let snapshot = decode_snapshot(&content)?;
                info!(key, rows = snapshot.len(), "loaded snapshot");
                Ok(snapshot)
            }
            None => {
                debug!(key, "no stored snapshot");
                Ok(Snapshot::new())
            }
        }
    }

    /// Write the snapshot to the store if anything changed since the last
    /// save. Returns whether a snapshot was written.
    pub fn save(&mut self) -> Result<bool> {
        if !self.save_to_store || !self.grid.is_dirty() {
            return Ok(false);
        }
        let Some(store) = self.store.as_mut() else {
            return Ok(false);
        };

        let content = encode_snapshot(&self.grid.snapshot())?;
        store.set(&self.table_key, &content)?;
        self.grid.mark_clean();
        info!(key = %self.table_key, cells = self.grid.len(), "saved snapshot");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::document::Document;
    use crate::error::GridcalcError;
    use crate::storage::{MemoryStore, SnapshotStore};
    use gridcalc_engine::engine::{Coord, Extent};
    use pretty_assertions::assert_eq;

    fn config(id: &str) -> Config {
        Config {
            rows: 3,
            columns: 3,
            table_id: id.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_open_loads_and_widens_extent() {
        let mut store = MemoryStore::new();
        store
            .set("gridData-t1", r#"{"1":{"1":"4"},"5":{"7":"=A1*2"}}"#)
            .unwrap();

        let doc = Document::open(&config("t1"), Box::new(store)).unwrap();
        assert_eq!(doc.extent(), Extent::new(7, 5));
        assert_eq!(doc.raw(Coord::new(7, 5)), "=A1*2");
        assert_eq!(doc.display(Coord::new(7, 5)), "8");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_edits_are_persisted_under_table_key() {
        let mut doc = Document::open(&config("t2"), Box::new(MemoryStore::new())).unwrap();
        doc.set_cell_a1("B2", "=1+1").unwrap();

        let stored = doc.store().unwrap().get("gridData-t2").unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"2":{"2":"=1+1"}}"#));
        assert!(!doc.is_modified());
        assert!(!doc.save().unwrap());
    }

    #[test]
    fn test_save_to_store_disabled_neither_reads_nor_writes() {
        let mut store = MemoryStore::new();
        store.set("gridData-t3", r#"{"1":{"1":"kept"}}"#).unwrap();
        let config = Config {
            save_to_store: false,
            ..config("t3")
        };

        let mut doc = Document::open(&config, Box::new(store)).unwrap();
        assert_eq!(doc.raw(Coord::new(1, 1)), "");
        doc.set_cell(Coord::new(1, 1), "new").unwrap();
        assert!(!doc.save().unwrap());

        let stored = doc.store().unwrap().get("gridData-t3").unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"1":{"1":"kept"}}"#));
    }

    #[test]
    fn test_snapshot_past_grid_limit_fails_to_open() {
        let mut store = MemoryStore::new();
        store.set("gridData-far", r#"{"4000000000":{"1":"x"}}"#).unwrap();
        let result = Document::open(&config("far"), Box::new(store));
        assert!(matches!(
            result,
            Err(GridcalcError::StoredCellOutOfBounds { limit, .. })
                if limit == Extent::new(16_384, 1_048_576)
        ));
    }

    #[test]
    fn test_corrupt_snapshot_fails_to_open() {
        let mut store = MemoryStore::new();
        store.set("gridData-bad", "[1, 2").unwrap();
        let result = Document::open(&config("bad"), Box::new(store));
        assert!(matches!(result, Err(GridcalcError::Snapshot(_))));
    }
}
