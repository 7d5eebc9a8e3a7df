//! Directory-backed snapshot store (`<dir>/<key>.json`).

use std::fs;
use std::path::PathBuf;

use super::SnapshotStore;
use crate::error::{GridcalcError, Result};

const MAX_SNAPSHOT_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    /// File backing `key`. Keys are restricted so they cannot escape `dir`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(GridcalcError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let meta = fs::metadata(&path)?;
        if meta.len() > MAX_SNAPSHOT_FILE_BYTES {
            return Err(GridcalcError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: snapshot too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SNAPSHOT_FILE_BYTES
                ),
            )));
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
