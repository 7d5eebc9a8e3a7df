//! Sheet configuration.
//!
//! Read from `config.toml` in the user's config directory (or an explicit
//! path). Every field is optional:
//!
//! ```toml
//! rows = 20
//! columns = 8
//! table_id = "budget"
//! save_to_store = true
//! store_dir = "/home/me/.local/share/gridcalc"
//! invalid_display = "INVALID"
//! max_rows = 1048576
//! max_columns = 16384
//!
//! [eval]
//! max_depth = 10
//! max_chain = 1000
//! max_operations = 1000000
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{EvalOptions, Extent, INVALID_DISPLAY};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Prefix of the store key a sheet is saved under.
pub const TABLE_KEY_PREFIX: &str = "gridData-";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Initial number of data rows.
    pub rows: usize,
    /// Initial number of data columns.
    pub columns: usize,
    /// Identifies the sheet in the store (`gridData-<table_id>`).
    pub table_id: String,
    /// Load from and save to the snapshot store.
    pub save_to_store: bool,
    /// Directory for the file store; defaults to the user data directory.
    pub store_dir: Option<PathBuf>,
    pub invalid_display: String,
    /// Largest grid a stored sheet may describe; initial sizes are capped to it.
    pub max_rows: usize,
    pub max_columns: usize,
    pub eval: EvalConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub max_depth: usize,
    pub max_chain: usize,
    pub max_operations: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 10,
            columns: 6,
            table_id: "default".to_string(),
            save_to_store: true,
            store_dir: None,
            invalid_display: INVALID_DISPLAY.to_string(),
            max_rows: 1_048_576,
            max_columns: 16_384,
            eval: EvalConfig::default(),
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        let options = EvalOptions::default();
        EvalConfig {
            max_depth: options.max_depth,
            max_chain: options.max_chain,
            max_operations: options.max_operations,
        }
    }
}

impl Config {
    /// Load `path`, or the user config file when `path` is `None`.
    ///
    /// A missing user config file yields the defaults; a missing explicit
    /// path is an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match user_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Config::default()),
            },
        };

        let meta = std::fs::metadata(&path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(GridcalcError::Config {
                path: path.display().to_string(),
                message: format!(
                    "file too large ({} bytes, max {})",
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let config = Config::from_toml(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse TOML content; `origin` names the source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> Result<Config> {
        toml::from_str(content).map_err(|err| GridcalcError::Config {
            path: origin.to_string(),
            message: err.to_string(),
        })
    }

    /// Initial extent, capped to [`Config::limit`].
    pub fn extent(&self) -> Extent {
        let limit = self.limit();
        Extent::new(self.columns.min(limit.max_x), self.rows.min(limit.max_y))
    }

    pub fn limit(&self) -> Extent {
        Extent::new(self.max_columns, self.max_rows)
    }

    pub fn table_key(&self) -> String {
        format!("{}{}", TABLE_KEY_PREFIX, self.table_id)
    }

    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            max_depth: self.eval.max_depth,
            max_chain: self.eval.max_chain,
            max_operations: self.eval.max_operations,
            invalid_display: self.invalid_display.clone(),
        }
    }

    /// Configured store directory, falling back to the user data directory.
    pub fn resolved_store_dir(&self) -> Option<PathBuf> {
        self.store_dir.clone().or_else(default_store_dir)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "gridcalc")
}

/// `<config dir>/gridcalc/config.toml`, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = project_dirs()?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

pub fn default_store_dir() -> Option<PathBuf> {
    Some(project_dirs()?.data_dir().to_path_buf())
}
