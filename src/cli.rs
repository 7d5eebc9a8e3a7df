//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridcalc_core::Config;

#[derive(Parser, Debug)]
#[command(name = "gridcalc", version, about = "Evaluate a spreadsheet of Rhai formulas.")]
pub struct Args {
    /// Read configuration from this TOML file instead of the user config.
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore any config file and start from the defaults.
    #[arg(long)]
    pub no_config: bool,

    /// Sheet identifier; the sheet is stored as `gridData-<ID>`.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Directory holding saved sheets.
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Do not load or save the sheet.
    #[arg(long)]
    pub no_save: bool,

    /// Initial number of rows.
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Initial number of columns.
    #[arg(long, value_name = "N")]
    pub cols: Option<usize>,

    /// Rows to append after loading.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub add_rows: usize,

    /// Columns to append after loading.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub add_cols: usize,

    /// Set a cell, e.g. `--set A1=10` or `--set 'B1==A1*2'` (repeatable).
    #[arg(long = "set", value_name = "A1=VALUE", value_parser = parse_assignment)]
    pub sets: Vec<(String, String)>,

    /// Print the value of a cell instead of the whole table (repeatable).
    #[arg(long = "eval", value_name = "A1")]
    pub evals: Vec<String>,

    /// Print raw cell contents instead of computed values.
    #[arg(long)]
    pub raw: bool,
}

/// Split `NAME=VALUE` at the first `=`; the value may itself start with `=`.
fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let Some((name, value)) = s.split_once('=') else {
        return Err(format!("expected A1=VALUE, got {:?}", s));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing cell name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Args {
    /// Config from file (unless `--no-config`) with flags applied on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = if self.no_config {
            Config::default()
        } else {
            Config::load(self.config.as_deref()).context("failed to load config")?
        };

        if let Some(id) = &self.id {
            config.table_id = id.clone();
        }
        if let Some(dir) = &self.store {
            config.store_dir = Some(dir.clone());
        }
        if self.no_save {
            config.save_to_store = false;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.columns = cols;
        }
        Ok(config)
    }
}
