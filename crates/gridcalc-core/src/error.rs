//! Error types for Gridcalc core.

use thiserror::Error;

use gridcalc_engine::engine::{Coord, Extent};

/// Errors that can occur while loading, editing or saving a sheet.
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Cell {0} is a header and cannot hold a value")]
    HeaderCell(Coord),

    #[error("Cell {coord} is outside the grid ({}x{})", extent.max_x, extent.max_y)]
    OutsideExtent { coord: Coord, extent: Extent },

    #[error(
        "Stored cell {coord} is outside the allowed grid ({}x{})",
        limit.max_x,
        limit.max_y
    )]
    StoredCellOutOfBounds { coord: Coord, limit: Extent },

    #[error("Invalid store key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
