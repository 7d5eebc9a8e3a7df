//! gridcalc-core - UI-agnostic sheet model, configuration and storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::Config;
pub use document::Document;
pub use error::{GridcalcError, Result};

pub use gridcalc_engine::engine::{CellRef, Coord, ErrorCode, Extent};
