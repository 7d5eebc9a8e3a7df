//! JSON codec for persisted sheets.
//!
//! A sheet is stored as nested objects keyed by row then column:
//!
//! ```json
//! {"1": {"1": "10", "2": "=A1*2"}, "3": {"1": "total"}}
//! ```
//!
//! The extent is not part of the snapshot.

use crate::error::Result;
use gridcalc_engine::engine::Snapshot;

pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

pub fn decode_snapshot(content: &str) -> Result<Snapshot> {
    if content.trim().is_empty() {
        return Ok(Snapshot::new());
    }
    Ok(serde_json::from_str(content)?)
}
