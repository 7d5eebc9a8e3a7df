//! Formula evaluation engine API.
//!
//! - [`GridStore`] - sparse `row -> column -> raw value` storage with a growable extent
//! - [`Coord`], [`CellRef`] - grid coordinates (1-based) and A1 references (0-based)
//! - [`ReferenceResolver`] - cell/range lookups with extent and self-reference checks
//! - [`FormulaEvaluator`] - evaluates formulas through Rhai, following formula chains
//! - [`preprocess_formula`] - rewrites A1 references into lookup callbacks
//! - [`ErrorCode`], [`EvaluationResult`], [`Value`] - evaluation outcomes

mod cell_ref;
mod coord;
mod error;
mod eval;
mod format;
mod grid;
mod preprocess;
mod resolver;
mod value;

pub use cell_ref::CellRef;
pub use coord::{Coord, EvalContext, Extent};
pub use error::ErrorCode;
pub use eval::{EvalOptions, FormulaEvaluator, INVALID_DISPLAY, create_engine};
pub use format::format_number;
pub use grid::{GridStore, Snapshot};
pub use preprocess::preprocess_formula;
pub use resolver::ReferenceResolver;
pub use value::{EvaluationResult, Value};
