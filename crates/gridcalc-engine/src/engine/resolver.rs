//! Cell and range lookups on behalf of the formula engine.
//!
//! The formula engine addresses cells with zero-based [`CellRef`]s; the grid
//! is one-based. The resolver translates between the two, enforces the
//! extent, and refuses a formula's request for its own cell.

use super::{CellRef, Coord, ErrorCode, EvalContext, EvaluationResult, GridStore, Value};

/// Bridges formula references to the grid.
#[derive(Clone, Debug)]
pub struct ReferenceResolver {
    grid: GridStore,
}

impl ReferenceResolver {
    pub fn new(grid: GridStore) -> ReferenceResolver {
        ReferenceResolver { grid }
    }

    /// Grid coordinate of a formula-engine reference.
    pub fn to_grid(cell: CellRef) -> Coord {
        cell.to_coord()
    }

    /// Raw value of `target`, as seen from the cell in `ctx`.
    ///
    /// Fails with `OutOfRange` past the extent and with `SelfReference` when
    /// `target` is the cell being evaluated. Absent cells are `""`.
    pub fn resolve_cell(&self, target: Coord, ctx: &EvalContext) -> Result<String, ErrorCode> {
        if !self.grid.extent().contains(target) {
            return Err(ErrorCode::OutOfRange);
        }
        if target == ctx.current {
            return Err(ErrorCode::SelfReference);
        }
        Ok(self.grid.get_at(target))
    }

    /// Values of the inclusive rectangle spanned by `start` and `end`, row by
    /// row, clipped to the current extent.
    ///
    /// Cells past the extent can never hold a value, so they are left out
    /// rather than returned as `""`; a rectangle entirely past the extent is
    /// empty. Literals are returned as text (absent cells as `""`). Formulas
    /// are handed to `evaluate` together with a context for the formula's own
    /// cell; the first failing formula aborts the whole range.
    pub fn resolve_range<F>(
        &self,
        start: Coord,
        end: Coord,
        ctx: &EvalContext,
        mut evaluate: F,
    ) -> Result<Vec<Vec<Value>>, ErrorCode>
    where
        F: FnMut(EvalContext, &str) -> EvaluationResult,
    {
        let extent = self.grid.extent();
        let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x).min(extent.max_x));
        let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y).min(extent.max_y));
        if min_x > max_x || min_y > max_y {
            return Ok(Vec::new());
        }

        let width = max_x - min_x + 1;
        let mut fragment = Vec::new();
        for y in min_y..=max_y {
            if !self.grid.has_row(y) {
                fragment.push(vec![Value::empty(); width]);
                continue;
            }

            let mut row = Vec::with_capacity(width);
            for x in min_x..=max_x {
                let raw = self.grid.get(x, y);
                let value = match raw.strip_prefix('=') {
                    Some(formula) => {
                        let nested = ctx.nested(Coord::new(x, y));
                        evaluate(nested, formula).into_result()?
                    }
                    None => Value::Text(raw),
                };
                row.push(value);
            }
            fragment.push(row);
        }

        Ok(fragment)
    }
}
