use super::Document;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{CellRef, Coord, EvaluationResult, Value};
use tracing::debug;

impl Document {
    /// Grid coordinate for an A1-style name such as `B2` or `$C$10`.
    pub fn coord_of(name: &str) -> Result<Coord> {
        CellRef::from_str(name)
            .map(CellRef::to_coord)
            .ok_or_else(|| GridcalcError::InvalidCellRef(name.to_string()))
    }

    fn check_editable(&self, coord: Coord) -> Result<()> {
        if coord.is_header() {
            return Err(GridcalcError::HeaderCell(coord));
        }
        let extent = self.extent();
        if !extent.contains(coord) {
            return Err(GridcalcError::OutsideExtent { coord, extent });
        }
        Ok(())
    }

    /// Store `value` as the raw content of `coord` and persist the sheet.
    pub fn set_cell(&mut self, coord: Coord, value: impl Into<String>) -> Result<()> {
        self.check_editable(coord)?;
        let value = value.into();
        debug!(cell = %coord, raw = %value, "set cell");
        self.grid.set_at(coord, value);
        self.save()?;
        Ok(())
    }

    pub fn set_cell_a1(&mut self, name: &str, value: impl Into<String>) -> Result<Coord> {
        let coord = Self::coord_of(name)?;
        self.set_cell(coord, value)?;
        Ok(coord)
    }

    pub fn raw(&self, coord: Coord) -> String {
        self.grid.get_at(coord)
    }

    /// What the sheet shows for `coord`: literals verbatim, formulas as
    /// their value or the invalid marker.
    pub fn display(&self, coord: Coord) -> String {
        self.evaluator.compute_display(coord, &self.raw(coord))
    }

    /// Full evaluation result for `coord`. Literals evaluate to themselves.
    pub fn evaluate(&self, coord: Coord) -> EvaluationResult {
        self.evaluator
            .evaluate_cell(coord)
            .unwrap_or_else(|| EvaluationResult::ok(Value::Text(self.raw(coord))))
    }

    pub fn add_row(&mut self) {
        self.grid.grow_rows();
        debug!(rows = self.extent().max_y, "added row");
    }

    pub fn add_column(&mut self) {
        self.grid.grow_columns();
        debug!(columns = self.extent().max_x, "added column");
    }

    /// The whole table including headers.
    ///
    /// Row 0 is the column header row (empty corner, then `A`, `B`, ...);
    /// column 0 holds the row numbers.
    pub fn render(&self) -> Vec<Vec<String>> {
        self.render_with(|coord| self.display(coord))
    }

    /// Like [`Document::render`], but with raw cell contents.
    pub fn render_raw(&self) -> Vec<Vec<String>> {
        self.render_with(|coord| self.raw(coord))
    }

    fn render_with(&self, cell: impl Fn(Coord) -> String) -> Vec<Vec<String>> {
        let extent = self.extent();
        (0..=extent.max_y)
            .map(|y| {
                (0..=extent.max_x)
                    .map(|x| match (x, y) {
                        (0, 0) => String::new(),
                        (x, 0) => CellRef::col_to_letters(x - 1),
                        (0, y) => y.to_string(),
                        (x, y) => cell(Coord::new(x, y)),
                    })
                    .collect()
            })
            .collect()
    }
}
