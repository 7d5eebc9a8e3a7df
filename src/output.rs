//! Plain-text output for the command line.

use std::io::Write;

use anyhow::Result;
use gridcalc_core::{Coord, Document};

/// Write `table` one row per line, cells separated by tabs.
pub fn write_table(out: &mut impl Write, table: &[Vec<String>]) -> Result<()> {
    for row in table {
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// Write `<cell>\t<value>`, or `<cell>\t<invalid marker>\t<code>` on error.
pub fn write_evaluation(out: &mut impl Write, doc: &Document, coord: Coord, raw: bool) -> Result<()> {
    if raw {
        writeln!(out, "{}\t{}", coord, doc.raw(coord))?;
        return Ok(());
    }
    match doc.evaluate(coord).into_result() {
        Ok(value) => writeln!(out, "{}\t{}", coord, value)?,
        Err(code) => writeln!(
            out,
            "{}\t{}\t{}",
            coord,
            doc.evaluator().options().invalid_display,
            code
        )?,
    }
    Ok(())
}
