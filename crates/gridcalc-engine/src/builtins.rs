//! Functions registered into the Rhai engine.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`).
//! - `CELL` and `RANGE` are the lookup callbacks the preprocessor targets;
//!   they take zero-based col/row arguments.
//! - Aggregates accept 1 to 4 arguments, each a scalar or a range.

use rhai::{Array, Dynamic, Engine, EvalAltResult};

use crate::engine::{CellRef, ErrorCode, EvalContext, FormulaEvaluator, ReferenceResolver, Value};

pub struct Aggregate {
    pub name: &'static str,
    apply: fn(&[f64]) -> Result<f64, ErrorCode>,
}

pub const AGGREGATES: &[Aggregate] = &[
    Aggregate {
        name: "SUM",
        apply: |nums| Ok(nums.iter().sum()),
    },
    Aggregate {
        name: "AVERAGE",
        apply: |nums| {
            if nums.is_empty() {
                return Err(ErrorCode::DivZero);
            }
            Ok(nums.iter().sum::<f64>() / nums.len() as f64)
        },
    },
    Aggregate {
        name: "MIN",
        apply: |nums| Ok(nums.iter().copied().reduce(f64::min).unwrap_or(0.0)),
    },
    Aggregate {
        name: "MAX",
        apply: |nums| Ok(nums.iter().copied().reduce(f64::max).unwrap_or(0.0)),
    },
    Aggregate {
        name: "COUNT",
        apply: |nums| Ok(nums.len() as f64),
    },
];

fn to_cell_ref(col: i64, row: i64) -> Result<CellRef, Box<EvalAltResult>> {
    match (usize::try_from(col), usize::try_from(row)) {
        (Ok(col), Ok(row)) => Ok(CellRef::new(col, row)),
        _ => Err(ErrorCode::Ref.into_rhai()),
    }
}

/// Collect the numbers in `value`, descending into (nested) arrays.
fn collect_numbers(value: &Dynamic, out: &mut Vec<f64>) {
    if let Ok(n) = value.as_float() {
        out.push(n);
    } else if let Ok(n) = value.as_int() {
        out.push(n as f64);
    } else if let Some(items) = value.read_lock::<Array>() {
        for item in items.iter() {
            collect_numbers(item, out);
        }
    }
}

fn apply_aggregate(aggregate: &Aggregate, args: &[Dynamic]) -> Result<f64, Box<EvalAltResult>> {
    let mut nums = Vec::new();
    for arg in args {
        collect_numbers(arg, &mut nums);
    }
    (aggregate.apply)(&nums).map_err(ErrorCode::into_rhai)
}

fn register_aggregates(engine: &mut Engine) {
    for aggregate in AGGREGATES {
        engine.register_fn(aggregate.name, move |a: Dynamic| {
            apply_aggregate(aggregate, &[a])
        });
        engine.register_fn(aggregate.name, move |a: Dynamic, b: Dynamic| {
            apply_aggregate(aggregate, &[a, b])
        });
        engine.register_fn(aggregate.name, move |a: Dynamic, b: Dynamic, c: Dynamic| {
            apply_aggregate(aggregate, &[a, b, c])
        });
        engine.register_fn(
            aggregate.name,
            move |a: Dynamic, b: Dynamic, c: Dynamic, d: Dynamic| {
                apply_aggregate(aggregate, &[a, b, c, d])
            },
        );
    }
}

/// Register the lookup callbacks and aggregates for one evaluation.
///
/// `ctx` is captured by value: every engine instance knows exactly which
/// cell it evaluates for.
pub fn register_builtins(engine: &mut Engine, evaluator: FormulaEvaluator, ctx: EvalContext) {
    let resolver = ReferenceResolver::new(evaluator.grid().clone());

    // CELL(col, row): raw value of a single cell.
    let resolver_cell = resolver.clone();
    engine.register_fn(
        "CELL",
        move |col: i64, row: i64| -> Result<Dynamic, Box<EvalAltResult>> {
            let target = ReferenceResolver::to_grid(to_cell_ref(col, row)?);
            let raw = resolver_cell
                .resolve_cell(target, &ctx)
                .map_err(ErrorCode::into_rhai)?;
            Ok(Value::from_raw(&raw).to_dynamic())
        },
    );

    // RANGE(c1, r1, c2, r2): array of row arrays; formulas are evaluated.
    let resolver_range = resolver;
    engine.register_fn(
        "RANGE",
        move |c1: i64, r1: i64, c2: i64, r2: i64| -> Result<Array, Box<EvalAltResult>> {
            let start = ReferenceResolver::to_grid(to_cell_ref(c1, r1)?);
            let end = ReferenceResolver::to_grid(to_cell_ref(c2, r2)?);
            let rows = resolver_range
                .resolve_range(start, end, &ctx, |nested, formula| {
                    evaluator.evaluate_in(nested, formula)
                })
                .map_err(ErrorCode::into_rhai)?;

            Ok(rows
                .into_iter()
                .map(|row| {
                    let row: Array = row
                        .iter()
                        .map(|value| match value {
                            Value::Text(raw) => Value::from_raw(raw).to_dynamic(),
                            number => number.to_dynamic(),
                        })
                        .collect();
                    Dynamic::from(row)
                })
                .collect())
        },
    );

    register_aggregates(engine);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Coord, Extent, GridStore};

    fn engine_for(grid: &GridStore, current: Coord) -> Engine {
        let evaluator = FormulaEvaluator::new(grid.clone());
        let mut engine = Engine::new();
        register_builtins(&mut engine, evaluator, EvalContext::root(current));
        engine
    }

    #[test]
    fn test_cell_returns_numbers_and_text() {
        let grid = GridStore::new(Extent::new(3, 3));
        grid.set(1, 1, "10");
        grid.set(2, 1, "hello");
        let engine = engine_for(&grid, Coord::new(3, 3));

        let n: f64 = engine.eval("CELL(0, 0)").unwrap();
        assert_eq!(n, 10.0);
        let s: String = engine.eval("CELL(1, 0)").unwrap();
        assert_eq!(s, "hello");
        let empty: String = engine.eval("CELL(1, 1)").unwrap();
        assert_eq!(empty, "");
    }

    #[test]
    fn test_cell_raises_error_codes() {
        let grid = GridStore::new(Extent::new(2, 2));
        let engine = engine_for(&grid, Coord::new(1, 1));

        let err = engine.eval::<Dynamic>("CELL(0, 0)").unwrap_err();
        assert_eq!(ErrorCode::from_rhai(&err), ErrorCode::SelfReference);
        let err = engine.eval::<Dynamic>("CELL(5, 0)").unwrap_err();
        assert_eq!(ErrorCode::from_rhai(&err), ErrorCode::OutOfRange);
        let err = engine.eval::<Dynamic>("CELL(-1, 0)").unwrap_err();
        assert_eq!(ErrorCode::from_rhai(&err), ErrorCode::Ref);
    }

    #[test]
    fn test_range_is_array_of_rows() {
        let grid = GridStore::new(Extent::new(3, 3));
        grid.set(1, 1, "1");
        grid.set(2, 2, "=3*2");
        let engine = engine_for(&grid, Coord::new(3, 3));

        let rows: Array = engine.eval("RANGE(0, 0, 1, 1)").unwrap();
        assert_eq!(rows.len(), 2);
        let first = rows[0].clone().into_array().unwrap();
        assert_eq!(first[0].as_float().unwrap(), 1.0);
        assert_eq!(first[1].clone().into_string().unwrap(), "");
        let second = rows[1].clone().into_array().unwrap();
        assert_eq!(second[1].as_float().unwrap(), 6.0);
    }

    #[test]
    fn test_aggregates_flatten_ranges_and_scalars() {
        let grid = GridStore::new(Extent::new(3, 3));
        grid.set(1, 1, "1");
        grid.set(1, 2, "2");
        grid.set(1, 3, "text");
        let engine = engine_for(&grid, Coord::new(3, 3));

        let sum: f64 = engine.eval("SUM(RANGE(0, 0, 0, 2), 10)").unwrap();
        assert_eq!(sum, 13.0);
        let count: f64 = engine.eval("COUNT(RANGE(0, 0, 0, 2))").unwrap();
        assert_eq!(count, 2.0);
        let avg: f64 = engine.eval("AVERAGE(RANGE(0, 0, 0, 1))").unwrap();
        assert_eq!(avg, 1.5);
        let max: f64 = engine.eval("MAX(RANGE(0, 0, 0, 2), -4, 7)").unwrap();
        assert_eq!(max, 7.0);
        let min: f64 = engine.eval("MIN(RANGE(0, 0, 0, 2))").unwrap();
        assert_eq!(min, 1.0);
    }

    #[test]
    fn test_average_of_nothing_is_div_zero() {
        let grid = GridStore::new(Extent::new(3, 3));
        let engine = engine_for(&grid, Coord::new(3, 3));
        let err = engine.eval::<Dynamic>("AVERAGE(RANGE(0, 0, 1, 1))").unwrap_err();
        assert_eq!(ErrorCode::from_rhai(&err), ErrorCode::DivZero);
    }
}
