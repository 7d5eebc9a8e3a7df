//! Property tests for the grid store, resolver and evaluator.

use gridcalc_engine::engine::{
    Coord, ErrorCode, EvalContext, Extent, FormulaEvaluator, GridStore, ReferenceResolver, Value,
};
use proptest::prelude::*;

fn grid_with_values(extent: Extent, values: &[(usize, usize, String)]) -> GridStore {
    let grid = GridStore::new(extent);
    for (x, y, v) in values {
        grid.set(*x, *y, v.clone());
    }
    grid
}

proptest! {
    #[test]
    fn resolve_cell_inside_extent_only_fails_on_self(
        max_x in 1usize..20,
        max_y in 1usize..20,
        tx in 1usize..20,
        ty in 1usize..20,
        cx in 1usize..20,
        cy in 1usize..20,
    ) {
        prop_assume!(tx <= max_x && ty <= max_y);
        let resolver = ReferenceResolver::new(GridStore::new(Extent::new(max_x, max_y)));
        let ctx = EvalContext::root(Coord::new(cx, cy));
        let result = resolver.resolve_cell(Coord::new(tx, ty), &ctx);
        if (tx, ty) == (cx, cy) {
            prop_assert_eq!(result, Err(ErrorCode::SelfReference));
        } else {
            prop_assert_eq!(result, Ok(String::new()));
        }
    }

    #[test]
    fn resolve_cell_outside_extent_is_out_of_range(
        max_x in 0usize..20,
        max_y in 0usize..20,
        dx in 1usize..10,
        dy in 0usize..10,
        swap in any::<bool>(),
    ) {
        let resolver = ReferenceResolver::new(GridStore::new(Extent::new(max_x, max_y)));
        let target = if swap {
            Coord::new(dy.min(max_x), max_y + dx)
        } else {
            Coord::new(max_x + dx, dy.min(max_y))
        };
        let ctx = EvalContext::root(target);
        prop_assert_eq!(resolver.resolve_cell(target, &ctx), Err(ErrorCode::OutOfRange));
    }

    #[test]
    fn display_is_identity_for_literals(raw in "[^=].*|") {
        let evaluator = FormulaEvaluator::new(GridStore::new(Extent::new(3, 3)));
        prop_assert_eq!(evaluator.compute_display(Coord::new(1, 1), &raw), raw);
    }

    #[test]
    fn empty_ranges_are_all_empty_strings(w in 1usize..6, h in 1usize..6) {
        let resolver = ReferenceResolver::new(GridStore::new(Extent::new(10, 10)));
        let ctx = EvalContext::root(Coord::new(10, 10));
        let values = resolver
            .resolve_range(Coord::new(1, 1), Coord::new(w, h), &ctx, |_, _| {
                panic!("empty grid has no formulas")
            })
            .unwrap();
        prop_assert_eq!(values, vec![vec![Value::empty(); w]; h]);
    }

    #[test]
    fn extent_growth_is_monotonic(ops in proptest::collection::vec(any::<bool>(), 0..40)) {
        let grid = GridStore::new(Extent::new(2, 3));
        let mut previous = grid.extent();
        for grow_row in &ops {
            if *grow_row {
                grid.grow_rows();
            } else {
                grid.grow_columns();
            }
            let now = grid.extent();
            prop_assert!(now.max_x >= previous.max_x && now.max_y >= previous.max_y);
            previous = now;
        }
        let rows = ops.iter().filter(|r| **r).count();
        prop_assert_eq!(grid.extent(), Extent::new(2 + ops.len() - rows, 3 + rows));
    }

    #[test]
    fn reevaluation_is_idempotent(
        values in proptest::collection::vec((1usize..4, 1usize..4, -100i64..100), 0..8),
    ) {
        let values: Vec<_> = values.into_iter().map(|(x, y, n)| (x, y, n.to_string())).collect();
        let evaluator = FormulaEvaluator::new(grid_with_values(Extent::new(4, 4), &values));
        let at = Coord::new(4, 4);
        let first = evaluator.evaluate(at, "SUM(A1:C3) + A1");
        let second = evaluator.evaluate(at, "SUM(A1:C3) + A1");
        prop_assert_eq!(first, second);
    }
}

#[test]
fn growing_rows_twice_adds_exactly_two() {
    let grid = GridStore::new(Extent::new(5, 5));
    grid.grow_rows();
    grid.grow_columns();
    grid.grow_rows();
    assert_eq!(grid.extent(), Extent::new(6, 7));
}

#[test]
fn range_with_self_referencing_member_skips_the_rest() {
    let grid = GridStore::new(Extent::new(3, 3));
    grid.set(2, 1, "=B1");
    grid.set(3, 1, "=C9");
    let resolver = ReferenceResolver::new(grid.clone());
    let evaluator = FormulaEvaluator::new(grid);
    let ctx = EvalContext::root(Coord::new(3, 3));

    let mut evaluated = Vec::new();
    let result = resolver.resolve_range(Coord::new(1, 1), Coord::new(3, 1), &ctx, |nested, f| {
        evaluated.push(nested.current);
        evaluator.evaluate_in(nested, f)
    });
    assert_eq!(result, Err(ErrorCode::SelfReference));
    assert_eq!(evaluated, vec![Coord::new(2, 1)]);
}
