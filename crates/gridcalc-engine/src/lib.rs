//! gridcalc_engine - sparse grid storage and Rhai-backed formula evaluation.

pub(crate) mod builtins;
pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn sheet(extent: Extent, cells: &[(&str, &str)]) -> FormulaEvaluator {
        let grid = GridStore::new(extent);
        for (name, raw) in cells {
            let coord = CellRef::from_str(name).unwrap().to_coord();
            grid.set_at(coord, *raw);
        }
        FormulaEvaluator::new(grid)
    }

    fn display(evaluator: &FormulaEvaluator, name: &str) -> String {
        let coord = CellRef::from_str(name).unwrap().to_coord();
        evaluator.compute_display(coord, &evaluator.grid().get_at(coord))
    }

    #[test]
    fn test_from_str_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!((a1.col, a1.row), (0, 0));

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_from_str_multi_letter_columns() {
        assert_eq!(CellRef::from_str("AA1").unwrap().col, 26);
        assert_eq!(CellRef::from_str("AZ1").unwrap().col, 51);
        assert_eq!(CellRef::from_str("BA1").unwrap().col, 52);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        let lower = CellRef::from_str("a1").unwrap();
        assert_eq!((lower.col, lower.row), (0, 0));
        assert_eq!(CellRef::from_str("aA1").unwrap().col, 26);
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("ABC").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
    }

    #[test]
    fn test_sheet_with_mixed_cells() {
        let evaluator = sheet(
            Extent::new(4, 4),
            &[
                ("A1", "10"),
                ("A2", "20"),
                ("A3", "=A1+A2"),
                ("B1", "=SUM(A1:A3)"),
                ("B2", "=AVERAGE(A1:A2)"),
                ("C1", "label"),
                ("C2", "=C1"),
            ],
        );
        assert_eq!(display(&evaluator, "A3"), "30");
        assert_eq!(display(&evaluator, "B1"), "60");
        assert_eq!(display(&evaluator, "B2"), "15");
        assert_eq!(display(&evaluator, "C1"), "label");
        assert_eq!(display(&evaluator, "C2"), "label");
        assert_eq!(display(&evaluator, "D4"), "");
    }

    #[test]
    fn test_formula_to_formula_chain_across_cells() {
        let evaluator = sheet(Extent::new(3, 3), &[("A1", "=5"), ("B1", "=A1"), ("C1", "=B1")]);
        assert_eq!(display(&evaluator, "B1"), "5");
        assert_eq!(display(&evaluator, "C1"), "5");
    }

    #[test]
    fn test_errors_display_as_invalid_but_keep_their_kind() {
        let evaluator = sheet(Extent::new(2, 2), &[("A1", "=1/0"), ("A2", "=C1"), ("B1", "=B1")]);
        for name in ["A1", "A2", "B1"] {
            assert_eq!(display(&evaluator, name), INVALID_DISPLAY);
        }

        let kind = |name: &str| {
            let coord = CellRef::from_str(name).unwrap().to_coord();
            evaluator.evaluate_cell(coord).unwrap().error
        };
        assert_eq!(kind("A1"), Some(ErrorCode::DivZero));
        assert_eq!(kind("A2"), Some(ErrorCode::OutOfRange));
        assert_eq!(kind("B1"), Some(ErrorCode::SelfReference));
    }

    #[test]
    fn test_growing_extent_brings_references_into_range() {
        let evaluator = sheet(Extent::new(1, 1), &[("A1", "=B1")]);
        assert_eq!(display(&evaluator, "A1"), INVALID_DISPLAY);

        evaluator.grid().grow_columns();
        evaluator.grid().set(2, 1, "9");
        assert_eq!(display(&evaluator, "A1"), "9");
    }

    #[test]
    fn test_custom_invalid_marker() {
        let grid = GridStore::new(Extent::new(2, 2));
        let options = EvalOptions {
            invalid_display: "#ERR".to_string(),
            ..EvalOptions::default()
        };
        let evaluator = FormulaEvaluator::with_options(grid, options);
        assert_eq!(evaluator.compute_display(Coord::new(1, 1), "=A1"), "#ERR");
    }
}
