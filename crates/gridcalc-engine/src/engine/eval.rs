//! Rhai engine creation and formula evaluation.
//!
//! Every evaluation builds a fresh Rhai engine whose `CELL`/`RANGE`
//! callbacks capture the [`EvalContext`] of that evaluation. Formulas found
//! inside a range are evaluated through a nested context for their own cell,
//! and a result that is itself a formula (`=...`) is evaluated again at the
//! same address until a plain value or an error comes out.

use rhai::{Dynamic, Engine};
use tracing::{debug, warn};

use super::{Coord, ErrorCode, EvalContext, EvaluationResult, GridStore, preprocess_formula};

/// Display text used for any failed formula.
pub const INVALID_DISPLAY: &str = "INVALID";

/// Limits and display settings for a [`FormulaEvaluator`].
#[derive(Clone, Debug, PartialEq)]
pub struct EvalOptions {
    /// Deepest allowed nesting of formulas evaluated from inside ranges.
    pub max_depth: usize,
    /// Longest allowed formula chain (`=A1` resolving to `=...`).
    pub max_chain: usize,
    /// Rhai operation budget for a single evaluation step.
    pub max_operations: u64,
    /// Shown in place of a formula that evaluates to an error.
    pub invalid_display: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_depth: 10,
            max_chain: 1_000,
            max_operations: 1_000_000,
            invalid_display: INVALID_DISPLAY.to_string(),
        }
    }
}

/// Evaluates formulas against a [`GridStore`].
///
/// Holds no per-evaluation state: the result for a cell is a pure function of
/// the grid contents and the address. Clones share the grid.
#[derive(Clone, Debug)]
pub struct FormulaEvaluator {
    grid: GridStore,
    options: EvalOptions,
}

impl FormulaEvaluator {
    pub fn new(grid: GridStore) -> FormulaEvaluator {
        FormulaEvaluator::with_options(grid, EvalOptions::default())
    }

    pub fn with_options(grid: GridStore, options: EvalOptions) -> FormulaEvaluator {
        FormulaEvaluator { grid, options }
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluate `expr` (a formula without its leading `=`) for the cell at
    /// `address`.
    pub fn evaluate(&self, address: Coord, expr: &str) -> EvaluationResult {
        self.evaluate_in(EvalContext::root(address), expr)
    }

    /// Evaluate `expr` within an explicit context, following formula chains.
    pub fn evaluate_in(&self, ctx: EvalContext, expr: &str) -> EvaluationResult {
        if ctx.depth > self.options.max_depth {
            warn!(cell = %ctx.current, depth = ctx.depth, "nested evaluation limit reached");
            return EvaluationResult::err(ErrorCode::RecursionLimit);
        }

        let mut expr = expr.to_string();
        let mut steps = 0usize;
        loop {
            let result = self.evaluate_step(ctx, &expr);
            if result.is_error() {
                return result;
            }

            let text = result.value.to_string();
            let Some(next) = text.strip_prefix('=') else {
                return result;
            };

            steps += 1;
            if steps > self.options.max_chain {
                warn!(cell = %ctx.current, steps, "formula chain limit reached");
                return EvaluationResult::err(ErrorCode::RecursionLimit);
            }
            debug!(cell = %ctx.current, next, "formula resolved to another formula");
            expr = next.to_string();
        }
    }

    fn evaluate_step(&self, ctx: EvalContext, expr: &str) -> EvaluationResult {
        let engine = create_engine(self, ctx);
        let script = preprocess_formula(expr);
        debug!(cell = %ctx.current, depth = ctx.depth, script = %script, "evaluating formula");

        let result = EvaluationResult::from_rhai(engine.eval::<Dynamic>(&script));
        if let Some(code) = result.error {
            debug!(cell = %ctx.current, error = code.kind(), "formula failed");
        }
        result
    }

    /// Evaluate whatever is stored at `address`. `None` for literals.
    pub fn evaluate_cell(&self, address: Coord) -> Option<EvaluationResult> {
        let raw = self.grid.get_at(address);
        raw.strip_prefix('=').map(|expr| self.evaluate(address, expr))
    }

    /// Text to show for `raw` at `address`.
    ///
    /// Literals are shown unchanged; formulas show their value, or the
    /// invalid marker when they fail.
    pub fn compute_display(&self, address: Coord, raw: &str) -> String {
        let Some(expr) = raw.strip_prefix('=') else {
            return raw.to_string();
        };
        let result = self.evaluate(address, expr);
        match result.error {
            Some(_) => self.options.invalid_display.clone(),
            None => result.value.to_string(),
        }
    }
}

/// Create a Rhai engine wired to `evaluator`'s grid for the cell in `ctx`.
pub fn create_engine(evaluator: &FormulaEvaluator, ctx: EvalContext) -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(evaluator.options.max_operations);
    crate::builtins::register_builtins(&mut engine, evaluator.clone(), ctx);
    engine
}
