//! Grid coordinates and the per-call evaluation context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid position: `x` is the column, `y` the row.
///
/// Row 0 and column 0 hold the headers, so data cells start at `(1, 1)`.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Coord {
        Coord { x, y }
    }

    pub fn is_header(&self) -> bool {
        self.x == 0 || self.y == 0
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::CellRef::from_coord(*self) {
            Some(cell) => write!(f, "{}", cell),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// Current grid size in data columns (`max_x`) and data rows (`max_y`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub max_x: usize,
    pub max_y: usize,
}

impl Extent {
    pub const fn new(max_x: usize, max_y: usize) -> Extent {
        Extent { max_x, max_y }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x <= self.max_x && coord.y <= self.max_y
    }
}

/// The cell being evaluated and how deeply this evaluation is nested.
///
/// Handed by value to every resolver and evaluator call. A nested evaluation
/// (a formula found inside a range) gets its own context, so the outer
/// call's self-reference check is never disturbed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EvalContext {
    pub current: Coord,
    pub depth: usize,
}

impl EvalContext {
    pub fn root(current: Coord) -> EvalContext {
        EvalContext { current, depth: 0 }
    }

    /// Context for evaluating `cell` on behalf of this one.
    pub fn nested(&self, cell: Coord) -> EvalContext {
        EvalContext {
            current: cell,
            depth: self.depth + 1,
        }
    }
}
