//! A1-notation references as the formula engine sees them.
//!
//! The preprocessor turns `B3` into a [`CellRef`] with zero-based indices
//! (`col = 1`, `row = 2`). Grid storage is one-based because row and column
//! zero hold the headers; [`CellRef::to_coord`] is the single place where the
//! two spaces meet.
//!
//! ```
//! use gridcalc_engine::engine::{CellRef, Coord};
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!((cell.col, cell.row), (1, 2));
//! assert_eq!(cell.to_coord(), Coord::new(2, 3));
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::coord::Coord;

/// A zero-based column/row reference parsed from A1 notation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Parse `A1`, `b7`, `AA10`. `$` anchors are accepted and ignored.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name.trim())?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Grid coordinate of this reference (headers occupy index 0).
    pub fn to_coord(self) -> Coord {
        Coord::new(self.col + 1, self.row + 1)
    }

    /// Reference for a grid coordinate; `None` for header cells.
    pub fn from_coord(coord: Coord) -> Option<CellRef> {
        if coord.is_header() {
            return None;
        }
        Some(CellRef::new(coord.x - 1, coord.y - 1))
    }

    /// Column letters for a zero-based index (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        // Bijective base 26, least significant letter first.
        let mut letters = Vec::new();
        let mut rest = Some(col);
        while let Some(n) = rest {
            letters.push(b'A' + (n % 26) as u8);
            rest = (n / 26).checked_sub(1);
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$?(?<letters>[A-Za-z]+)\$?(?<numbers>[0-9]+)$")
            .expect("A1 reference regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}
