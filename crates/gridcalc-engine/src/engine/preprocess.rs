//! Formula preprocessing.
//!
//! Rhai knows nothing about A1 notation, so before a formula is evaluated its
//! references are rewritten into calls to the two lookup callbacks:
//!
//! - `A1` → `CELL(0, 0)`
//! - `A1:B5` → `RANGE(0, 0, 1, 4)` (col/row order, zero-based)
//!
//! String literals are left untouched, and `$` anchors are dropped.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z]+[0-9]+)(?:\s*:\s*([A-Za-z]+[0-9]+))?\b")
            .expect("reference regex must compile")
    })
}

/// Rewrite cell and range references into `CELL`/`RANGE` calls.
pub fn preprocess_formula(formula: &str) -> String {
    map_outside_strings(formula, rewrite_references)
}

fn rewrite_references(segment: &str) -> String {
    let segment = segment.replace('$', "");
    reference_re()
        .replace_all(&segment, |caps: &regex::Captures| {
            let Some(start) = CellRef::from_str(&caps[1]) else {
                return caps[0].to_string();
            };
            match caps.get(2) {
                Some(end) => match CellRef::from_str(end.as_str()) {
                    Some(end) => format!(
                        "RANGE({}, {}, {}, {})",
                        start.col, start.row, end.col, end.row
                    ),
                    None => caps[0].to_string(),
                },
                None => format!("CELL({}, {})", start.col, start.row),
            }
        })
        .to_string()
}

/// Apply `f` to every part of `script` that lies outside a `"..."` literal.
fn map_outside_strings(script: &str, f: impl Fn(&str) -> String) -> String {
    let bytes = script.as_bytes();
    let mut out = String::with_capacity(script.len());
    let mut seg_start = 0;
    let mut in_string = false;
    let mut backslashes = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if b == b'\\' {
                backslashes += 1;
                continue;
            }
            if b == b'"' && backslashes % 2 == 0 {
                out.push_str(&script[seg_start..=i]);
                in_string = false;
                seg_start = i + 1;
            }
            backslashes = 0;
            continue;
        }

        if b == b'"' {
            out.push_str(&f(&script[seg_start..i]));
            in_string = true;
            seg_start = i;
            backslashes = 0;
        }
    }

    if seg_start < script.len() {
        if in_string {
            out.push_str(&script[seg_start..]);
        } else {
            out.push_str(&f(&script[seg_start..]));
        }
    }

    out
}
