//! Evaluated values and the result type returned by the evaluator.

use rhai::{Dynamic, EvalAltResult};
use std::fmt;

use super::ErrorCode;
use super::format::format_number;

/// A computed cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    /// A raw literal as the formula engine should see it: numeric text becomes
    /// a number, anything else stays text.
    pub fn from_raw(raw: &str) -> Value {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub(crate) fn to_dynamic(&self) -> Dynamic {
        match self {
            Value::Number(n) => Dynamic::from(*n),
            Value::Text(s) => Dynamic::from(s.clone()),
        }
    }

    /// Convert a Rhai result into a cell value.
    ///
    /// Arrays (a bare range such as `=A1:B2`) have no single-cell value and
    /// non-finite numbers are arithmetic failures.
    pub(crate) fn from_dynamic(value: Dynamic) -> Result<Value, ErrorCode> {
        if value.is_unit() {
            return Ok(Value::empty());
        }
        if let Ok(n) = value.as_float() {
            return if n.is_nan() {
                Err(ErrorCode::Num)
            } else if n.is_infinite() {
                Err(ErrorCode::DivZero)
            } else {
                Ok(Value::Number(n))
            };
        }
        if let Ok(n) = value.as_int() {
            return Ok(Value::Number(n as f64));
        }
        if let Ok(b) = value.as_bool() {
            return Ok(Value::Text(if b { "TRUE" } else { "FALSE" }.to_string()));
        }
        if let Some(code) = value.clone().try_cast::<ErrorCode>() {
            return Err(code);
        }
        if value.is_array() || value.is_map() {
            return Err(ErrorCode::Value);
        }
        if let Ok(s) = value.clone().into_string() {
            return Ok(Value::Text(s));
        }
        if let Ok(c) = value.as_char() {
            return Ok(Value::Text(c.to_string()));
        }
        Ok(Value::Text(value.to_string()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Outcome of evaluating one formula.
///
/// When `error` is set the value carries no meaning for display.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    pub value: Value,
    pub error: Option<ErrorCode>,
}

impl EvaluationResult {
    pub fn ok(value: Value) -> EvaluationResult {
        EvaluationResult { value, error: None }
    }

    pub fn err(code: ErrorCode) -> EvaluationResult {
        EvaluationResult {
            value: Value::empty(),
            error: Some(code),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn from_rhai(result: Result<Dynamic, Box<EvalAltResult>>) -> EvaluationResult {
        match result.map_err(|e| ErrorCode::from_rhai(&e)).and_then(Value::from_dynamic) {
            Ok(value) => EvaluationResult::ok(value),
            Err(code) => EvaluationResult::err(code),
        }
    }

    /// `Ok(value)` or `Err(code)`, for callers that want `?`.
    pub fn into_result(self) -> Result<Value, ErrorCode> {
        match self.error {
            Some(code) => Err(code),
            None => Ok(self.value),
        }
    }
}
