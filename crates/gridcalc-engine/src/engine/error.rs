//! Error codes carried by evaluation results.

use rhai::{Dynamic, EvalAltResult, Position};
use thiserror::Error;

/// Everything an evaluation can fail with.
///
/// Codes are data: they travel inside [`EvaluationResult`](super::EvaluationResult)
/// rather than unwinding out of the evaluator. `Display` renders the
/// spreadsheet form (`#DIV/0!`, ...).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A reference points past the current extent.
    #[error("#N/A")]
    OutOfRange,
    /// A formula asked for the cell it is being evaluated for.
    #[error("#REF!")]
    SelfReference,
    /// Nested evaluation or formula chaining went too deep.
    #[error("#CIRC!")]
    RecursionLimit,

    #[error("#ERROR!")]
    Error,
    #[error("#DIV/0!")]
    DivZero,
    #[error("#NAME?")]
    Name,
    #[error("#N/A")]
    NotAvailable,
    #[error("#NULL!")]
    Null,
    #[error("#NUM!")]
    Num,
    #[error("#REF!")]
    Ref,
    #[error("#VALUE!")]
    Value,
}

impl ErrorCode {
    /// Variant name, distinct even where the displayed codes coincide.
    pub fn kind(&self) -> &'static str {
        match self {
            ErrorCode::OutOfRange => "OutOfRange",
            ErrorCode::SelfReference => "SelfReference",
            ErrorCode::RecursionLimit => "RecursionLimit",
            ErrorCode::Error => "Error",
            ErrorCode::DivZero => "DivZero",
            ErrorCode::Name => "Name",
            ErrorCode::NotAvailable => "NotAvailable",
            ErrorCode::Null => "Null",
            ErrorCode::Num => "Num",
            ErrorCode::Ref => "Ref",
            ErrorCode::Value => "Value",
        }
    }

    /// Wrap the code so it can be raised from inside a Rhai call.
    pub(crate) fn into_rhai(self) -> Box<EvalAltResult> {
        EvalAltResult::ErrorRuntime(Dynamic::from(self), Position::NONE).into()
    }

    /// Classify a Rhai failure.
    pub(crate) fn from_rhai(err: &EvalAltResult) -> ErrorCode {
        match err {
            EvalAltResult::ErrorRuntime(value, _) => {
                value.clone().try_cast::<ErrorCode>().unwrap_or(ErrorCode::Error)
            }
            EvalAltResult::ErrorInFunctionCall(_, _, inner, _)
            | EvalAltResult::ErrorInModule(_, inner, _) => ErrorCode::from_rhai(inner),
            EvalAltResult::ErrorParsing(..) => ErrorCode::Error,
            EvalAltResult::ErrorVariableNotFound(..)
            | EvalAltResult::ErrorFunctionNotFound(..)
            | EvalAltResult::ErrorPropertyNotFound(..) => ErrorCode::Name,
            EvalAltResult::ErrorArithmetic(message, _) => {
                if message.to_ascii_lowercase().contains("zero") {
                    ErrorCode::DivZero
                } else {
                    ErrorCode::Num
                }
            }
            EvalAltResult::ErrorMismatchDataType(..)
            | EvalAltResult::ErrorMismatchOutputType(..)
            | EvalAltResult::ErrorIndexingType(..)
            | EvalAltResult::ErrorArrayBounds(..)
            | EvalAltResult::ErrorStringBounds(..) => ErrorCode::Value,
            EvalAltResult::ErrorStackOverflow(..) => ErrorCode::RecursionLimit,
            _ => ErrorCode::Error,
        }
    }
}
