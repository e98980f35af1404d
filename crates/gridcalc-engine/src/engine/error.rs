//! Error types for formula evaluation.

use thiserror::Error;

/// Errors produced while evaluating a cell's formula.
///
/// All variants are ordinary values: an error marks the cell that produced
/// it and never aborts the program.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The cell text does not start with `=`; callers fall back to treating
    /// the cell as a literal.
    #[error("not a formula")]
    NotAFormula,

    #[error("syntax error: {0}")]
    Syntax(&'static str),

    #[error("divide by zero")]
    DivideByZero,

    #[error("cell out of range")]
    OutOfRange,

    /// A reference chain revisited a cell still mid-computation.
    #[error("cycle")]
    Cycle,

    #[error("non-integer cell coordinate")]
    NonIntegerCoordinate,

    /// The referenced cell has no value to offer: it holds a literal, or
    /// its own formula failed with its own error.
    #[error("no value for referenced cell")]
    NoValue,
}
