//! Error types for gridcalc core.

use thiserror::Error;

use gridcalc_engine::engine::EvalError;

/// Errors that can occur in the document and storage layers.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No file path set")]
    NoFilePath,

    #[error("Cell error: {0}")]
    Cell(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
