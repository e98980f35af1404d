//! Grid evaluation core.
//!
//! This module provides the computation engine for the grid editor:
//!
//! - [`Cell`], [`CellState`], [`Sheet`] - fixed-extent cell storage with
//!   per-cell cached results
//! - [`Lexer`], [`Token`] - formula tokenization
//! - [`evaluate`] - fused parse-and-evaluate of one formula
//! - [`Sheet::resolve`] - memoized, cycle-safe on-demand recalculation
//! - [`format_number`] - value formatting for display
//! - [`EvalError`] - the evaluation error taxonomy

mod cell;
mod error;
mod eval;
mod format;
mod lexer;
mod recalc;

pub use cell::{Cell, CellState, DEFAULT_COLS, DEFAULT_ROWS, Sheet};
pub use error::EvalError;
pub use eval::{evaluate, find_formula};
pub use format::format_number;
pub use lexer::{Lexer, Token};
