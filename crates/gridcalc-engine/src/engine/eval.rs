//! Fused parser/evaluator for the formula language.
//!
//! Recursive-descent precedence climbing that computes the value while it
//! parses; no syntax tree is built. The first error latches into the
//! evaluation context and fast-forwards the lexer to end-of-input, so a
//! formula reports exactly one error and parsing finishes in a bounded
//! number of steps even after a failure.
//!
//! The `@` operator calls back into [`Sheet::resolve`], which in turn calls
//! [`evaluate`] on stale cells: the two routines are mutually recursive and
//! together walk the dependency graph implicitly.

use super::cell::Sheet;
use super::error::EvalError;
use super::lexer::{Lexer, Token};

/// A formula, if present, follows the `=` prefix after optional blanks.
pub fn find_formula(text: &str) -> Option<&str> {
    text.trim_start().strip_prefix('=')
}

/// Evaluate a cell's text as the cell at (row, col) of the sheet.
///
/// Text without a `=` prefix yields [`EvalError::NotAFormula`]; callers use
/// that to fall back to treating the cell as a literal.
pub fn evaluate(sheet: &mut Sheet, text: &str, row: usize, col: usize) -> Result<f64, EvalError> {
    let formula = find_formula(text).ok_or(EvalError::NotAFormula)?;
    let mut eval = Evaluator {
        sheet,
        row,
        col,
        lexer: Lexer::new(formula),
        token: Token::End,
        error: None,
    };
    eval.advance();
    let value = eval.parse_expr(0);
    if eval.token != Token::End {
        eval.fail(EvalError::Syntax("unexpected token"));
    }
    match eval.error {
        Some(error) => Err(error),
        None => Ok(value),
    }
}

/// Transient context for the evaluation of one formula.
struct Evaluator<'s, 'f> {
    sheet: &'s mut Sheet,
    row: usize,
    col: usize,
    lexer: Lexer<'f>,
    token: Token,
    error: Option<EvalError>,
}

impl Evaluator<'_, '_> {
    /// Record the first error and fast-forward to end-of-input, turning the
    /// rest of the parse into a no-op.
    fn fail(&mut self, error: EvalError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.lexer.jump_to_end();
        self.token = Token::End;
    }

    fn advance(&mut self) {
        match self.lexer.next_token() {
            Ok(token) => self.token = token,
            Err(error) => self.fail(error),
        }
    }

    fn parse_factor(&mut self) -> f64 {
        match self.token {
            Token::Number(value) => {
                self.advance();
                value
            }
            Token::Minus => {
                self.advance();
                -self.parse_factor()
            }
            Token::Col => {
                self.advance();
                self.col as f64
            }
            Token::Row => {
                self.advance();
                self.row as f64
            }
            Token::LParen => {
                self.advance();
                let value = self.parse_expr(0);
                if self.token != Token::RParen {
                    self.fail(EvalError::Syntax("expected ')'"));
                }
                self.advance();
                value
            }
            _ => {
                self.fail(EvalError::Syntax("expected a factor"));
                0.0
            }
        }
    }

    /// Parse an infix subexpression in the right-context of an operator of
    /// the given binding tightness (precedence climbing). Each operator has
    /// a left and a right precedence; the right one controls how tightly it
    /// captures its right operand, which is what makes `^` right-associative
    /// and `r@c` read as a single reference unit.
    fn parse_expr(&mut self, precedence: u8) -> f64 {
        let mut lhs = self.parse_factor();
        loop {
            let op = self.token;
            let (left, right) = match op {
                Token::Plus | Token::Minus => (1, 2),
                Token::Star | Token::Slash | Token::Percent => (3, 4),
                Token::Caret => (5, 5),
                Token::At => (7, 8),
                _ => return lhs,
            };
            if left < precedence {
                return lhs;
            }
            self.advance();
            let rhs = self.parse_expr(right);
            lhs = self.apply(op, lhs, rhs);
        }
    }

    fn apply(&mut self, op: Token, lhs: f64, rhs: f64) -> f64 {
        match op {
            Token::Plus => lhs + rhs,
            Token::Minus => lhs - rhs,
            Token::Star => lhs * rhs,
            Token::Slash => {
                if rhs == 0.0 {
                    self.divide_by_zero()
                } else {
                    lhs / rhs
                }
            }
            Token::Percent => {
                if rhs == 0.0 {
                    self.divide_by_zero()
                } else {
                    lhs % rhs
                }
            }
            Token::Caret => lhs.powf(rhs),
            Token::At => self.refer(lhs, rhs),
            _ => unreachable!("apply called with a non-operator token"),
        }
    }

    fn divide_by_zero(&mut self) -> f64 {
        self.fail(EvalError::DivideByZero);
        0.0
    }

    /// The `row@col` reference operation.
    fn refer(&mut self, row: f64, col: f64) -> f64 {
        if row.fract() != 0.0 || col.fract() != 0.0 {
            self.fail(EvalError::NonIntegerCoordinate);
            return 0.0;
        }
        if row < 0.0 || col < 0.0 {
            self.fail(EvalError::OutOfRange);
            return 0.0;
        }
        let (r, c) = (row as usize, col as usize);
        if !self.sheet.in_range(r, c) {
            // Bad coordinates are this formula's own error, not the far
            // cell's.
            self.fail(EvalError::OutOfRange);
            return 0.0;
        }
        match self.sheet.resolve(r, c) {
            Ok(value) => value,
            // A cycle has no owner cell to blame, so it propagates through
            // unchanged. Any other failure stays reported at the far cell
            // and surfaces here only as the generic "no value" marker.
            Err(EvalError::Cycle) => {
                self.fail(EvalError::Cycle);
                0.0
            }
            Err(_) => {
                self.fail(EvalError::NoValue);
                0.0
            }
        }
    }
}
