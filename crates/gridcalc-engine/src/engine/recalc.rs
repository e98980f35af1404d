//! On-demand, memoizing recalculation.
//!
//! No dependency graph is ever materialized: [`Sheet::resolve`] recurses
//! through the evaluator's `@` operator, and the per-cell
//! `Stale -> InProgress -> Valid/Error` marker both memoizes results and
//! detects cycles along the way.

use super::cell::{CellState, Sheet};
use super::error::EvalError;
use super::eval::evaluate;

impl Sheet {
    /// Ensure the cell's cached result is fresh and return it.
    ///
    /// The `InProgress` marker is set before recursing into dependencies,
    /// so a re-entrant resolve of the same cell observes it and reports a
    /// cycle without disturbing the cell's stored state; the outer call
    /// still gets to record the cell's final outcome.
    pub fn resolve(&mut self, row: usize, col: usize) -> Result<f64, EvalError> {
        if !self.in_range(row, col) {
            return Err(EvalError::OutOfRange);
        }
        match &self.cell(row, col).state {
            CellState::Valid(value) => return Ok(*value),
            CellState::Error(error) => return Err(error.clone()),
            CellState::InProgress => return Err(EvalError::Cycle),
            CellState::Stale => {}
        }
        self.cell_mut(row, col).state = CellState::InProgress;
        let text = self.cell(row, col).text.clone();
        let result = evaluate(self, &text, row, col);
        self.cell_mut(row, col).state = match &result {
            Ok(value) => CellState::Valid(*value),
            Err(error) => CellState::Error(error.clone()),
        };
        result
    }

    /// Replace a cell's text and conservatively mark the whole sheet stale:
    /// with no dependency edges kept, any edit could affect any cell.
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> Result<(), EvalError> {
        self.set_text_only(row, col, text)?;
        self.invalidate_all();
        Ok(())
    }

    /// Text replacement without invalidation, for amortizing a whole batch
    /// of changes (the file loader). Callers must `invalidate_all`
    /// afterwards.
    pub fn set_text_only(&mut self, row: usize, col: usize, text: &str) -> Result<(), EvalError> {
        if !self.in_range(row, col) {
            return Err(EvalError::OutOfRange);
        }
        let cell = self.cell_mut(row, col);
        if cell.text != text {
            cell.text.clear();
            cell.text.push_str(text);
        }
        Ok(())
    }

    /// Reset every cached result to `Stale`.
    pub fn invalidate_all(&mut self) {
        for cell in &mut self.cells {
            cell.state = CellState::Stale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_out_of_range() {
        let mut sheet = Sheet::new(2, 2);
        assert_eq!(sheet.resolve(2, 0), Err(EvalError::OutOfRange));
        assert_eq!(sheet.resolve(0, 5), Err(EvalError::OutOfRange));
    }

    #[test]
    fn set_text_out_of_range() {
        let mut sheet = Sheet::new(2, 2);
        assert_eq!(sheet.set_text(9, 0, "=1"), Err(EvalError::OutOfRange));
    }

    #[test]
    fn resolve_caches_value_and_error_states() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_text(0, 0, "=6*7").expect("in range");
        sheet.set_text(0, 1, "=1/0").expect("in range");

        assert_eq!(sheet.resolve(0, 0), Ok(42.0));
        assert_eq!(sheet.cell(0, 0).state, CellState::Valid(42.0));

        assert_eq!(sheet.resolve(0, 1), Err(EvalError::DivideByZero));
        assert_eq!(
            sheet.cell(0, 1).state,
            CellState::Error(EvalError::DivideByZero)
        );
    }

    #[test]
    fn resolve_does_not_recompute_until_invalidated() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_text(0, 0, "=1+1").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Ok(2.0));

        // Swap the text without invalidating: the cached result must win,
        // proving the second resolve did not re-evaluate.
        sheet.set_text_only(0, 0, "=5").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Ok(2.0));

        sheet.invalidate_all();
        assert_eq!(sheet.resolve(0, 0), Ok(5.0));
    }

    #[test]
    fn any_edit_invalidates_every_cell() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_text(0, 0, "=1").expect("in range");
        sheet.set_text(0, 1, "=1/0").expect("in range");
        let _ = sheet.resolve(0, 0);
        let _ = sheet.resolve(0, 1);

        // Editing an unrelated cell resets both cached states.
        sheet.set_text(1, 1, "note").expect("in range");
        assert_eq!(sheet.cell(0, 0).state, CellState::Stale);
        assert_eq!(sheet.cell(0, 1).state, CellState::Stale);
    }

    #[test]
    fn empty_cell_resolves_to_not_a_formula() {
        let mut sheet = Sheet::new(2, 2);
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::NotAFormula));
        assert_eq!(
            sheet.cell(0, 0).state,
            CellState::Error(EvalError::NotAFormula)
        );
    }
}
