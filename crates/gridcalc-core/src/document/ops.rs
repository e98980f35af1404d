use crate::error::Result;
use gridcalc_engine::engine::{EvalError, find_formula, format_number};

use super::Document;

/// Which rendering of the sheet the display layer wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Computed values (or error messages) for formula cells.
    Values,
    /// Raw formula text for formula cells.
    Formulas,
}

impl View {
    pub fn toggle(self) -> View {
        match self {
            View::Values => View::Formulas,
            View::Formulas => View::Values,
        }
    }
}

/// One cell prepared for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayCell {
    pub content: String,
    pub is_error: bool,
}

impl DisplayCell {
    fn plain(content: String) -> DisplayCell {
        DisplayCell {
            content,
            is_error: false,
        }
    }
}

impl Document {
    /// Replace a cell's text, invalidating all cached results.
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.sheet.set_text(row, col, text)?;
        self.modified = true;
        Ok(())
    }

    /// Copy the text of (row, col) into (to_row, to_col).
    pub fn copy_cell(&mut self, row: usize, col: usize, to_row: usize, to_col: usize) -> Result<()> {
        let text = self
            .sheet
            .text(row, col)
            .ok_or(EvalError::OutOfRange)?
            .to_string();
        self.set_cell_text(to_row, to_col, &text)
    }

    /// Render one cell for the given view.
    ///
    /// The formulas view shows formula text (without the `=` prefix, as it
    /// was written); literal cells always show their raw text. The values
    /// view resolves formula cells to a number or an error message.
    pub fn display_cell(&mut self, row: usize, col: usize, view: View) -> DisplayCell {
        let Some(text) = self.sheet.text(row, col).map(str::to_string) else {
            return DisplayCell::plain(String::new());
        };
        match find_formula(&text) {
            None => DisplayCell::plain(text),
            Some(formula) if view == View::Formulas => DisplayCell::plain(formula.to_string()),
            Some(_) => match self.sheet.resolve(row, col) {
                Ok(value) => DisplayCell::plain(format_number(value)),
                Err(error) => DisplayCell {
                    content: error.to_string(),
                    is_error: true,
                },
            },
        }
    }
}
