//! Parser for the sheet file format.

use crate::error::{CoreError, Result};
use gridcalc_engine::engine::Sheet;
use std::fs;
use std::path::Path;

/// Parse a sheet file.
///
/// Returns the sheet plus any per-line parse issues; a bad line is skipped
/// and reported, the rest of the file still loads.
pub fn parse_sheet(path: &Path) -> Result<(Sheet, Vec<CoreError>)> {
    let content = fs::read_to_string(path)?;
    Ok(parse_sheet_content(&content))
}

/// Parse file content into a fresh default-sized sheet.
pub fn parse_sheet_content(content: &str) -> (Sheet, Vec<CoreError>) {
    let mut sheet = Sheet::default();
    let mut issues = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some((row, col, text)) => {
                if sheet.set_text_only(row, col, text).is_err() {
                    issues.push(CoreError::Parse {
                        line: line_num + 1,
                        message: format!("cell ({}, {}) is out of range", row, col),
                    });
                }
            }
            None => issues.push(CoreError::Parse {
                line: line_num + 1,
                message: "expected 'ROW COL TEXT'".to_string(),
            }),
        }
    }

    sheet.invalidate_all();
    (sheet, issues)
}

/// Split a `ROW COL TEXT` line. TEXT is the rest of the line with leading
/// blanks dropped, internal spacing preserved.
fn parse_line(line: &str) -> Option<(usize, usize, &str)> {
    let rest = line.trim_start();
    let (row_str, rest) = rest.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    let (col_str, text) = rest.split_once(char::is_whitespace)?;
    let row = row_str.parse().ok()?;
    let col = col_str.parse().ok()?;
    Some((row, col, text.trim_start()))
}
