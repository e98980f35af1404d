//! Writer for the sheet file format.

use crate::error::Result;
use gridcalc_engine::engine::Sheet;
use std::fs;
use std::path::Path;

/// Write a sheet to a file, overwriting it.
pub fn write_sheet(path: &Path, sheet: &Sheet) -> Result<()> {
    fs::write(path, write_sheet_content(sheet))?;
    Ok(())
}

/// Render a sheet in the file format: one `ROW COL TEXT` line per cell with
/// non-blank text, in row-major order.
pub fn write_sheet_content(sheet: &Sheet) -> String {
    let mut out = String::from("# gridcalc sheet\n");
    for row in 0..sheet.rows() {
        for col in 0..sheet.cols() {
            if let Some(text) = sheet.text(row, col)
                && !text.trim().is_empty()
            {
                out.push_str(&format!("{} {} {}\n", row, col, text));
            }
        }
    }
    out
}
