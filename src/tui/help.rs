//! Help modal content.

use super::keymap::Keymap;

/// Lines for the help modal: keys, commands, and a formula language
/// summary. Section headers are unindented; entries start with two spaces.
pub fn help_lines(keymap: &Keymap) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Keys".to_string());
    match keymap {
        Keymap::Default => {
            lines.push("  arrows        move the cursor".to_string());
            lines.push("  Ctrl+arrows   copy this cell onto a neighbor".to_string());
            lines.push("  Space/Enter   edit the current cell".to_string());
            lines.push("  f             toggle values/formulas view".to_string());
            lines.push("  w             save".to_string());
            lines.push("  :             command prompt".to_string());
            lines.push("  ?             this help".to_string());
            lines.push("  q             quit".to_string());
        }
        Keymap::Custom(custom) => {
            if let Some(description) = &custom.description {
                lines.push(format!("  {}", description));
            }
            for binding in &custom.bindings.normal {
                lines.push(format!(
                    "  {:<13} {:?}",
                    binding.combo.display(),
                    binding.action
                ));
            }
        }
    }

    lines.push(String::new());
    lines.push("Commands".to_string());
    lines.push("  :w [FILE]     save (optionally to FILE)".to_string());
    lines.push("  :wq           save and quit".to_string());
    lines.push("  :q  :q!       quit / quit discarding changes".to_string());
    lines.push("  :goto R C     jump to a cell".to_string());

    lines.push(String::new());
    lines.push("Formulas".to_string());
    lines.push("  Cell text starting with = is a formula; anything else is a literal.".to_string());
    lines.push("  Operators: + - * / % ^ with the usual precedence, ^ binds rightward.".to_string());
    lines.push("  r and c are the current cell's row and column.".to_string());
    lines.push("  ROW@COL reads another cell's value, e.g. =0@1*2 or =(r-1)@c.".to_string());
    lines.push("  # starts a comment that runs to the end of the formula.".to_string());

    lines
}
