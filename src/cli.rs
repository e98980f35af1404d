//! Non-interactive evaluation (`-c`/`--eval`).

use gridcalc_engine::engine::{Sheet, evaluate, format_number};

/// Evaluate one formula against an empty sheet at (0, 0) and print the
/// outcome. A bare expression gets the `=` prefix prepended so
/// `gridcalc -c '2+2'` works as expected.
///
/// Returns the process exit code: 0 on success, 1 on any evaluation error.
pub fn eval_once(expr: &str) -> i32 {
    let mut sheet = Sheet::default();
    let text = if expr.trim_start().starts_with('=') {
        expr.to_string()
    } else {
        format!("={}", expr)
    };
    match evaluate(&mut sheet, &text, 0, 0) {
        Ok(value) => {
            println!("{}", format_number(value));
            0
        }
        Err(error) => {
            println!("#ERR: {}", error);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::eval_once;

    #[test]
    fn successful_evaluation_exits_zero() {
        assert_eq!(eval_once("2+2"), 0);
        assert_eq!(eval_once("=2+2"), 0);
    }

    #[test]
    fn failed_evaluation_exits_one() {
        assert_eq!(eval_once("1/0"), 1);
        assert_eq!(eval_once("1+"), 1);
    }
}
