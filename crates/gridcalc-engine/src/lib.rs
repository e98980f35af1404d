//! gridcalc_engine - formula language + lazy, cycle-safe recalculation.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn eval(text: &str, row: usize, col: usize) -> Result<f64, EvalError> {
        let mut sheet = Sheet::default();
        evaluate(&mut sheet, text, row, col)
    }

    #[test]
    fn test_plain_arithmetic() {
        assert_eq!(eval("=2+3*4", 0, 0), Ok(14.0));
        assert_eq!(eval("=(2+3)*4", 0, 0), Ok(20.0));
        assert_eq!(eval("=10-2-3", 0, 0), Ok(5.0));
        assert_eq!(eval("=12/4/3", 0, 0), Ok(1.0));
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("=2^3^2", 0, 0), Ok(512.0));
        assert_eq!(eval("=(2^3)^2", 0, 0), Ok(64.0));
    }

    #[test]
    fn test_power_binds_tighter_than_multiplication() {
        assert_eq!(eval("=2*3^2", 0, 0), Ok(18.0));
        assert_eq!(eval("=3^2*2", 0, 0), Ok(18.0));
    }

    #[test]
    fn test_divide_by_zero_is_an_error_not_infinity() {
        assert_eq!(eval("=1/0", 0, 0), Err(EvalError::DivideByZero));
        assert_eq!(eval("=5%0", 0, 0), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_row_and_column_operators() {
        assert_eq!(eval("=r", 5, 2), Ok(5.0));
        assert_eq!(eval("=c", 5, 2), Ok(2.0));
        assert_eq!(eval("=r*10+c", 7, 3), Ok(73.0));
    }

    #[test]
    fn test_negative_base_fractional_exponent_is_nan() {
        // powf semantics, no special validation; the display layer shows
        // the #NAN! sentinel.
        let value = eval("=(0-8)^(1/2)", 0, 0).expect("evaluates");
        assert!(value.is_nan());
        assert_eq!(format_number(value), "#NAN!");
    }

    #[test]
    fn test_reference_reads_another_cell() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=6*7").expect("in range");
        sheet.set_text(1, 0, "=0@0+1").expect("in range");
        assert_eq!(sheet.resolve(1, 0), Ok(43.0));
    }

    #[test]
    fn test_reference_chain() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=2").expect("in range");
        sheet.set_text(1, 0, "=0@0*10").expect("in range");
        sheet.set_text(2, 0, "=1@0*10").expect("in range");
        assert_eq!(sheet.resolve(2, 0), Ok(200.0));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=0@0").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::Cycle));
    }

    #[test]
    fn test_mutual_cycle_leaves_other_cells_alone() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=1@0").expect("in range");
        sheet.set_text(1, 0, "=0@0").expect("in range");
        sheet.set_text(2, 0, "=40+2").expect("in range");

        assert_eq!(sheet.resolve(0, 0), Err(EvalError::Cycle));
        assert_eq!(sheet.resolve(1, 0), Err(EvalError::Cycle));
        assert_eq!(sheet.resolve(2, 0), Ok(42.0));
    }

    #[test]
    fn test_cycle_error_propagates_unchanged() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=0@0").expect("in range");
        // A bystander referencing into the cycle also reports Cycle, not
        // the generic no-value marker.
        sheet.set_text(5, 1, "=0@0").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::Cycle));
        assert_eq!(sheet.resolve(5, 1), Err(EvalError::Cycle));
    }

    #[test]
    fn test_referencing_a_literal_cell_has_no_value() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "plain text").expect("in range");
        sheet.set_text(1, 0, "=0@0").expect("in range");
        assert_eq!(sheet.resolve(1, 0), Err(EvalError::NoValue));
    }

    #[test]
    fn test_remote_error_is_not_copied_through_a_reference() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=1/0").expect("in range");
        sheet.set_text(1, 0, "=0@0").expect("in range");

        // The offending cell keeps its own error; the referencing cell only
        // reports that there was no value to read.
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::DivideByZero));
        assert_eq!(sheet.resolve(1, 0), Err(EvalError::NoValue));
    }

    #[test]
    fn test_out_of_range_reference() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=999@0").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::OutOfRange));

        sheet.set_text(0, 1, "=0@999").expect("in range");
        assert_eq!(sheet.resolve(0, 1), Err(EvalError::OutOfRange));
    }

    #[test]
    fn test_resolve_is_idempotent_between_edits() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=3^2").expect("in range");
        let first = sheet.resolve(0, 0);
        let second = sheet.resolve(0, 0);
        assert_eq!(first, Ok(9.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_edit_recomputes_dependents() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=2").expect("in range");
        sheet.set_text(1, 0, "=0@0*10").expect("in range");
        assert_eq!(sheet.resolve(1, 0), Ok(20.0));

        sheet.set_text(0, 0, "=3").expect("in range");
        assert_eq!(sheet.resolve(1, 0), Ok(30.0));
    }

    #[test]
    fn test_formula_using_own_coordinates() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=4").expect("in range");
        // Row-relative reference: each copy of this formula reads the cell
        // above it in its own column.
        sheet.set_text(1, 0, "=(r-1)@c*2").expect("in range");
        sheet.set_text(2, 0, "=(r-1)@c*2").expect("in range");
        assert_eq!(sheet.resolve(2, 0), Ok(16.0));
    }

    #[test]
    fn test_cycle_does_not_poison_later_recalculation() {
        let mut sheet = Sheet::default();
        sheet.set_text(0, 0, "=1@0").expect("in range");
        sheet.set_text(1, 0, "=0@0").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Err(EvalError::Cycle));

        // Breaking the cycle clears everything on the next resolve.
        sheet.set_text(1, 0, "=5").expect("in range");
        assert_eq!(sheet.resolve(0, 0), Ok(5.0));
        assert_eq!(sheet.resolve(1, 0), Ok(5.0));
    }
}
