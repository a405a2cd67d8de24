//! Line amount calculation.
//!
//! Discount, tax, and line totals are always derived here, never taken
//! from caller input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fraction digits kept for monetary amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Fraction digits kept for quantities.
pub const QUANTITY_SCALE: u32 = 3;

/// Computed monetary amounts of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// Discount amount.
    pub discount_amount: Decimal,
    /// Tax amount, applied after discount.
    pub tax_amount: Decimal,
    /// Line total including tax.
    pub line_total: Decimal,
}

/// Stateless calculator for line amounts.
pub struct LineCalculator;

impl LineCalculator {
    /// Computes discount, tax, and total for a line.
    ///
    /// `line_total = q × p × (1 − d/100) × (1 + t/100)`. Each amount is
    /// rounded to two fraction digits (banker's rounding) from its unrounded
    /// value. Negative quantities carry their sign through every amount.
    #[must_use]
    pub fn calculate(
        quantity: Decimal,
        unit_price: Decimal,
        discount_percent: Decimal,
        tax_percent: Decimal,
    ) -> LineAmounts {
        let subtotal = quantity * unit_price;
        let discount_amount = subtotal * discount_percent / Decimal::ONE_HUNDRED;
        let after_discount = subtotal - discount_amount;
        let tax_amount = after_discount * tax_percent / Decimal::ONE_HUNDRED;
        let line_total = after_discount + tax_amount;

        LineAmounts {
            discount_amount: discount_amount.round_dp(AMOUNT_SCALE),
            tax_amount: tax_amount.round_dp(AMOUNT_SCALE),
            line_total: line_total.round_dp(AMOUNT_SCALE),
        }
    }
}

/// Header totals aggregated from line amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Sum of line discounts.
    pub discount_amount: Decimal,
    /// Sum of line taxes.
    pub tax_amount: Decimal,
    /// Total amount; equals `subtotal` since line totals already include tax.
    pub total_amount: Decimal,
}

impl DocumentTotals {
    /// Sums the given line amounts.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a LineAmounts>) -> Self {
        let mut totals = Self::default();
        for line in lines {
            totals.subtotal += line.line_total;
            totals.discount_amount += line.discount_amount;
            totals.tax_amount += line.tax_amount;
        }
        totals.total_amount = totals.subtotal;
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_line_with_discount_and_tax() {
        let amounts = LineCalculator::calculate(dec!(10), dec!(100), dec!(10), dec!(20));
        assert_eq!(amounts.discount_amount, dec!(100.00));
        assert_eq!(amounts.tax_amount, dec!(180.00));
        assert_eq!(amounts.line_total, dec!(1080.00));
    }

    #[rstest]
    #[case(dec!(1), dec!(9.99), dec!(0), dec!(0), dec!(9.99))]
    #[case(dec!(2.5), dec!(4), dec!(0), dec!(0), dec!(10.00))]
    #[case(dec!(3), dec!(10), dec!(100), dec!(20), dec!(0.00))]
    #[case(dec!(1), dec!(0.125), dec!(0), dec!(0), dec!(0.12))]
    #[case(dec!(1), dec!(0.135), dec!(0), dec!(0), dec!(0.14))]
    fn test_line_totals(
        #[case] quantity: Decimal,
        #[case] price: Decimal,
        #[case] discount: Decimal,
        #[case] tax: Decimal,
        #[case] expected: Decimal,
    ) {
        let amounts = LineCalculator::calculate(quantity, price, discount, tax);
        assert_eq!(amounts.line_total, expected);
    }

    #[test]
    fn test_negative_quantity_propagates_sign() {
        let amounts = LineCalculator::calculate(dec!(-5), dec!(20), dec!(10), dec!(10));
        assert_eq!(amounts.discount_amount, dec!(-10.00));
        assert_eq!(amounts.tax_amount, dec!(-9.00));
        assert_eq!(amounts.line_total, dec!(-99.00));
    }

    #[test]
    fn test_totals_sum_lines() {
        let lines = [
            LineCalculator::calculate(dec!(10), dec!(100), dec!(10), dec!(20)),
            LineCalculator::calculate(dec!(2), dec!(50), dec!(0), dec!(0)),
        ];
        let totals = DocumentTotals::from_lines(&lines);
        assert_eq!(totals.subtotal, dec!(1180.00));
        assert_eq!(totals.discount_amount, dec!(100.00));
        assert_eq!(totals.tax_amount, dec!(180.00));
        assert_eq!(totals.total_amount, totals.subtotal);
    }

    #[test]
    fn test_totals_of_no_lines_are_zero() {
        let totals = DocumentTotals::from_lines(&Vec::<LineAmounts>::new());
        assert_eq!(totals, DocumentTotals::default());
    }
}
