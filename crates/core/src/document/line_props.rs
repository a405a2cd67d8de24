//! Property-based tests for line amounts and header totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::document::line::{DocumentTotals, LineCalculator};

/// Quantities with three fraction digits, including negatives.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64)
        .prop_filter("non-zero", |n| *n != 0)
        .prop_map(|n| Decimal::new(n, 3))
}

/// Prices with two fraction digits.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Percentages in [0, 100] with two fraction digits.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// line_total == round(q * p * (1 - d/100) * (1 + t/100), 2)
    #[test]
    fn prop_line_total_matches_closed_form(
        q in arb_quantity(),
        p in arb_price(),
        d in arb_percent(),
        t in arb_percent(),
    ) {
        let amounts = LineCalculator::calculate(q, p, d, t);
        let expected = (q * p * (Decimal::ONE - d / Decimal::ONE_HUNDRED)
            * (Decimal::ONE + t / Decimal::ONE_HUNDRED))
            .round_dp(2);
        prop_assert_eq!(amounts.line_total, expected);
    }

    /// Every amount carries at most two fraction digits.
    #[test]
    fn prop_amounts_are_rounded(
        q in arb_quantity(),
        p in arb_price(),
        d in arb_percent(),
        t in arb_percent(),
    ) {
        let amounts = LineCalculator::calculate(q, p, d, t);
        prop_assert!(amounts.line_total.scale() <= 2);
        prop_assert!(amounts.discount_amount.scale() <= 2);
        prop_assert!(amounts.tax_amount.scale() <= 2);
    }

    /// Header subtotal equals the sum of line totals.
    #[test]
    fn prop_subtotal_is_sum_of_lines(
        lines in prop::collection::vec(
            (arb_quantity(), arb_price(), arb_percent(), arb_percent()),
            1..10,
        ),
    ) {
        let amounts: Vec<_> = lines
            .iter()
            .map(|(q, p, d, t)| LineCalculator::calculate(*q, *p, *d, *t))
            .collect();
        let totals = DocumentTotals::from_lines(&amounts);
        let sum: Decimal = amounts.iter().map(|a| a.line_total).sum();
        prop_assert_eq!(totals.subtotal, sum);
        prop_assert_eq!(totals.total_amount, sum);
    }
}
