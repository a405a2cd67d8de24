//! Property-based tests for the ledger entry factory.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockflow_shared::types::{DocumentId, DocumentLineId, LedgerEntryId, ProductId, WarehouseId};

use crate::stock::entry::{LedgerEntryFactory, PostedEntry};
use crate::stock::movement::{MovementDirection, MovementType};

fn arb_movement() -> impl Strategy<Value = MovementType> {
    prop::sample::select(MovementType::ALL.to_vec())
}

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64)
        .prop_filter("non-zero", |n| *n != 0)
        .prop_map(|n| Decimal::new(n, 3))
}

fn arb_cost() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Non-preserving kinds are signed by direction; preserving kinds keep input.
    #[test]
    fn prop_sign_policy(kind in arb_movement(), q in arb_quantity()) {
        let signed = LedgerEntryFactory::signed_quantity(kind, q);
        prop_assert_eq!(signed.abs(), q.abs());
        if kind.preserves_line_sign() {
            prop_assert_eq!(signed, q);
        } else {
            match kind.direction() {
                MovementDirection::Entry => {
                    prop_assert!(signed > Decimal::ZERO);
                }
                MovementDirection::Exit => {
                    prop_assert!(signed < Decimal::ZERO);
                }
            }
        }
    }

    /// total_cost is never negative.
    #[test]
    fn prop_total_cost_non_negative(q in arb_quantity(), cost in arb_cost()) {
        prop_assert!(LedgerEntryFactory::total_cost(q, cost) >= Decimal::ZERO);
    }

    /// An entry and its reversal cancel out on the same pair.
    #[test]
    fn prop_reversal_nets_to_zero(kind in arb_movement(), q in arb_quantity(), cost in arb_cost()) {
        let original = PostedEntry {
            id: LedgerEntryId(1),
            code: "JST-2026-0001".to_string(),
            movement_type: kind,
            warehouse_id: WarehouseId(1),
            product_id: ProductId(1),
            document_id: Some(DocumentId(1)),
            document_line_id: Some(DocumentLineId(1)),
            quantity: LedgerEntryFactory::signed_quantity(kind, q),
            unit_cost: cost,
            reference: None,
        };
        let reversal = LedgerEntryFactory::reversal(
            &original,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        );
        prop_assert_eq!(original.quantity + reversal.quantity, Decimal::ZERO);
        prop_assert_eq!(reversal.warehouse_id, original.warehouse_id);
        prop_assert_eq!(reversal.movement_type, kind.counterpart());
    }
}
