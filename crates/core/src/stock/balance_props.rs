//! Property-based tests for balance projection.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockflow_shared::types::{LedgerEntryId, ProductId, WarehouseId};

use crate::stock::balance::{BalanceProjector, EntrySnapshot, StockLevel};

/// Strategy for a ledger with unique ids and mixed-sign quantities.
fn arb_entries() -> impl Strategy<Value = Vec<EntrySnapshot>> {
    prop::collection::vec((-100_000i64..100_000i64, 0u32..60), 0..40).prop_map(|rows| {
        rows.into_iter()
            .zip(1..)
            .map(|((quantity, offset), id)| EntrySnapshot {
                id: LedgerEntryId(id),
                quantity: Decimal::new(quantity, 3),
                movement_date: NaiveDate::from_ymd_opt(2026, 1, 1)
                    .unwrap_or_default()
                    .checked_add_days(chrono::Days::new(u64::from(offset)))
                    .unwrap_or_default(),
            })
            .collect()
    })
}

fn project(entries: &[EntrySnapshot]) -> crate::stock::balance::BalanceProjection {
    BalanceProjector::project(WarehouseId(1), ProductId(1), entries, &[]).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The balance equals the sum of signed entry quantities.
    #[test]
    fn prop_quantity_is_ledger_sum(entries in arb_entries()) {
        let expected: Decimal = entries.iter().map(|e| e.quantity).sum();
        prop_assert_eq!(project(&entries).quantity, expected);
    }

    /// Projection does not depend on the order entries are read in.
    #[test]
    fn prop_order_independent(entries in arb_entries()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(project(&entries), project(&reversed));
    }

    /// Projecting twice with no new entries changes nothing.
    #[test]
    fn prop_idempotent(entries in arb_entries()) {
        prop_assert_eq!(project(&entries), project(&entries));
    }

    /// The latest entry has the maximal (date, id) key.
    #[test]
    fn prop_latest_is_maximal(entries in arb_entries()) {
        let expected = entries.iter().map(|e| (e.movement_date, e.id)).max();
        let p = project(&entries);
        prop_assert_eq!(p.last_movement_date.zip(p.last_entry_id), expected);
    }

    /// available == quantity - reserved for every level.
    #[test]
    fn prop_available_round_trip(q in -1_000_000i64..1_000_000, r in 0i64..1_000_000) {
        let level = StockLevel {
            quantity: Decimal::new(q, 3),
            reserved_quantity: Decimal::new(r, 3),
        };
        prop_assert_eq!(
            level.available_quantity(),
            level.quantity - level.reserved_quantity
        );
    }

    /// Availability is a plain comparison for any required quantity, zero and negatives included.
    #[test]
    fn prop_can_fulfil_compares_available(
        q in -1_000_000i64..1_000_000,
        r in 0i64..1_000_000,
        required in -1_000_000i64..1_000_000,
    ) {
        let level = StockLevel {
            quantity: Decimal::new(q, 3),
            reserved_quantity: Decimal::new(r, 3),
        };
        let required = Decimal::new(required, 3);
        prop_assert_eq!(level.can_fulfil(required), level.available_quantity() >= required);
    }
}
