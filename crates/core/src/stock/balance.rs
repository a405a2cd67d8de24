//! Stock balance projection.
//!
//! A balance is a cache over the ledger. It is always recomputed from the
//! full set of entries for its (warehouse, product) pair, never patched
//! with a delta, so repeated or reordered projections converge.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stockflow_shared::types::{LedgerEntryId, ProductId, WarehouseId};

use crate::stock::error::StockError;

/// The slice of a ledger entry the projector needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySnapshot {
    /// Entry id; higher ids were inserted later.
    pub id: LedgerEntryId,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
}

/// Result of projecting one (warehouse, product) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceProjection {
    /// Sum of signed quantities.
    pub quantity: Decimal,
    /// Chronologically latest entry.
    pub last_entry_id: Option<LedgerEntryId>,
    /// Movement date of the latest entry.
    pub last_movement_date: Option<NaiveDate>,
    /// Number of entries summed.
    pub entry_count: usize,
}

/// Stateless balance projector.
pub struct BalanceProjector;

impl BalanceProjector {
    /// Recomputes a balance from every entry of one pair.
    ///
    /// The latest entry is the one with the greatest movement date, ties
    /// broken by the highest id. Every id in `appended` must be present in
    /// `entries`; a missing or duplicated entry is a consistency failure.
    pub fn project(
        warehouse_id: WarehouseId,
        product_id: ProductId,
        entries: &[EntrySnapshot],
        appended: &[LedgerEntryId],
    ) -> Result<BalanceProjection, StockError> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut quantity = Decimal::ZERO;
        let mut latest: Option<&EntrySnapshot> = None;

        for entry in entries {
            if !seen.insert(entry.id) {
                return Err(StockError::DuplicateEntry(entry.id));
            }
            quantity += entry.quantity;
            let is_later = latest.is_none_or(|current| {
                (entry.movement_date, entry.id) > (current.movement_date, current.id)
            });
            if is_later {
                latest = Some(entry);
            }
        }

        if let Some(missing) = appended.iter().find(|id| !seen.contains(*id)) {
            return Err(StockError::EntryNotProjected {
                entry: *missing,
                warehouse: warehouse_id,
                product: product_id,
            });
        }

        Ok(BalanceProjection {
            quantity,
            last_entry_id: latest.map(|entry| entry.id),
            last_movement_date: latest.map(|entry| entry.movement_date),
            entry_count: entries.len(),
        })
    }
}

/// On-hand and reserved quantity of one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Quantity on hand.
    pub quantity: Decimal,
    /// Quantity reserved for pending orders.
    pub reserved_quantity: Decimal,
}

impl StockLevel {
    /// Quantity that can still be committed; derived, never stored.
    #[must_use]
    pub fn available_quantity(&self) -> Decimal {
        self.quantity - self.reserved_quantity
    }

    /// Returns true if `required` can be served from available stock.
    #[must_use]
    pub fn can_fulfil(&self, required: Decimal) -> bool {
        self.available_quantity() >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    fn snap(id: i32, quantity: Decimal, day: u32) -> EntrySnapshot {
        EntrySnapshot {
            id: LedgerEntryId(id),
            quantity,
            movement_date: date(day),
        }
    }

    #[test]
    fn test_empty_projection() {
        let p = BalanceProjector::project(WarehouseId(1), ProductId(1), &[], &[]).unwrap();
        assert_eq!(p.quantity, Decimal::ZERO);
        assert_eq!(p.last_entry_id, None);
        assert_eq!(p.entry_count, 0);
    }

    #[test]
    fn test_sum_and_latest_by_date_then_id() {
        let entries = [
            snap(1, dec!(100), 1),
            snap(4, dec!(-10), 3),
            snap(2, dec!(-5), 5),
            snap(3, dec!(2), 5),
        ];
        let p = BalanceProjector::project(WarehouseId(1), ProductId(1), &entries, &[LedgerEntryId(4)])
            .unwrap();
        assert_eq!(p.quantity, dec!(87));
        assert_eq!(p.last_entry_id, Some(LedgerEntryId(3)));
        assert_eq!(p.last_movement_date, Some(date(5)));
        assert_eq!(p.entry_count, 4);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let entries = [snap(1, dec!(3), 1), snap(2, dec!(4), 2)];
        let first = BalanceProjector::project(WarehouseId(1), ProductId(2), &entries, &[]).unwrap();
        let second = BalanceProjector::project(WarehouseId(1), ProductId(2), &entries, &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_entry_is_inconsistent() {
        let entries = [snap(1, dec!(3), 1), snap(1, dec!(3), 1)];
        let result = BalanceProjector::project(WarehouseId(1), ProductId(1), &entries, &[]);
        assert!(matches!(result, Err(StockError::DuplicateEntry(LedgerEntryId(1)))));
    }

    #[test]
    fn test_unseen_appended_entry_is_inconsistent() {
        let entries = [snap(1, dec!(3), 1)];
        let result =
            BalanceProjector::project(WarehouseId(1), ProductId(1), &entries, &[LedgerEntryId(9)]);
        assert!(matches!(result, Err(StockError::EntryNotProjected { .. })));
    }

    #[test]
    fn test_available_quantity() {
        let level = StockLevel {
            quantity: dec!(10),
            reserved_quantity: dec!(4),
        };
        assert_eq!(level.available_quantity(), dec!(6));
        assert!(level.can_fulfil(dec!(6)));
        assert!(!level.can_fulfil(dec!(6.001)));
        assert!(level.can_fulfil(Decimal::ZERO));
        assert!(level.can_fulfil(dec!(-1)));
    }
}
