//! Ledger entry factory.
//!
//! Turns a validated document line and its resolved movement into signed
//! journal entries. Codes are assigned by the caller at insert time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockflow_shared::types::{DocumentId, DocumentLineId, LedgerEntryId, ProductId, WarehouseId};

use crate::document::line::AMOUNT_SCALE;
use crate::stock::error::StockError;
use crate::stock::movement::{MovementDirection, MovementPlan, MovementType};

/// A persisted document line about to move stock.
#[derive(Debug, Clone)]
pub struct LineMovement<'a> {
    /// Owning document.
    pub document_id: DocumentId,
    /// Code of the owning document, used as entry reference.
    pub document_code: &'a str,
    /// Document date, used as movement date.
    pub document_date: NaiveDate,
    /// Warehouse (transfer source).
    pub warehouse_id: Option<WarehouseId>,
    /// Transfer destination.
    pub destination_warehouse_id: Option<WarehouseId>,
    /// The line.
    pub line_id: DocumentLineId,
    /// Product on the line.
    pub product_id: ProductId,
    /// Signed line quantity.
    pub quantity: Decimal,
    /// Explicit unit cost on the line.
    pub unit_cost: Option<Decimal>,
    /// Line notes.
    pub notes: Option<&'a str>,
}

/// A ledger entry ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    /// Movement kind.
    pub movement_type: MovementType,
    /// Warehouse the stock moves in.
    pub warehouse_id: WarehouseId,
    /// Product moved.
    pub product_id: ProductId,
    /// Originating document.
    pub document_id: Option<DocumentId>,
    /// Originating line.
    pub document_line_id: Option<DocumentLineId>,
    /// Signed quantity; positive is stock in.
    pub quantity: Decimal,
    /// Unit cost.
    pub unit_cost: Decimal,
    /// `|quantity| × unit_cost`.
    pub total_cost: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Reference (the document code).
    pub reference: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// An already-appended entry, as needed to compensate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedEntry {
    /// Entry id.
    pub id: LedgerEntryId,
    /// Entry code.
    pub code: String,
    /// Movement kind.
    pub movement_type: MovementType,
    /// Warehouse.
    pub warehouse_id: WarehouseId,
    /// Product.
    pub product_id: ProductId,
    /// Originating document.
    pub document_id: Option<DocumentId>,
    /// Originating line.
    pub document_line_id: Option<DocumentLineId>,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Unit cost.
    pub unit_cost: Decimal,
    /// Reference.
    pub reference: Option<String>,
}

/// Stateless factory for ledger entries.
pub struct LedgerEntryFactory;

impl LedgerEntryFactory {
    /// Applies the quantity-sign policy of `movement_type` to a line quantity.
    ///
    /// Adjustments and manual movements keep the line's sign verbatim; every
    /// other kind takes the absolute quantity signed by its direction.
    #[must_use]
    pub fn signed_quantity(movement_type: MovementType, line_quantity: Decimal) -> Decimal {
        if movement_type.preserves_line_sign() {
            return line_quantity;
        }
        match movement_type.direction() {
            MovementDirection::Entry => line_quantity.abs(),
            MovementDirection::Exit => -line_quantity.abs(),
        }
    }

    /// Picks the explicit line cost, then the last known cost, then zero.
    #[must_use]
    pub fn resolve_unit_cost(explicit: Option<Decimal>, last_known: Option<Decimal>) -> Decimal {
        explicit.or(last_known).unwrap_or(Decimal::ZERO)
    }

    /// Total cost of a movement, rounded to monetary precision.
    #[must_use]
    pub fn total_cost(quantity: Decimal, unit_cost: Decimal) -> Decimal {
        (quantity.abs() * unit_cost).round_dp(AMOUNT_SCALE)
    }

    /// Builds the entries for one line.
    ///
    /// `last_known_cost` is the unit cost of the latest incoming movement for
    /// the line's (source warehouse, product); it is only used when the line
    /// carries no explicit cost. Transfers yield `[transfer_out, transfer_in]`.
    pub fn create(
        line: &LineMovement<'_>,
        plan: MovementPlan,
        last_known_cost: Option<Decimal>,
    ) -> Result<Vec<NewLedgerEntry>, StockError> {
        let warehouse_id = line
            .warehouse_id
            .ok_or(StockError::MissingWarehouse(line.line_id))?;
        let unit_cost = Self::resolve_unit_cost(line.unit_cost, last_known_cost);

        match plan {
            MovementPlan::Single(movement_type) => Ok(vec![Self::entry(
                line,
                movement_type,
                warehouse_id,
                unit_cost,
            )]),
            MovementPlan::Transfer => {
                let destination = line
                    .destination_warehouse_id
                    .ok_or(StockError::MissingDestination(line.line_id))?;
                if destination == warehouse_id {
                    return Err(StockError::SameWarehouse {
                        line: line.line_id,
                        warehouse: warehouse_id,
                    });
                }
                Ok(vec![
                    Self::entry(line, MovementType::TransferOut, warehouse_id, unit_cost),
                    Self::entry(line, MovementType::TransferIn, destination, unit_cost),
                ])
            }
        }
    }

    /// Builds the compensating entry for `original`.
    ///
    /// The quantity is negated, the cost kept, and the movement type replaced
    /// by its counterpart.
    #[must_use]
    pub fn reversal(original: &PostedEntry, reversal_date: NaiveDate) -> NewLedgerEntry {
        let quantity = -original.quantity;
        NewLedgerEntry {
            movement_type: original.movement_type.counterpart(),
            warehouse_id: original.warehouse_id,
            product_id: original.product_id,
            document_id: original.document_id,
            document_line_id: original.document_line_id,
            quantity,
            unit_cost: original.unit_cost,
            total_cost: Self::total_cost(quantity, original.unit_cost),
            movement_date: reversal_date,
            reference: original.reference.clone(),
            notes: Some(format!("Reversal of {}", original.code)),
        }
    }

    fn entry(
        line: &LineMovement<'_>,
        movement_type: MovementType,
        warehouse_id: WarehouseId,
        unit_cost: Decimal,
    ) -> NewLedgerEntry {
        let quantity = Self::signed_quantity(movement_type, line.quantity);
        NewLedgerEntry {
            movement_type,
            warehouse_id,
            product_id: line.product_id,
            document_id: Some(line.document_id),
            document_line_id: Some(line.line_id),
            quantity,
            unit_cost,
            total_cost: Self::total_cost(quantity, unit_cost),
            movement_date: line.document_date,
            reference: Some(line.document_code.to_string()),
            notes: line.notes.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal) -> LineMovement<'static> {
        LineMovement {
            document_id: DocumentId(1),
            document_code: "SINV-2026-0001",
            document_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            warehouse_id: Some(WarehouseId(10)),
            destination_warehouse_id: None,
            line_id: DocumentLineId(5),
            product_id: ProductId(20),
            quantity,
            unit_cost: None,
            notes: None,
        }
    }

    #[rstest]
    #[case(MovementType::SaleInvoice, dec!(10), dec!(-10))]
    #[case(MovementType::SaleDelivery, dec!(4), dec!(-4))]
    #[case(MovementType::PurchaseReturn, dec!(2), dec!(-2))]
    #[case(MovementType::TransferOut, dec!(3), dec!(-3))]
    #[case(MovementType::PurchaseInvoice, dec!(7), dec!(7))]
    #[case(MovementType::PurchaseReceipt, dec!(-7), dec!(7))]
    #[case(MovementType::SaleReturn, dec!(1), dec!(1))]
    #[case(MovementType::TransferIn, dec!(3), dec!(3))]
    #[case(MovementType::AdjustmentDecrease, dec!(-5), dec!(-5))]
    #[case(MovementType::AdjustmentIncrease, dec!(5), dec!(5))]
    #[case(MovementType::ManualEntry, dec!(-2), dec!(-2))]
    #[case(MovementType::ManualExit, dec!(2), dec!(2))]
    fn test_sign_policy(
        #[case] kind: MovementType,
        #[case] line_quantity: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(LedgerEntryFactory::signed_quantity(kind, line_quantity), expected);
    }

    #[test]
    fn test_unit_cost_resolution_order() {
        assert_eq!(
            LedgerEntryFactory::resolve_unit_cost(Some(dec!(3)), Some(dec!(9))),
            dec!(3)
        );
        assert_eq!(
            LedgerEntryFactory::resolve_unit_cost(None, Some(dec!(9))),
            dec!(9)
        );
        assert_eq!(LedgerEntryFactory::resolve_unit_cost(None, None), Decimal::ZERO);
    }

    #[test]
    fn test_sale_invoice_entry() {
        let entries = LedgerEntryFactory::create(
            &line(dec!(10)),
            MovementPlan::Single(MovementType::SaleInvoice),
            Some(dec!(12.50)),
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.movement_type, MovementType::SaleInvoice);
        assert_eq!(entry.quantity, dec!(-10));
        assert_eq!(entry.unit_cost, dec!(12.50));
        assert_eq!(entry.total_cost, dec!(125.00));
        assert_eq!(entry.warehouse_id, WarehouseId(10));
        assert_eq!(entry.reference.as_deref(), Some("SINV-2026-0001"));
        assert_eq!(entry.movement_date, NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
        assert_eq!(entry.document_line_id, Some(DocumentLineId(5)));
    }

    #[test]
    fn test_transfer_emits_two_entries() {
        let mut transfer = line(dec!(6));
        transfer.destination_warehouse_id = Some(WarehouseId(11));
        transfer.unit_cost = Some(dec!(2));

        let entries =
            LedgerEntryFactory::create(&transfer, MovementPlan::Transfer, None).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].movement_type, MovementType::TransferOut);
        assert_eq!(entries[0].warehouse_id, WarehouseId(10));
        assert_eq!(entries[0].quantity, dec!(-6));
        assert_eq!(entries[1].movement_type, MovementType::TransferIn);
        assert_eq!(entries[1].warehouse_id, WarehouseId(11));
        assert_eq!(entries[1].quantity, dec!(6));
        assert_eq!(entries[0].unit_cost, entries[1].unit_cost);
        assert_eq!(entries[0].document_line_id, entries[1].document_line_id);
    }

    #[test]
    fn test_transfer_requires_destination() {
        let result = LedgerEntryFactory::create(&line(dec!(1)), MovementPlan::Transfer, None);
        assert!(matches!(result, Err(StockError::MissingDestination(_))));
    }

    #[test]
    fn test_missing_warehouse() {
        let mut no_warehouse = line(dec!(1));
        no_warehouse.warehouse_id = None;
        let result = LedgerEntryFactory::create(
            &no_warehouse,
            MovementPlan::Single(MovementType::PurchaseReceipt),
            None,
        );
        assert!(matches!(result, Err(StockError::MissingWarehouse(_))));
    }

    #[test]
    fn test_reversal_negates_and_swaps_kind() {
        let original = PostedEntry {
            id: LedgerEntryId(1),
            code: "JST-2026-0001".to_string(),
            movement_type: MovementType::SaleInvoice,
            warehouse_id: WarehouseId(10),
            product_id: ProductId(20),
            document_id: Some(DocumentId(1)),
            document_line_id: Some(DocumentLineId(5)),
            quantity: dec!(-10),
            unit_cost: dec!(4),
            reference: Some("SINV-2026-0001".to_string()),
        };
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let reversal = LedgerEntryFactory::reversal(&original, date);

        assert_eq!(reversal.movement_type, MovementType::SaleReturn);
        assert_eq!(reversal.quantity, dec!(10));
        assert_eq!(reversal.unit_cost, dec!(4));
        assert_eq!(reversal.total_cost, dec!(40));
        assert_eq!(reversal.movement_date, date);
        assert_eq!(reversal.notes.as_deref(), Some("Reversal of JST-2026-0001"));
    }
}
