//! Movement types and their resolution from document kinds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::types::DocumentDomain;

/// Document type that moves stock between two warehouses.
pub const TRANSFER_TYPE: &str = "transfer";

/// Canonical kind of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods leave with a sale invoice.
    SaleInvoice,
    /// Goods leave with a delivery note.
    SaleDelivery,
    /// Customer returns goods.
    SaleReturn,
    /// Goods arrive with a purchase invoice.
    PurchaseInvoice,
    /// Goods arrive with a purchase receipt.
    PurchaseReceipt,
    /// Goods go back to a supplier.
    PurchaseReturn,
    /// Receiving side of a transfer.
    TransferIn,
    /// Sending side of a transfer.
    TransferOut,
    /// Positive inventory adjustment.
    AdjustmentIncrease,
    /// Negative inventory adjustment.
    AdjustmentDecrease,
    /// Manual stock entry.
    ManualEntry,
    /// Manual stock exit.
    ManualExit,
}

/// Whether a movement brings stock in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Stock in (positive quantity).
    Entry,
    /// Stock out (negative quantity).
    Exit,
}

impl MovementType {
    /// All movement types.
    pub const ALL: [Self; 12] = [
        Self::SaleInvoice,
        Self::SaleDelivery,
        Self::SaleReturn,
        Self::PurchaseInvoice,
        Self::PurchaseReceipt,
        Self::PurchaseReturn,
        Self::TransferIn,
        Self::TransferOut,
        Self::AdjustmentIncrease,
        Self::AdjustmentDecrease,
        Self::ManualEntry,
        Self::ManualExit,
    ];

    /// Returns the string representation of the movement type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaleInvoice => "sale_invoice",
            Self::SaleDelivery => "sale_delivery",
            Self::SaleReturn => "sale_return",
            Self::PurchaseInvoice => "purchase_invoice",
            Self::PurchaseReceipt => "purchase_receipt",
            Self::PurchaseReturn => "purchase_return",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::AdjustmentIncrease => "adjustment_increase",
            Self::AdjustmentDecrease => "adjustment_decrease",
            Self::ManualEntry => "manual_entry",
            Self::ManualExit => "manual_exit",
        }
    }

    /// Parses a movement type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Returns the nominal direction of this movement.
    #[must_use]
    pub fn direction(&self) -> MovementDirection {
        match self {
            Self::PurchaseInvoice
            | Self::PurchaseReceipt
            | Self::TransferIn
            | Self::SaleReturn
            | Self::AdjustmentIncrease
            | Self::ManualEntry => MovementDirection::Entry,
            Self::SaleInvoice
            | Self::SaleDelivery
            | Self::PurchaseReturn
            | Self::TransferOut
            | Self::AdjustmentDecrease
            | Self::ManualExit => MovementDirection::Exit,
        }
    }

    /// Returns true if the line's signed quantity is recorded verbatim.
    ///
    /// All other types take the absolute quantity and apply their direction.
    #[must_use]
    pub fn preserves_line_sign(&self) -> bool {
        matches!(
            self,
            Self::AdjustmentIncrease | Self::AdjustmentDecrease | Self::ManualEntry | Self::ManualExit
        )
    }

    /// Returns the movement type that compensates this one on cancellation.
    #[must_use]
    pub fn counterpart(&self) -> Self {
        match self {
            Self::SaleInvoice | Self::SaleDelivery => Self::SaleReturn,
            Self::SaleReturn => Self::SaleDelivery,
            Self::PurchaseInvoice | Self::PurchaseReceipt => Self::PurchaseReturn,
            Self::PurchaseReturn => Self::PurchaseReceipt,
            Self::TransferOut => Self::TransferIn,
            Self::TransferIn => Self::TransferOut,
            Self::AdjustmentIncrease => Self::AdjustmentDecrease,
            Self::AdjustmentDecrease => Self::AdjustmentIncrease,
            Self::ManualEntry => Self::ManualExit,
            Self::ManualExit => Self::ManualEntry,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a document line turns into on validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPlan {
    /// One entry of the given type.
    Single(MovementType),
    /// A `transfer_out` from the source and a `transfer_in` to the destination.
    Transfer,
}

/// Maps document kinds to movement types.
pub struct MovementResolver;

impl MovementResolver {
    /// Resolves the movement for one line.
    ///
    /// Returns `None` for document kinds that do not move stock.
    #[must_use]
    pub fn resolve(
        domain: DocumentDomain,
        document_type: &str,
        line_quantity: Decimal,
    ) -> Option<MovementPlan> {
        let kind = match (domain, document_type) {
            (DocumentDomain::Sale, "invoice") => MovementType::SaleInvoice,
            (DocumentDomain::Sale, "delivery_note") => MovementType::SaleDelivery,
            (DocumentDomain::Sale, "return") => MovementType::SaleReturn,
            (DocumentDomain::Purchase, "invoice") => MovementType::PurchaseInvoice,
            (DocumentDomain::Purchase, "receipt") => MovementType::PurchaseReceipt,
            (DocumentDomain::Purchase, "return") => MovementType::PurchaseReturn,
            (DocumentDomain::Stock, "manual_entry") => MovementType::ManualEntry,
            (DocumentDomain::Stock, "manual_exit") => MovementType::ManualExit,
            (DocumentDomain::Stock, "adjustment") if line_quantity >= Decimal::ZERO => {
                MovementType::AdjustmentIncrease
            }
            (DocumentDomain::Stock, "adjustment") => MovementType::AdjustmentDecrease,
            (DocumentDomain::Stock, TRANSFER_TYPE) => return Some(MovementPlan::Transfer),
            _ => return None,
        };
        Some(MovementPlan::Single(kind))
    }

    /// Returns true if documents of this kind emit ledger entries.
    #[must_use]
    pub fn moves_stock(domain: DocumentDomain, document_type: &str) -> bool {
        Self::resolve(domain, document_type, Decimal::ONE).is_some()
    }

    /// Returns true if documents of this kind are warehouse transfers.
    #[must_use]
    pub fn is_transfer(domain: DocumentDomain, document_type: &str) -> bool {
        domain == DocumentDomain::Stock && document_type == TRANSFER_TYPE
    }

    /// Returns true if lines of this kind may carry a negative quantity.
    #[must_use]
    pub fn allows_signed_quantity(domain: DocumentDomain, document_type: &str) -> bool {
        domain == DocumentDomain::Stock
            && matches!(document_type, "adjustment" | "manual_entry" | "manual_exit")
    }
}
