//! Stock ledger error types.

use stockflow_shared::ErrorKind;
use stockflow_shared::types::{DocumentLineId, LedgerEntryId, ProductId, WarehouseId};
use thiserror::Error;

/// Errors raised while building ledger entries or projecting balances.
#[derive(Debug, Error)]
pub enum StockError {
    /// A movement was requested for a line without a warehouse.
    #[error("Line {0} has no warehouse to move stock in")]
    MissingWarehouse(DocumentLineId),

    /// A transfer line without a destination warehouse.
    #[error("Transfer line {0} has no destination warehouse")]
    MissingDestination(DocumentLineId),

    /// A transfer whose source and destination coincide.
    #[error("Transfer line {line} moves stock from warehouse {warehouse} to itself")]
    SameWarehouse {
        /// The offending line.
        line: DocumentLineId,
        /// The warehouse used on both sides.
        warehouse: WarehouseId,
    },

    /// The same ledger entry appeared twice in a projection.
    #[error("Ledger entry {0} appears more than once for one balance")]
    DuplicateEntry(LedgerEntryId),

    /// A just-appended entry was not visible to the projection.
    #[error(
        "Ledger entry {entry} missing from balance projection of warehouse {warehouse}, product {product}"
    )]
    EntryNotProjected {
        /// The entry that should have been included.
        entry: LedgerEntryId,
        /// Warehouse of the projected balance.
        warehouse: WarehouseId,
        /// Product of the projected balance.
        product: ProductId,
    },
}

impl StockError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingWarehouse(_)
            | Self::MissingDestination(_)
            | Self::SameWarehouse { .. } => ErrorKind::Validation,
            Self::DuplicateEntry(_) | Self::EntryNotProjected { .. } => ErrorKind::Consistency,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingWarehouse(_) => "WAREHOUSE_REQUIRED",
            Self::MissingDestination(_) => "DESTINATION_WAREHOUSE_REQUIRED",
            Self::SameWarehouse { .. } => "SAME_WAREHOUSE_TRANSFER",
            Self::DuplicateEntry(_) | Self::EntryNotProjected { .. } => "LEDGER_INCONSISTENT",
        }
    }
}
