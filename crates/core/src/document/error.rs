//! Document error types.
//!
//! Covers malformed input, lifecycle violations, and missing references.

use rust_decimal::Decimal;
use stockflow_shared::ErrorKind;
use stockflow_shared::types::{DocumentId, PartnerId, ProductId, WarehouseId};
use thiserror::Error;

use crate::document::types::DocumentStatus;

/// Errors that can occur while building or transitioning a document.
///
/// Line numbers in messages are 1-based, matching persisted line numbers.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ========== Validation Errors ==========
    /// A document must carry at least one line.
    #[error("Document must have at least one line")]
    NoLines,

    /// Document type is blank.
    #[error("Document type is required")]
    MissingDocumentType,

    /// Reference exceeds the stored column width.
    #[error("Reference must not exceed {max} characters")]
    ReferenceTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Line quantity is zero.
    #[error("Line {line}: quantity cannot be zero")]
    ZeroQuantity {
        /// 1-based line number.
        line: usize,
    },

    /// Line quantity is smaller than the stored precision.
    #[error("Line {line}: quantity must be at least 0.001")]
    QuantityBelowMinimum {
        /// 1-based line number.
        line: usize,
    },

    /// Negative quantity on a document type that does not allow it.
    #[error("Line {line}: quantity must be positive for {document_type} documents")]
    NegativeQuantity {
        /// 1-based line number.
        line: usize,
        /// The document type.
        document_type: String,
    },

    /// Unit price is negative.
    #[error("Line {line}: unit price cannot be negative")]
    NegativePrice {
        /// 1-based line number.
        line: usize,
    },

    /// Unit cost is negative.
    #[error("Line {line}: unit cost cannot be negative")]
    NegativeCost {
        /// 1-based line number.
        line: usize,
    },

    /// Discount or tax percentage outside `[0, 100]`.
    #[error("Line {line}: {field} must be between 0 and 100, got {value}")]
    PercentOutOfRange {
        /// 1-based line number.
        line: usize,
        /// `discount_percent` or `tax_percent`.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A numeric input carries more fraction digits than its column stores.
    #[error("Line {line}: {field} allows at most {max} decimal places")]
    TooManyDecimals {
        /// 1-based line number.
        line: usize,
        /// The offending input field.
        field: &'static str,
        /// Maximum fraction digits.
        max: u32,
    },

    /// The document type moves stock but no warehouse was given.
    #[error("Warehouse is required for {domain}/{document_type} documents")]
    WarehouseRequired {
        /// The document domain.
        domain: String,
        /// The document type.
        document_type: String,
    },

    /// A transfer without a destination warehouse.
    #[error("Destination warehouse is required for transfers")]
    DestinationWarehouseRequired,

    /// A transfer whose source and destination are the same warehouse.
    #[error("Transfer source and destination must differ (warehouse {0})")]
    SameWarehouseTransfer(WarehouseId),

    // ========== State Errors ==========
    /// Operation not allowed in the document's current status.
    #[error("Cannot {action} a document in {current} status")]
    InvalidState {
        /// The rejected operation.
        action: &'static str,
        /// The document's current status.
        current: DocumentStatus,
    },

    // ========== Not Found Errors ==========
    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Warehouse not found.
    #[error("Warehouse not found: {id}")]
    WarehouseNotFound {
        /// The missing warehouse.
        id: WarehouseId,
        /// Input field that referenced it.
        field: &'static str,
    },

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Partner not found.
    #[error("Partner not found: {0}")]
    PartnerNotFound(PartnerId),
}

impl DocumentError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState { .. } => ErrorKind::State,
            Self::DocumentNotFound(_)
            | Self::WarehouseNotFound { .. }
            | Self::ProductNotFound(_)
            | Self::PartnerNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::MissingDocumentType => "MISSING_DOCUMENT_TYPE",
            Self::ReferenceTooLong { .. } => "REFERENCE_TOO_LONG",
            Self::ZeroQuantity { .. } => "ZERO_QUANTITY",
            Self::QuantityBelowMinimum { .. } => "QUANTITY_BELOW_MINIMUM",
            Self::NegativeQuantity { .. } => "NEGATIVE_QUANTITY",
            Self::NegativePrice { .. } => "NEGATIVE_PRICE",
            Self::NegativeCost { .. } => "NEGATIVE_COST",
            Self::PercentOutOfRange { .. } => "PERCENT_OUT_OF_RANGE",
            Self::TooManyDecimals { .. } => "TOO_MANY_DECIMALS",
            Self::WarehouseRequired { .. } => "WAREHOUSE_REQUIRED",
            Self::DestinationWarehouseRequired => "DESTINATION_WAREHOUSE_REQUIRED",
            Self::SameWarehouseTransfer(_) => "SAME_WAREHOUSE_TRANSFER",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::WarehouseNotFound { .. } => "WAREHOUSE_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::PartnerNotFound(_) => "PARTNER_NOT_FOUND",
        }
    }

    /// Returns the offending input field, for field-level error detail.
    #[must_use]
    pub fn field(&self) -> Option<String> {
        match self {
            Self::NoLines => Some("lines".to_string()),
            Self::MissingDocumentType => Some("type".to_string()),
            Self::ReferenceTooLong { .. } => Some("reference".to_string()),
            Self::ZeroQuantity { line }
            | Self::QuantityBelowMinimum { line }
            | Self::NegativeQuantity { line, .. } => Some(line_field(*line, "quantity")),
            Self::NegativePrice { line } => Some(line_field(*line, "unit_price")),
            Self::NegativeCost { line } => Some(line_field(*line, "unit_cost")),
            Self::PercentOutOfRange { line, field, .. }
            | Self::TooManyDecimals { line, field, .. } => Some(line_field(*line, field)),
            Self::WarehouseRequired { .. } => Some("warehouse_id".to_string()),
            Self::WarehouseNotFound { field, .. } => Some((*field).to_string()),
            Self::DestinationWarehouseRequired | Self::SameWarehouseTransfer(_) => {
                Some("destination_warehouse_id".to_string())
            }
            Self::PartnerNotFound(_) => Some("partner_id".to_string()),
            Self::InvalidState { .. } | Self::DocumentNotFound(_) | Self::ProductNotFound(_) => {
                None
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::State | ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 422,
            ErrorKind::Consistency | ErrorKind::Internal => 500,
        }
    }
}

fn line_field(line: usize, name: &str) -> String {
    format!("lines[{}].{name}", line.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DocumentError::NoLines.kind(), ErrorKind::Validation);
        assert_eq!(
            DocumentError::InvalidState {
                action: "validate",
                current: DocumentStatus::Validated,
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            DocumentError::DocumentNotFound(DocumentId(1)).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DocumentError::NoLines.http_status_code(), 422);
        assert_eq!(
            DocumentError::InvalidState {
                action: "cancel",
                current: DocumentStatus::Cancelled,
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            DocumentError::ProductNotFound(ProductId(3)).http_status_code(),
            404
        );
    }

    #[test]
    fn test_state_error_carries_current_status() {
        let err = DocumentError::InvalidState {
            action: "validate",
            current: DocumentStatus::Validated,
        };
        assert_eq!(
            err.to_string(),
            "Cannot validate a document in validated status"
        );
    }

    #[test]
    fn test_line_field_detail() {
        assert_eq!(
            DocumentError::NegativePrice { line: 2 }.field().as_deref(),
            Some("lines[1].unit_price")
        );
        assert_eq!(
            DocumentError::PercentOutOfRange {
                line: 1,
                field: "tax_percent",
                value: Decimal::ONE_HUNDRED + Decimal::ONE,
            }
            .field()
            .as_deref(),
            Some("lines[0].tax_percent")
        );
    }

    #[test]
    fn test_missing_warehouse_names_its_field() {
        let destination = DocumentError::WarehouseNotFound {
            id: WarehouseId(8),
            field: "destination_warehouse_id",
        };
        assert_eq!(destination.field().as_deref(), Some("destination_warehouse_id"));
        assert_eq!(destination.error_code(), "WAREHOUSE_NOT_FOUND");
        assert_eq!(destination.to_string(), "Warehouse not found: 8");
    }
}
