//! Document domain types.
//!
//! A document is one commercial or stock transaction: a header carrying
//! the parties and dates, plus an ordered set of product lines.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use stockflow_shared::types::{DocumentId, PartnerId, ProductId, UserId, WarehouseId};

/// Business area a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentDomain {
    /// Customer-facing documents (invoices, delivery notes, returns).
    Sale,
    /// Supplier-facing documents (invoices, receipts, returns).
    Purchase,
    /// Internal stock operations (adjustments, transfers, manual movements).
    Stock,
}

impl DocumentDomain {
    /// Returns the string representation of the domain.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Stock => "stock",
        }
    }

    /// Parses a domain from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            "stock" => Some(Self::Stock),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document status in its lifecycle.
///
/// The transitions driven by this crate are:
/// - Draft → Validated (validate)
/// - any non-cancelled status → Cancelled (cancel)
///
/// `Completed` and `Archived` are set by collaborators outside the ledger engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being drafted; lines may be replaced.
    Draft,
    /// Stock movements have been emitted (immutable).
    Validated,
    /// Cancelled (terminal).
    Cancelled,
    /// Fulfilled by a downstream process.
    Completed,
    /// Archived by a downstream process.
    Archived,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Validated => "validated",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "validated" => Some(Self::Validated),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Returns true if lines and header fields may still change.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the document may already have emitted ledger entries.
    #[must_use]
    pub fn has_stock_impact(&self) -> bool {
        matches!(self, Self::Validated | Self::Completed | Self::Archived)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed pointer to an entity a document relates to.
///
/// Serialized as `{"kind": "partner", "id": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RelatedEntity {
    /// Another document (e.g. the invoice a return refers to).
    Document(DocumentId),
    /// A business partner.
    Partner(PartnerId),
    /// A warehouse.
    Warehouse(WarehouseId),
    /// A product.
    Product(ProductId),
}

impl RelatedEntity {
    /// Returns the discriminator stored alongside the id.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Partner(_) => "partner",
            Self::Warehouse(_) => "warehouse",
            Self::Product(_) => "product",
        }
    }

    /// Returns the raw id of the referenced entity.
    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::Document(id) => id.0,
            Self::Partner(id) => id.0,
            Self::Warehouse(id) => id.0,
            Self::Product(id) => id.0,
        }
    }

    /// Rebuilds the reference from its stored `(kind, id)` columns.
    pub fn from_parts(kind: &str, id: i32) -> Option<Self> {
        match kind {
            "document" => Some(Self::Document(DocumentId(id))),
            "partner" => Some(Self::Partner(PartnerId(id))),
            "warehouse" => Some(Self::Warehouse(WarehouseId(id))),
            "product" => Some(Self::Product(ProductId(id))),
            _ => None,
        }
    }
}

/// Header fields of a document, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// Business domain.
    pub domain: DocumentDomain,
    /// Free-form type scoped by domain (`invoice`, `adjustment`, ...).
    pub document_type: String,
    /// Warehouse the stock moves in or out of (the source for transfers).
    pub warehouse_id: Option<WarehouseId>,
    /// Receiving warehouse of a `stock/transfer` document.
    pub destination_warehouse_id: Option<WarehouseId>,
    /// Customer or supplier.
    pub partner_id: Option<PartnerId>,
    /// Optional related entity.
    pub related_entity: Option<RelatedEntity>,
    /// Document date; also the movement date of emitted ledger entries.
    pub document_date: NaiveDate,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// External reference.
    pub reference: Option<String>,
}

/// One product line as supplied by the caller.
///
/// Discount, tax and line totals are never accepted from input;
/// they are computed by [`crate::document::LineCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLineInput {
    /// Product on this line.
    pub product_id: ProductId,
    /// Quantity; negative only for signed stock operations.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Explicit unit cost; when absent the last known cost is used.
    pub unit_cost: Option<Decimal>,
    /// Discount percentage in `[0, 100]`.
    pub discount_percent: Option<Decimal>,
    /// Tax percentage in `[0, 100]`.
    pub tax_percent: Option<Decimal>,
    /// Line description.
    pub description: Option<String>,
    /// Line notes.
    pub notes: Option<String>,
}

/// Input for creating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocumentInput {
    /// Header fields.
    pub header: DocumentHeader,
    /// Ordered, non-empty line set.
    pub lines: Vec<DocumentLineInput>,
}

/// Input for updating a draft document.
///
/// Header fields left as `None` keep their current value. Lines are
/// always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPatch {
    /// New warehouse.
    pub warehouse_id: Option<WarehouseId>,
    /// New transfer destination.
    pub destination_warehouse_id: Option<WarehouseId>,
    /// New partner.
    pub partner_id: Option<PartnerId>,
    /// New related entity.
    pub related_entity: Option<RelatedEntity>,
    /// New document date.
    pub document_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
    /// New reference.
    pub reference: Option<String>,
    /// Replacement line set.
    pub lines: Vec<DocumentLineInput>,
}

impl DocumentPatch {
    /// Merges the supplied header fields over `current`.
    #[must_use]
    pub fn apply_to(&self, current: &DocumentHeader) -> DocumentHeader {
        DocumentHeader {
            domain: current.domain,
            document_type: current.document_type.clone(),
            warehouse_id: self.warehouse_id.or(current.warehouse_id),
            destination_warehouse_id: self
                .destination_warehouse_id
                .or(current.destination_warehouse_id),
            partner_id: self.partner_id.or(current.partner_id),
            related_entity: self.related_entity.or(current.related_entity),
            document_date: self.document_date.unwrap_or(current.document_date),
            due_date: self.due_date.or(current.due_date),
            notes: self.notes.clone().or_else(|| current.notes.clone()),
            reference: self.reference.clone().or_else(|| current.reference.clone()),
        }
    }
}

/// Lifecycle transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Draft → Validated; ledger entries must be emitted.
    Validate {
        /// The new status (Validated).
        new_status: DocumentStatus,
        /// The user validating the document.
        validated_by: UserId,
        /// When the document was validated.
        validated_at: DateTime<Utc>,
    },
    /// Any non-cancelled status → Cancelled.
    Cancel {
        /// The status the document had before cancellation.
        previous_status: DocumentStatus,
        /// The new status (Cancelled).
        new_status: DocumentStatus,
        /// The user cancelling the document.
        cancelled_by: UserId,
        /// When the document was cancelled.
        cancelled_at: DateTime<Utc>,
        /// Whether compensating ledger entries must be appended.
        reverse_stock: bool,
    },
}

impl LifecycleAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> DocumentStatus {
        match self {
            Self::Validate { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> DocumentHeader {
        DocumentHeader {
            domain: DocumentDomain::Stock,
            document_type: "transfer".to_string(),
            warehouse_id: Some(WarehouseId(1)),
            destination_warehouse_id: Some(WarehouseId(2)),
            partner_id: None,
            related_entity: None,
            document_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            due_date: None,
            notes: Some("initial".to_string()),
            reference: Some("REF-1".to_string()),
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(DocumentStatus::parse("VALIDATED"), Some(DocumentStatus::Validated));
        assert_eq!(DocumentStatus::parse("posted"), None);
        assert_eq!(DocumentDomain::parse("purchase"), Some(DocumentDomain::Purchase));
    }

    #[test]
    fn test_related_entity_json_shape() {
        let entity = RelatedEntity::Partner(PartnerId(7));
        let json = serde_json::to_value(entity).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "partner", "id": 7}));
        let back: RelatedEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_related_entity_from_parts() {
        let entity = RelatedEntity::from_parts("document", 12).unwrap();
        assert_eq!(entity, RelatedEntity::Document(DocumentId(12)));
        assert_eq!(entity.kind(), "document");
        assert_eq!(entity.id(), 12);
        assert!(RelatedEntity::from_parts("invoice", 1).is_none());
    }

    #[test]
    fn test_patch_keeps_unsupplied_fields() {
        let patch = DocumentPatch {
            destination_warehouse_id: Some(WarehouseId(3)),
            notes: Some("changed".to_string()),
            ..DocumentPatch::default()
        };
        let merged = patch.apply_to(&header());
        assert_eq!(merged.warehouse_id, Some(WarehouseId(1)));
        assert_eq!(merged.destination_warehouse_id, Some(WarehouseId(3)));
        assert_eq!(merged.notes.as_deref(), Some("changed"));
        assert_eq!(merged.reference.as_deref(), Some("REF-1"));
        assert_eq!(merged.document_type, "transfer");
    }
}
