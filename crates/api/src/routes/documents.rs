//! Document routes: drafting, lifecycle transitions and listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockflow_core::document::{
    CreateDocumentInput, DocumentDomain, DocumentHeader, DocumentLineInput, DocumentPatch,
    DocumentStatus, RelatedEntity,
};
use stockflow_db::{
    DocumentFilter, DocumentWithLines,
    entities::{document_headers, document_lines},
};
use stockflow_shared::types::{
    DocumentId, PageRequest, PageResponse, PartnerId, ProductId, WarehouseId,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{Actor, JsonBody},
};

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/documents/{id}/validate", post(validate_document))
        .route("/documents/{id}/cancel", post(cancel_document))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing documents.
#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsQuery {
    /// Filter by domain.
    pub domain: Option<DocumentDomain>,
    /// Filter by document type.
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    /// Filter by status.
    pub status: Option<DocumentStatus>,
    /// Filter by warehouse.
    pub warehouse_id: Option<i32>,
    /// Filter by partner.
    pub partner_id: Option<i32>,
    /// Substring match on code, reference and notes.
    pub search: Option<String>,
    /// Document date lower bound (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Document date upper bound (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 15, max: 100).
    pub per_page: Option<u32>,
}

/// Request body for creating a document.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Business domain.
    pub domain: DocumentDomain,
    /// Document type within the domain.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub document_type: String,
    /// Warehouse (source for transfers).
    pub warehouse_id: Option<i32>,
    /// Receiving warehouse for transfers.
    pub destination_warehouse_id: Option<i32>,
    /// Customer or supplier.
    pub partner_id: Option<i32>,
    /// Related entity, e.g. `{"kind": "document", "id": 3}`.
    pub related_entity: Option<RelatedEntity>,
    /// Document date (YYYY-MM-DD).
    pub document_date: NaiveDate,
    /// Due date (YYYY-MM-DD).
    pub due_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// External reference.
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    /// Product lines.
    #[validate(nested)]
    pub lines: Vec<LineRequest>,
}

/// Request body for one document line.
#[derive(Debug, Deserialize, Validate)]
pub struct LineRequest {
    /// Product ID.
    pub product_id: i32,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Unit cost; the last known cost is used when omitted.
    pub unit_cost: Option<Decimal>,
    /// Discount percentage.
    pub discount_percent: Option<Decimal>,
    /// Tax percentage.
    pub tax_percent: Option<Decimal>,
    /// Line description.
    #[validate(length(max = 255))]
    pub description: Option<String>,
    /// Line notes.
    pub notes: Option<String>,
}

/// Request body for updating a draft document. Lines are replaced wholesale.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// New warehouse.
    pub warehouse_id: Option<i32>,
    /// New transfer destination.
    pub destination_warehouse_id: Option<i32>,
    /// New partner.
    pub partner_id: Option<i32>,
    /// New related entity.
    pub related_entity: Option<RelatedEntity>,
    /// New document date.
    pub document_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
    /// New reference.
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    /// Replacement lines.
    #[validate(nested)]
    pub lines: Vec<LineRequest>,
}

/// Document header as returned by list and detail endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID.
    pub id: DocumentId,
    /// Generated code.
    pub code: String,
    /// Business domain.
    pub domain: DocumentDomain,
    /// Document type.
    #[serde(rename = "type")]
    pub document_type: String,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Warehouse.
    pub warehouse_id: Option<i32>,
    /// Transfer destination.
    pub destination_warehouse_id: Option<i32>,
    /// Partner.
    pub partner_id: Option<i32>,
    /// Related entity.
    pub related_entity: Option<RelatedEntity>,
    /// Document date.
    pub document_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Sum of line discounts.
    pub discount_amount: Decimal,
    /// Sum of line taxes.
    pub tax_amount: Decimal,
    /// Equal to `subtotal`.
    pub total_amount: Decimal,
    /// Notes.
    pub notes: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Creator.
    pub created_by: Uuid,
    /// Validator.
    pub validated_by: Option<Uuid>,
    /// Validation timestamp.
    pub validated_at: Option<DateTime<FixedOffset>>,
    /// Canceller.
    pub cancelled_by: Option<Uuid>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<FixedOffset>>,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

/// One document line.
#[derive(Debug, Serialize, Deserialize)]
pub struct LineResponse {
    /// Line ID.
    pub id: i32,
    /// 1-based position within the document.
    pub line_number: i32,
    /// Product.
    pub product_id: i32,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Unit cost as supplied.
    pub unit_cost: Option<Decimal>,
    /// Discount percentage.
    pub discount_percent: Decimal,
    /// Discount amount.
    pub discount_amount: Decimal,
    /// Tax percentage.
    pub tax_percent: Decimal,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Line total.
    pub line_total: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Document with its lines.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// Header fields.
    #[serde(flatten)]
    pub document: DocumentSummary,
    /// Lines ordered by line number.
    pub lines: Vec<LineResponse>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<LineRequest> for DocumentLineInput {
    fn from(line: LineRequest) -> Self {
        Self {
            product_id: ProductId(line.product_id),
            quantity: line.quantity,
            unit_price: line.unit_price,
            unit_cost: line.unit_cost,
            discount_percent: line.discount_percent,
            tax_percent: line.tax_percent,
            description: line.description,
            notes: line.notes,
        }
    }
}

impl From<CreateDocumentRequest> for CreateDocumentInput {
    fn from(req: CreateDocumentRequest) -> Self {
        Self {
            header: DocumentHeader {
                domain: req.domain,
                document_type: req.document_type,
                warehouse_id: req.warehouse_id.map(WarehouseId),
                destination_warehouse_id: req.destination_warehouse_id.map(WarehouseId),
                partner_id: req.partner_id.map(PartnerId),
                related_entity: req.related_entity,
                document_date: req.document_date,
                due_date: req.due_date,
                notes: req.notes,
                reference: req.reference,
            },
            lines: req.lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpdateDocumentRequest> for DocumentPatch {
    fn from(req: UpdateDocumentRequest) -> Self {
        Self {
            warehouse_id: req.warehouse_id.map(WarehouseId),
            destination_warehouse_id: req.destination_warehouse_id.map(WarehouseId),
            partner_id: req.partner_id.map(PartnerId),
            related_entity: req.related_entity,
            document_date: req.document_date,
            due_date: req.due_date,
            notes: req.notes,
            reference: req.reference,
            lines: req.lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<document_headers::Model> for DocumentSummary {
    fn from(model: document_headers::Model) -> Self {
        let related_entity = model
            .related_entity_kind
            .as_deref()
            .zip(model.related_entity_id)
            .and_then(|(kind, id)| RelatedEntity::from_parts(kind, id));

        Self {
            id: DocumentId(model.id),
            code: model.code,
            domain: model.domain.into(),
            document_type: model.document_type,
            status: model.status.into(),
            warehouse_id: model.warehouse_id,
            destination_warehouse_id: model.destination_warehouse_id,
            partner_id: model.partner_id,
            related_entity,
            document_date: model.document_date,
            due_date: model.due_date,
            subtotal: model.subtotal,
            discount_amount: model.discount_amount,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            notes: model.notes,
            reference: model.reference,
            created_by: model.created_by,
            validated_by: model.validated_by,
            validated_at: model.validated_at,
            cancelled_by: model.cancelled_by,
            cancelled_at: model.cancelled_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<document_lines::Model> for LineResponse {
    fn from(model: document_lines::Model) -> Self {
        Self {
            id: model.id,
            line_number: model.line_number,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
            unit_cost: model.unit_cost,
            discount_percent: model.discount_percent,
            discount_amount: model.discount_amount,
            tax_percent: model.tax_percent,
            tax_amount: model.tax_amount,
            line_total: model.line_total,
            description: model.description,
            notes: model.notes,
        }
    }
}

impl From<DocumentWithLines> for DocumentResponse {
    fn from(value: DocumentWithLines) -> Self {
        Self {
            document: value.document.into(),
            lines: value.lines.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /documents
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<PageResponse<DocumentSummary>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = DocumentFilter {
        domain: query.domain,
        document_type: query.document_type,
        status: query.status,
        warehouse_id: query.warehouse_id.map(WarehouseId),
        partner_id: query.partner_id.map(PartnerId),
        search: query.search,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let documents = state.documents().list(filter, page).await?;
    Ok(Json(documents.map(DocumentSummary::from)))
}

/// POST /documents
async fn create_document(
    State(state): State<AppState>,
    Actor(actor): Actor,
    JsonBody(req): JsonBody<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let created = state.documents().create(req.into(), actor).await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(created))))
}

/// GET /documents/{id}
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = state.documents().get(DocumentId(id)).await?;
    Ok(Json(document.into()))
}

/// PUT /documents/{id}
async fn update_document(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i32>,
    JsonBody(req): JsonBody<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    req.validate()?;

    let updated = state
        .documents()
        .update(DocumentId(id), req.into(), actor)
        .await?;
    Ok(Json(updated.into()))
}

/// DELETE /documents/{id}
async fn delete_document(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.documents().delete(DocumentId(id), actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /documents/{id}/validate
async fn validate_document(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i32>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = state.documents().validate(DocumentId(id), actor).await?;
    Ok(Json(document.into()))
}

/// POST /documents/{id}/cancel
async fn cancel_document(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i32>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let document = state.documents().cancel(DocumentId(id), actor).await?;
    Ok(Json(document.into()))
}
