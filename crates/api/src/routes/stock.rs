//! Stock ledger query routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockflow_core::stock::{MovementDirection, MovementType};
use stockflow_db::{JournalFilter, StockBalanceView, entities::journal_stock};
use stockflow_shared::types::{LedgerEntryId, PageRequest, PageResponse, ProductId, WarehouseId};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the stock routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock/balance", get(get_balance))
        .route("/stock/history", get(get_history))
        .route("/stock/availability", get(check_availability))
        .route("/stock/journal", get(list_journal))
        .route("/stock/journal/{id}", get(get_journal_entry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query identifying a (warehouse, product) pair.
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    /// Warehouse ID.
    pub warehouse_id: i32,
    /// Product ID.
    pub product_id: i32,
}

/// Query for the movement history of a pair.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Warehouse ID.
    pub warehouse_id: i32,
    /// Product ID.
    pub product_id: i32,
    /// Movement date lower bound (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Movement date upper bound (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
}

/// Query for an availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Warehouse ID.
    pub warehouse_id: i32,
    /// Product ID.
    pub product_id: i32,
    /// Required quantity.
    pub quantity: Decimal,
}

/// Query parameters for listing journal entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListJournalQuery {
    /// Filter by warehouse.
    pub warehouse_id: Option<i32>,
    /// Filter by product.
    pub product_id: Option<i32>,
    /// Filter by movement type (`sale_invoice`, `transfer_in`, ...).
    pub movement_type: Option<MovementType>,
    /// `entry` or `exit`.
    pub direction: Option<MovementDirection>,
    /// Movement date lower bound.
    pub date_from: Option<NaiveDate>,
    /// Movement date upper bound.
    pub date_to: Option<NaiveDate>,
    /// Substring match on code, reference and notes.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 15, max: 100).
    pub per_page: Option<u32>,
}

/// Availability check result.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the required quantity can be served.
    pub available: bool,
    /// The quantity asked for.
    pub required_quantity: Decimal,
    /// Quantity on hand minus reservations.
    pub available_quantity: Decimal,
}

/// One stock journal entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct JournalEntryResponse {
    /// Entry ID.
    pub id: LedgerEntryId,
    /// Generated code.
    pub code: String,
    /// Movement type.
    pub movement_type: MovementType,
    /// Source document.
    pub document_id: Option<i32>,
    /// Source document line.
    pub document_line_id: Option<i32>,
    /// Warehouse.
    pub warehouse_id: i32,
    /// Product.
    pub product_id: i32,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Unit cost.
    pub unit_cost: Decimal,
    /// Quantity times unit cost.
    pub total_cost: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Source document code.
    pub reference: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Creator.
    pub created_by: Uuid,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<journal_stock::Model> for JournalEntryResponse {
    fn from(model: journal_stock::Model) -> Self {
        Self {
            id: LedgerEntryId(model.id),
            code: model.code,
            movement_type: model.movement_type.into(),
            document_id: model.document_id,
            document_line_id: model.document_line_id,
            warehouse_id: model.warehouse_id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_cost: model.unit_cost,
            total_cost: model.total_cost,
            movement_date: model.movement_date,
            reference: model.reference,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /stock/balance
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Result<Json<StockBalanceView>, ApiError> {
    let balance = state
        .stock()
        .balance(WarehouseId(query.warehouse_id), ProductId(query.product_id))
        .await?;
    Ok(Json(balance))
}

/// GET /stock/history
async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<JournalEntryResponse>>, ApiError> {
    let entries = state
        .stock()
        .history(
            WarehouseId(query.warehouse_id),
            ProductId(query.product_id),
            query.date_from,
            query.date_to,
        )
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// GET /stock/availability
async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let stock = state.stock();
    let warehouse_id = WarehouseId(query.warehouse_id);
    let product_id = ProductId(query.product_id);

    let available = stock
        .check_availability(warehouse_id, product_id, query.quantity)
        .await?;
    let balance = stock.balance(warehouse_id, product_id).await?;

    Ok(Json(AvailabilityResponse {
        available,
        required_quantity: query.quantity,
        available_quantity: balance.available_quantity,
    }))
}

/// GET /stock/journal
async fn list_journal(
    State(state): State<AppState>,
    Query(query): Query<ListJournalQuery>,
) -> Result<Json<PageResponse<JournalEntryResponse>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = JournalFilter {
        warehouse_id: query.warehouse_id.map(WarehouseId),
        product_id: query.product_id.map(ProductId),
        movement_type: query.movement_type,
        date_from: query.date_from,
        date_to: query.date_to,
        direction: query.direction,
        search: query.search,
    };

    let entries = state.stock().list_journal(filter, page).await?;
    Ok(Json(entries.map(JournalEntryResponse::from)))
}

/// GET /stock/journal/{id}
async fn get_journal_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let entry = state.stock().get_entry(LedgerEntryId(id)).await?;
    Ok(Json(entry.into()))
}
