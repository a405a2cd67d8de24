//! Stock ledger persistence: journal appends, balance projection, queries.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    Insert, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use stockflow_core::document::DocumentError;
use stockflow_core::stock::{
    BalanceProjector, EntrySnapshot, MovementDirection, MovementType, NewLedgerEntry, PostedEntry,
    StockLevel,
};
use stockflow_shared::types::{
    DocumentId, DocumentLineId, LedgerEntryId, PageRequest, PageResponse, ProductId, UserId,
    WarehouseId,
};
use tracing::debug;

use crate::entities::sea_orm_active_enums::MovementType as DbMovementType;
use crate::entities::{journal_stock, products, stock_balances, warehouses};

use super::error::InventoryError;
use super::numbering::journal_code;

/// Balance of one (warehouse, product) pair as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBalanceView {
    /// Warehouse.
    pub warehouse_id: WarehouseId,
    /// Product.
    pub product_id: ProductId,
    /// Signed sum of every journal entry of the pair.
    pub quantity: Decimal,
    /// Quantity reserved for pending orders.
    pub reserved_quantity: Decimal,
    /// `quantity - reserved_quantity`, computed on read.
    pub available_quantity: Decimal,
    /// Latest entry by (movement date, id).
    pub last_movement_id: Option<LedgerEntryId>,
    /// Movement date of that entry.
    pub last_movement_date: Option<NaiveDate>,
}

impl StockBalanceView {
    fn empty(warehouse_id: WarehouseId, product_id: ProductId) -> Self {
        Self {
            warehouse_id,
            product_id,
            quantity: Decimal::ZERO,
            reserved_quantity: Decimal::ZERO,
            available_quantity: Decimal::ZERO,
            last_movement_id: None,
            last_movement_date: None,
        }
    }

    fn from_model(model: &stock_balances::Model) -> Self {
        let level = StockLevel {
            quantity: model.quantity,
            reserved_quantity: model.reserved_quantity,
        };
        Self {
            warehouse_id: WarehouseId(model.warehouse_id),
            product_id: ProductId(model.product_id),
            quantity: level.quantity,
            reserved_quantity: level.reserved_quantity,
            available_quantity: level.available_quantity(),
            last_movement_id: model.last_movement_id.map(LedgerEntryId),
            last_movement_date: model.last_movement_date,
        }
    }

    fn level(&self) -> StockLevel {
        StockLevel {
            quantity: self.quantity,
            reserved_quantity: self.reserved_quantity,
        }
    }
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Filter by warehouse.
    pub warehouse_id: Option<WarehouseId>,
    /// Filter by product.
    pub product_id: Option<ProductId>,
    /// Filter by movement type.
    pub movement_type: Option<MovementType>,
    /// Filter by movement date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by movement date range end.
    pub date_to: Option<NaiveDate>,
    /// `Entry` keeps positive quantities, `Exit` negative ones.
    pub direction: Option<MovementDirection>,
    /// Substring match over code, reference and notes.
    pub search: Option<String>,
}

/// Repository for the stock journal and balances.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the balance of a pair; pairs without movements read as zero.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the warehouse or product does not exist.
    pub async fn balance(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<StockBalanceView, InventoryError> {
        ensure_pair_exists(&self.db, warehouse_id, product_id).await?;

        let row = find_balance(&self.db, warehouse_id, product_id).await?;
        Ok(row.as_ref().map_or_else(
            || StockBalanceView::empty(warehouse_id, product_id),
            StockBalanceView::from_model,
        ))
    }

    /// Returns the entries of a pair, newest first by (movement date, id).
    pub async fn history(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<journal_stock::Model>, InventoryError> {
        ensure_pair_exists(&self.db, warehouse_id, product_id).await?;

        let mut query = journal_stock::Entity::find()
            .filter(journal_stock::Column::WarehouseId.eq(warehouse_id.0))
            .filter(journal_stock::Column::ProductId.eq(product_id.0));

        if let Some(from) = date_from {
            query = query.filter(journal_stock::Column::MovementDate.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(journal_stock::Column::MovementDate.lte(to));
        }

        Ok(newest_first(query).all(&self.db).await?)
    }

    /// Returns true if `required` can be served from available stock.
    ///
    /// # Errors
    ///
    /// Returns `WAREHOUSE_NOT_FOUND` or `PRODUCT_NOT_FOUND` for an unknown pair.
    pub async fn check_availability(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        required: Decimal,
    ) -> Result<bool, InventoryError> {
        let balance = self.balance(warehouse_id, product_id).await?;
        Ok(balance.level().can_fulfil(required))
    }

    /// Lists journal entries with optional filters, newest first.
    pub async fn list_journal(
        &self,
        filter: JournalFilter,
        page: PageRequest,
    ) -> Result<PageResponse<journal_stock::Model>, InventoryError> {
        let page = page.normalized();
        let mut query = journal_stock::Entity::find();

        if let Some(warehouse_id) = filter.warehouse_id {
            query = query.filter(journal_stock::Column::WarehouseId.eq(warehouse_id.0));
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(journal_stock::Column::ProductId.eq(product_id.0));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query
                .filter(journal_stock::Column::MovementType.eq(DbMovementType::from(movement_type)));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(journal_stock::Column::MovementDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_stock::Column::MovementDate.lte(to));
        }
        match filter.direction {
            Some(MovementDirection::Entry) => {
                query = query.filter(journal_stock::Column::Quantity.gt(Decimal::ZERO));
            }
            Some(MovementDirection::Exit) => {
                query = query.filter(journal_stock::Column::Quantity.lt(Decimal::ZERO));
            }
            None => {}
        }
        let search = filter.search.as_deref().map(str::trim);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(journal_stock::Column::Code.contains(search))
                    .add(journal_stock::Column::Reference.contains(search))
                    .add(journal_stock::Column::Notes.contains(search)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let entries = newest_first(query)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }

    /// Gets one journal entry.
    pub async fn get_entry(
        &self,
        id: LedgerEntryId,
    ) -> Result<journal_stock::Model, InventoryError> {
        journal_stock::Entity::find_by_id(id.0)
            .one(&self.db)
            .await?
            .ok_or(InventoryError::EntryNotFound(id))
    }

    /// Recomputes the balance of a pair from its journal.
    ///
    /// Calling this repeatedly without new entries leaves the row unchanged.
    pub async fn reproject(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<StockBalanceView, InventoryError> {
        ensure_pair_exists(&self.db, warehouse_id, product_id).await?;

        let txn = self.db.begin().await?;
        let row = project(&txn, warehouse_id, product_id, &[]).await?;
        txn.commit().await?;

        Ok(StockBalanceView::from_model(&row))
    }
}

/// Appends entries in order, assigning each a journal code.
pub(crate) async fn append_entries<C: ConnectionTrait>(
    conn: &C,
    entries: Vec<NewLedgerEntry>,
    actor: UserId,
    padding: usize,
) -> Result<Vec<journal_stock::Model>, InventoryError> {
    let today = Utc::now().date_naive();
    let mut inserted = Vec::with_capacity(entries.len());

    for entry in entries {
        let code = journal_code(conn, today, padding).await?;
        let model = journal_stock::ActiveModel {
            code: Set(code),
            movement_type: Set(entry.movement_type.into()),
            document_id: Set(entry.document_id.map(DocumentId::into_inner)),
            document_line_id: Set(entry.document_line_id.map(DocumentLineId::into_inner)),
            warehouse_id: Set(entry.warehouse_id.0),
            product_id: Set(entry.product_id.0),
            quantity: Set(entry.quantity),
            unit_cost: Set(entry.unit_cost),
            total_cost: Set(entry.total_cost),
            movement_date: Set(entry.movement_date),
            reference: Set(entry.reference),
            notes: Set(entry.notes),
            created_by: Set(actor.0),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        debug!(
            entry_id = model.id,
            code = %model.code,
            movement_type = %entry.movement_type,
            warehouse_id = model.warehouse_id,
            product_id = model.product_id,
            quantity = %model.quantity,
            "Appended journal entry"
        );
        inserted.push(model);
    }

    Ok(inserted)
}

/// Projects every pair touched by `entries`, each once.
pub(crate) async fn project_touched<C: ConnectionTrait>(
    conn: &C,
    entries: &[journal_stock::Model],
) -> Result<(), InventoryError> {
    let pairs: BTreeSet<(i32, i32)> = entries
        .iter()
        .map(|entry| (entry.warehouse_id, entry.product_id))
        .collect();

    for (warehouse_id, product_id) in pairs {
        let appended: Vec<LedgerEntryId> = entries
            .iter()
            .filter(|e| e.warehouse_id == warehouse_id && e.product_id == product_id)
            .map(|e| LedgerEntryId(e.id))
            .collect();
        project(conn, WarehouseId(warehouse_id), ProductId(product_id), &appended).await?;
    }

    Ok(())
}

/// Recomputes one balance row from scratch, creating it if missing.
///
/// Every id in `appended` must be visible on `conn`.
pub(crate) async fn project<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    appended: &[LedgerEntryId],
) -> Result<stock_balances::Model, InventoryError> {
    // The row lock must be held before the journal is summed: a concurrent
    // writer on the same pair then waits here and sums after our commit.
    let balance = lock_balance(conn, warehouse_id, product_id).await?;

    let snapshots: Vec<EntrySnapshot> = journal_stock::Entity::find()
        .filter(journal_stock::Column::WarehouseId.eq(warehouse_id.0))
        .filter(journal_stock::Column::ProductId.eq(product_id.0))
        .all(conn)
        .await?
        .into_iter()
        .map(|entry| EntrySnapshot {
            id: LedgerEntryId(entry.id),
            quantity: entry.quantity,
            movement_date: entry.movement_date,
        })
        .collect();

    let projection = BalanceProjector::project(warehouse_id, product_id, &snapshots, appended)?;

    let mut active: stock_balances::ActiveModel = balance.into();
    active.quantity = Set(projection.quantity);
    active.last_movement_id = Set(projection.last_entry_id.map(LedgerEntryId::into_inner));
    active.last_movement_date = Set(projection.last_movement_date);
    active.updated_at = Set(Utc::now().into());
    let row = active.update(conn).await?;

    debug!(
        warehouse_id = %warehouse_id,
        product_id = %product_id,
        quantity = %row.quantity,
        entries = projection.entry_count,
        "Projected stock balance"
    );
    Ok(row)
}

/// Creates the balance row if missing, then takes `SELECT … FOR UPDATE` on it.
///
/// `ON CONFLICT DO NOTHING` lets two first movements on a pair race without a
/// unique-key failure; the loser blocks until the winner commits.
async fn lock_balance<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Result<stock_balances::Model, InventoryError> {
    empty_balance_insert(warehouse_id, product_id)
        .exec_without_returning(conn)
        .await?;

    locked_balance_query(warehouse_id, product_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            InventoryError::CorruptRecord(format!(
                "stock balance of warehouse {warehouse_id}, product {product_id} vanished after insert"
            ))
        })
}

fn empty_balance_insert(
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Insert<stock_balances::ActiveModel> {
    let row = stock_balances::ActiveModel {
        warehouse_id: Set(warehouse_id.0),
        product_id: Set(product_id.0),
        quantity: Set(Decimal::ZERO),
        reserved_quantity: Set(Decimal::ZERO),
        last_movement_id: Set(None),
        last_movement_date: Set(None),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };

    stock_balances::Entity::insert(row).on_conflict(
        OnConflict::columns([
            stock_balances::Column::WarehouseId,
            stock_balances::Column::ProductId,
        ])
        .do_nothing()
        .to_owned(),
    )
}

fn locked_balance_query(
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Select<stock_balances::Entity> {
    stock_balances::Entity::find()
        .filter(stock_balances::Column::WarehouseId.eq(warehouse_id.0))
        .filter(stock_balances::Column::ProductId.eq(product_id.0))
        .lock_exclusive()
}

/// Unit cost of the latest incoming entry of a pair.
pub(crate) async fn last_entry_cost<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Result<Option<Decimal>, InventoryError> {
    let latest = newest_first(
        journal_stock::Entity::find()
            .filter(journal_stock::Column::WarehouseId.eq(warehouse_id.0))
            .filter(journal_stock::Column::ProductId.eq(product_id.0))
            .filter(journal_stock::Column::Quantity.gt(Decimal::ZERO)),
    )
    .one(conn)
    .await?;

    Ok(latest.map(|entry| entry.unit_cost))
}

/// Entries emitted for a document, in insertion order.
pub(crate) async fn entries_for_document<C: ConnectionTrait>(
    conn: &C,
    document_id: DocumentId,
) -> Result<Vec<journal_stock::Model>, InventoryError> {
    Ok(journal_stock::Entity::find()
        .filter(journal_stock::Column::DocumentId.eq(document_id.0))
        .order_by_asc(journal_stock::Column::Id)
        .all(conn)
        .await?)
}

pub(crate) fn posted_entry(model: &journal_stock::Model) -> PostedEntry {
    PostedEntry {
        id: LedgerEntryId(model.id),
        code: model.code.clone(),
        movement_type: model.movement_type.into(),
        warehouse_id: WarehouseId(model.warehouse_id),
        product_id: ProductId(model.product_id),
        document_id: model.document_id.map(DocumentId),
        document_line_id: model.document_line_id.map(DocumentLineId),
        quantity: model.quantity,
        unit_cost: model.unit_cost,
        reference: model.reference.clone(),
    }
}

async fn find_balance<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Result<Option<stock_balances::Model>, InventoryError> {
    Ok(stock_balances::Entity::find()
        .filter(stock_balances::Column::WarehouseId.eq(warehouse_id.0))
        .filter(stock_balances::Column::ProductId.eq(product_id.0))
        .one(conn)
        .await?)
}

async fn ensure_pair_exists<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: WarehouseId,
    product_id: ProductId,
) -> Result<(), InventoryError> {
    if warehouses::Entity::find_by_id(warehouse_id.0).one(conn).await?.is_none() {
        return Err(DocumentError::WarehouseNotFound {
            id: warehouse_id,
            field: "warehouse_id",
        }
        .into());
    }
    if products::Entity::find_by_id(product_id.0).one(conn).await?.is_none() {
        return Err(DocumentError::ProductNotFound(product_id).into());
    }
    Ok(())
}

fn newest_first(query: Select<journal_stock::Entity>) -> Select<journal_stock::Entity> {
    query
        .order_by_desc(journal_stock::Column::MovementDate)
        .order_by_desc(journal_stock::Column::Id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_balance_is_locked_before_projection() {
        let sql = locked_balance_query(WarehouseId(1), ProductId(2))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""warehouse_id" = 1"#), "{sql}");
        assert!(sql.contains(r#""product_id" = 2"#), "{sql}");
    }

    #[test]
    fn test_missing_balance_row_is_created_without_conflict() {
        let sql = empty_balance_insert(WarehouseId(1), ProductId(2))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#"ON CONFLICT ("warehouse_id", "product_id") DO NOTHING"#),
            "{sql}"
        );
    }
}
