//! Document persistence and the lifecycle orchestrator.
//!
//! Every mutating operation runs in one database transaction: header and line
//! writes, journal appends and balance projections either all land or none do.
//! All reads inside an operation go through that transaction, and the
//! document header is locked before its status is checked.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use stockflow_core::document::{
    CreateDocumentInput, DocumentDomain, DocumentError, DocumentHeader, DocumentLifecycle,
    DocumentPatch, DocumentStatus, LifecycleAction, PreparedDocument, PreparedLine, RelatedEntity,
};
use stockflow_core::stock::{LedgerEntryFactory, LineMovement, MovementResolver};
use stockflow_shared::InventoryConfig;
use stockflow_shared::types::{
    DocumentId, DocumentLineId, PageRequest, PageResponse, PartnerId, ProductId, UserId,
    WarehouseId,
};
use tracing::{debug, info};

use crate::entities::sea_orm_active_enums::{
    DocumentDomain as DbDocumentDomain, DocumentStatus as DbDocumentStatus,
};
use crate::entities::{
    document_headers, document_lines, journal_stock, partners, products, warehouses,
};

use super::error::InventoryError;
use super::numbering::document_code;
use super::stock::{
    append_entries, entries_for_document, last_entry_cost, posted_entry, project_touched,
};

/// Filter options for listing documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Filter by domain.
    pub domain: Option<DocumentDomain>,
    /// Filter by document type.
    pub document_type: Option<String>,
    /// Filter by status.
    pub status: Option<DocumentStatus>,
    /// Filter by warehouse.
    pub warehouse_id: Option<WarehouseId>,
    /// Filter by partner.
    pub partner_id: Option<PartnerId>,
    /// Substring match over code, reference and notes.
    pub search: Option<String>,
    /// Filter by document date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by document date range end.
    pub date_to: Option<NaiveDate>,
}

/// Document header with its lines ordered by line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentWithLines {
    /// Document header.
    pub document: document_headers::Model,
    /// Document lines.
    pub lines: Vec<document_lines::Model>,
}

/// Repository driving documents through their lifecycle.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
    inventory: InventoryConfig,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, inventory: InventoryConfig) -> Self {
        Self { db, inventory }
    }

    /// Creates a draft document with a freshly assigned code.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The header or a line violates a document rule
    /// - A referenced warehouse, partner, product or related entity is missing
    /// - The numbering template was advanced concurrently
    /// - Database operation fails
    pub async fn create(
        &self,
        input: CreateDocumentInput,
        actor: UserId,
    ) -> Result<DocumentWithLines, InventoryError> {
        let prepared = PreparedDocument::prepare(input.header, &input.lines)?;

        let txn = self.db.begin().await?;
        ensure_references(&txn, &prepared).await?;

        let header = &prepared.header;
        let code = document_code(
            &txn,
            header.domain,
            &header.document_type,
            Utc::now().date_naive(),
            self.inventory.fallback_padding,
        )
        .await?;

        let now = Utc::now();
        let document = document_headers::ActiveModel {
            code: Set(code),
            domain: Set(header.domain.into()),
            document_type: Set(header.document_type.clone()),
            status: Set(DbDocumentStatus::Draft),
            created_by: Set(actor.0),
            created_at: Set(now.into()),
            ..header_fields(&prepared, now)
        }
        .insert(&txn)
        .await?;

        let lines = insert_lines(&txn, document.id, &prepared.lines, now).await?;
        txn.commit().await?;

        info!(
            document_id = document.id,
            code = %document.code,
            status = "draft",
            actor = %actor,
            "Document created"
        );
        Ok(DocumentWithLines { document, lines })
    }

    /// Replaces the header fields supplied in `patch` and every line of a
    /// draft document.
    ///
    /// # Errors
    ///
    /// Returns a state error if the document is not a draft, plus every
    /// error [`Self::create`] can return.
    pub async fn update(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
        actor: UserId,
    ) -> Result<DocumentWithLines, InventoryError> {
        let txn = self.db.begin().await?;
        let existing = lock_document(&txn, id).await?;
        DocumentLifecycle::ensure_editable(existing.status.into())?;

        let header = patch.apply_to(&header_from_model(&existing)?);
        let prepared = PreparedDocument::prepare(header, &patch.lines)?;
        ensure_references(&txn, &prepared).await?;

        document_lines::Entity::delete_many()
            .filter(document_lines::Column::DocumentId.eq(id.0))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        let document = document_headers::ActiveModel {
            id: Set(existing.id),
            ..header_fields(&prepared, now)
        }
        .update(&txn)
        .await?;

        let lines = insert_lines(&txn, document.id, &prepared.lines, now).await?;
        txn.commit().await?;

        info!(
            document_id = document.id,
            code = %document.code,
            lines = lines.len(),
            actor = %actor,
            "Document updated"
        );
        Ok(DocumentWithLines { document, lines })
    }

    /// Validates a draft: emits journal entries for every line whose kind
    /// moves stock, re-projects the touched balances and records the
    /// validator.
    ///
    /// # Errors
    ///
    /// Returns a state error if the document is not a draft; no entries are
    /// written in that case.
    pub async fn validate(
        &self,
        id: DocumentId,
        actor: UserId,
    ) -> Result<DocumentWithLines, InventoryError> {
        self.transition(id, actor, |status| DocumentLifecycle::validate(status, actor))
            .await
    }

    /// Cancels a document that is not already cancelled.
    ///
    /// With `reverse_stock_on_cancel` enabled, a document that moved stock
    /// gets one compensating entry per original entry.
    ///
    /// # Errors
    ///
    /// Returns a state error if the document is already cancelled.
    pub async fn cancel(
        &self,
        id: DocumentId,
        actor: UserId,
    ) -> Result<DocumentWithLines, InventoryError> {
        let reverse = self.inventory.reverse_stock_on_cancel;
        self.transition(id, actor, |status| {
            DocumentLifecycle::cancel(status, actor, reverse)
        })
        .await
    }

    /// Deletes a draft document together with its lines.
    ///
    /// # Errors
    ///
    /// Returns a state error if the document is not a draft.
    pub async fn delete(&self, id: DocumentId, actor: UserId) -> Result<(), InventoryError> {
        let txn = self.db.begin().await?;
        let existing = lock_document(&txn, id).await?;
        DocumentLifecycle::ensure_deletable(existing.status.into())?;

        document_lines::Entity::delete_many()
            .filter(document_lines::Column::DocumentId.eq(id.0))
            .exec(&txn)
            .await?;
        document_headers::Entity::delete_by_id(id.0).exec(&txn).await?;
        txn.commit().await?;

        info!(document_id = id.0, code = %existing.code, actor = %actor, "Document deleted");
        Ok(())
    }

    /// Gets a document with its lines.
    pub async fn get(&self, id: DocumentId) -> Result<DocumentWithLines, InventoryError> {
        let document = find_document(&self.db, id).await?;
        let lines = find_lines(&self.db, id).await?;
        Ok(DocumentWithLines { document, lines })
    }

    /// Lists document headers with optional filters, newest first.
    pub async fn list(
        &self,
        filter: DocumentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<document_headers::Model>, InventoryError> {
        let page = page.normalized();
        let mut query = document_headers::Entity::find();

        if let Some(domain) = filter.domain {
            query = query
                .filter(document_headers::Column::Domain.eq(DbDocumentDomain::from(domain)));
        }
        if let Some(document_type) = filter.document_type {
            query = query.filter(document_headers::Column::DocumentType.eq(document_type));
        }
        if let Some(status) = filter.status {
            query = query
                .filter(document_headers::Column::Status.eq(DbDocumentStatus::from(status)));
        }
        if let Some(warehouse_id) = filter.warehouse_id {
            query = query.filter(document_headers::Column::WarehouseId.eq(warehouse_id.0));
        }
        if let Some(partner_id) = filter.partner_id {
            query = query.filter(document_headers::Column::PartnerId.eq(partner_id.0));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(document_headers::Column::DocumentDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(document_headers::Column::DocumentDate.lte(to));
        }
        let search = filter.search.as_deref().map(str::trim);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(document_headers::Column::Code.contains(search))
                    .add(document_headers::Column::Reference.contains(search))
                    .add(document_headers::Column::Notes.contains(search)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let documents = query
            .order_by_desc(document_headers::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(documents, page.page, page.per_page, total))
    }

    /// Runs one lifecycle transition and its stock side effects atomically.
    async fn transition<F>(
        &self,
        id: DocumentId,
        actor: UserId,
        decide: F,
    ) -> Result<DocumentWithLines, InventoryError>
    where
        F: FnOnce(DocumentStatus) -> Result<LifecycleAction, DocumentError>,
    {
        let txn = self.db.begin().await?;
        let existing = lock_document(&txn, id).await?;
        let action = decide(existing.status.into())?;
        let lines = find_lines(&txn, id).await?;

        let mut document: document_headers::ActiveModel = existing.clone().into();
        document.status = Set(action.new_status().into());
        document.updated_at = Set(Utc::now().into());

        let emitted = match action {
            LifecycleAction::Validate {
                validated_by,
                validated_at,
                ..
            } => {
                document.validated_by = Set(Some(validated_by.0));
                document.validated_at = Set(Some(validated_at.into()));
                self.emit_entries(&txn, &existing, &lines, actor).await?
            }
            LifecycleAction::Cancel {
                cancelled_by,
                cancelled_at,
                reverse_stock,
                ..
            } => {
                document.cancelled_by = Set(Some(cancelled_by.0));
                document.cancelled_at = Set(Some(cancelled_at.into()));
                if reverse_stock {
                    self.reverse_entries(&txn, id, cancelled_at, actor).await?
                } else {
                    Vec::new()
                }
            }
        };

        let document = document.update(&txn).await?;
        txn.commit().await?;

        info!(
            document_id = document.id,
            code = %document.code,
            status = %DocumentStatus::from(document.status),
            entries = emitted.len(),
            actor = %actor,
            "Document status changed"
        );
        Ok(DocumentWithLines { document, lines })
    }

    /// Appends the entries of every line in line-number order.
    ///
    /// Each line's balances are projected before the next line resolves its
    /// cost, so a later line sees the entries of earlier ones.
    async fn emit_entries(
        &self,
        txn: &DatabaseTransaction,
        document: &document_headers::Model,
        lines: &[document_lines::Model],
        actor: UserId,
    ) -> Result<Vec<journal_stock::Model>, InventoryError> {
        let domain: DocumentDomain = document.domain.into();
        let warehouse_id = document.warehouse_id.map(WarehouseId);
        let mut emitted = Vec::new();

        for line in lines {
            let plan = MovementResolver::resolve(domain, &document.document_type, line.quantity);
            let Some(plan) = plan else {
                debug!(
                    document_id = document.id,
                    line_number = line.line_number,
                    "Line kind does not move stock"
                );
                continue;
            };

            let product_id = ProductId(line.product_id);
            let last_known_cost = match (line.unit_cost, warehouse_id) {
                (None, Some(warehouse_id)) => {
                    last_entry_cost(txn, warehouse_id, product_id).await?
                }
                _ => None,
            };

            let movement = LineMovement {
                document_id: DocumentId(document.id),
                document_code: &document.code,
                document_date: document.document_date,
                warehouse_id,
                destination_warehouse_id: document.destination_warehouse_id.map(WarehouseId),
                line_id: DocumentLineId(line.id),
                product_id,
                quantity: line.quantity,
                unit_cost: line.unit_cost,
                notes: line.notes.as_deref(),
            };
            let entries = LedgerEntryFactory::create(&movement, plan, last_known_cost)?;

            let appended =
                append_entries(txn, entries, actor, self.inventory.fallback_padding).await?;
            project_touched(txn, &appended).await?;
            emitted.extend(appended);
        }

        Ok(emitted)
    }

    /// Appends one compensating entry per entry the document emitted.
    async fn reverse_entries(
        &self,
        txn: &DatabaseTransaction,
        id: DocumentId,
        cancelled_at: DateTime<Utc>,
        actor: UserId,
    ) -> Result<Vec<journal_stock::Model>, InventoryError> {
        let reversal_date = cancelled_at.date_naive();
        let reversals: Vec<_> = entries_for_document(txn, id)
            .await?
            .iter()
            .map(|entry| LedgerEntryFactory::reversal(&posted_entry(entry), reversal_date))
            .collect();

        let appended =
            append_entries(txn, reversals, actor, self.inventory.fallback_padding).await?;
        project_touched(txn, &appended).await?;
        Ok(appended)
    }
}

/// Rebuilds the caller-facing header from a stored row.
fn header_from_model(model: &document_headers::Model) -> Result<DocumentHeader, InventoryError> {
    let related_entity = match (&model.related_entity_kind, model.related_entity_id) {
        (Some(kind), Some(id)) => Some(RelatedEntity::from_parts(kind, id).ok_or_else(|| {
            InventoryError::CorruptRecord(format!(
                "document {} has unknown related entity kind '{kind}'",
                model.id
            ))
        })?),
        _ => None,
    };

    Ok(DocumentHeader {
        domain: model.domain.into(),
        document_type: model.document_type.clone(),
        warehouse_id: model.warehouse_id.map(WarehouseId),
        destination_warehouse_id: model.destination_warehouse_id.map(WarehouseId),
        partner_id: model.partner_id.map(PartnerId),
        related_entity,
        document_date: model.document_date,
        due_date: model.due_date,
        notes: model.notes.clone(),
        reference: model.reference.clone(),
    })
}

/// Header columns derived from a prepared document, totals included.
fn header_fields(
    prepared: &PreparedDocument,
    now: DateTime<Utc>,
) -> document_headers::ActiveModel {
    let header = &prepared.header;
    let totals = &prepared.totals;
    document_headers::ActiveModel {
        warehouse_id: Set(header.warehouse_id.map(WarehouseId::into_inner)),
        destination_warehouse_id: Set(header.destination_warehouse_id.map(WarehouseId::into_inner)),
        partner_id: Set(header.partner_id.map(PartnerId::into_inner)),
        related_entity_kind: Set(header.related_entity.map(|e| e.kind().to_string())),
        related_entity_id: Set(header.related_entity.map(|e| e.id())),
        document_date: Set(header.document_date),
        due_date: Set(header.due_date),
        subtotal: Set(totals.subtotal),
        tax_amount: Set(totals.tax_amount),
        discount_amount: Set(totals.discount_amount),
        total_amount: Set(totals.total_amount),
        notes: Set(header.notes.clone()),
        reference: Set(header.reference.clone()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    document_id: i32,
    lines: &[PreparedLine],
    now: DateTime<Utc>,
) -> Result<Vec<document_lines::Model>, InventoryError> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = document_lines::ActiveModel {
            document_id: Set(document_id),
            product_id: Set(line.product_id.0),
            line_number: Set(line.line_number),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            unit_cost: Set(line.unit_cost),
            discount_percent: Set(line.discount_percent),
            discount_amount: Set(line.amounts.discount_amount),
            tax_percent: Set(line.tax_percent),
            tax_amount: Set(line.amounts.tax_amount),
            line_total: Set(line.amounts.line_total),
            description: Set(line.description.clone()),
            notes: Set(line.notes.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

/// Every referenced row must exist.
async fn ensure_references<C: ConnectionTrait>(
    conn: &C,
    prepared: &PreparedDocument,
) -> Result<(), InventoryError> {
    let header = &prepared.header;

    if let Some(warehouse_id) = header.warehouse_id {
        ensure_warehouse(conn, warehouse_id, "warehouse_id").await?;
    }
    if let Some(destination_id) = header.destination_warehouse_id {
        ensure_warehouse(conn, destination_id, "destination_warehouse_id").await?;
    }
    if let Some(partner_id) = header.partner_id {
        ensure_partner(conn, partner_id).await?;
    }
    match header.related_entity {
        Some(RelatedEntity::Document(id)) => {
            find_document(conn, id).await?;
        }
        Some(RelatedEntity::Partner(id)) => ensure_partner(conn, id).await?,
        Some(RelatedEntity::Warehouse(id)) => {
            ensure_warehouse(conn, id, "related_entity").await?;
        }
        Some(RelatedEntity::Product(id)) => ensure_product(conn, id).await?,
        None => {}
    }

    let product_ids: BTreeSet<ProductId> = prepared.lines.iter().map(|l| l.product_id).collect();
    for product_id in product_ids {
        ensure_product(conn, product_id).await?;
    }
    Ok(())
}

async fn ensure_warehouse<C: ConnectionTrait>(
    conn: &C,
    id: WarehouseId,
    field: &'static str,
) -> Result<(), InventoryError> {
    match warehouses::Entity::find_by_id(id.0).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(DocumentError::WarehouseNotFound { id, field }.into()),
    }
}

async fn ensure_partner<C: ConnectionTrait>(conn: &C, id: PartnerId) -> Result<(), InventoryError> {
    match partners::Entity::find_by_id(id.0).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(DocumentError::PartnerNotFound(id).into()),
    }
}

async fn ensure_product<C: ConnectionTrait>(conn: &C, id: ProductId) -> Result<(), InventoryError> {
    match products::Entity::find_by_id(id.0).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(DocumentError::ProductNotFound(id).into()),
    }
}

async fn find_document<C: ConnectionTrait>(
    conn: &C,
    id: DocumentId,
) -> Result<document_headers::Model, InventoryError> {
    document_headers::Entity::find_by_id(id.0)
        .one(conn)
        .await?
        .ok_or_else(|| DocumentError::DocumentNotFound(id).into())
}

/// Reads a document with `SELECT … FOR UPDATE`.
///
/// Two transitions on the same document take turns: the second one waits
/// here and then sees the status the first one committed.
async fn lock_document<C: ConnectionTrait>(
    conn: &C,
    id: DocumentId,
) -> Result<document_headers::Model, InventoryError> {
    locked_document_query(id)
        .one(conn)
        .await?
        .ok_or_else(|| DocumentError::DocumentNotFound(id).into())
}

fn locked_document_query(id: DocumentId) -> Select<document_headers::Entity> {
    document_headers::Entity::find_by_id(id.0).lock_exclusive()
}

async fn find_lines<C: ConnectionTrait>(
    conn: &C,
    id: DocumentId,
) -> Result<Vec<document_lines::Model>, InventoryError> {
    Ok(document_lines::Entity::find()
        .filter(document_lines::Column::DocumentId.eq(id.0))
        .order_by_asc(document_lines::Column::LineNumber)
        .all(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockflow_core::document::DocumentLineInput;

    fn model(kind: Option<&str>, id: Option<i32>) -> document_headers::Model {
        let now = Utc::now().fixed_offset();
        document_headers::Model {
            id: 1,
            code: "SINV-2026-0001".to_string(),
            domain: DbDocumentDomain::Sale,
            document_type: "invoice".to_string(),
            warehouse_id: Some(1),
            destination_warehouse_id: None,
            partner_id: Some(4),
            related_entity_kind: kind.map(str::to_string),
            related_entity_id: id,
            document_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: None,
            status: DbDocumentStatus::Draft,
            subtotal: dec!(0),
            tax_amount: dec!(0),
            discount_amount: dec!(0),
            total_amount: dec!(0),
            notes: Some("note".to_string()),
            reference: None,
            created_by: UserId::new().0,
            validated_by: None,
            validated_at: None,
            cancelled_by: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_document_is_locked_before_status_check() {
        use sea_orm::{DbBackend, QueryTrait};

        let sql = locked_document_query(DocumentId(9))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""document_headers"."id" = 9"#), "{sql}");
    }

    #[test]
    fn test_header_from_model_rebuilds_related_entity() {
        let header = header_from_model(&model(Some("document"), Some(7))).unwrap();
        assert_eq!(header.related_entity, Some(RelatedEntity::Document(DocumentId(7))));
        assert_eq!(header.domain, DocumentDomain::Sale);
        assert_eq!(header.partner_id, Some(PartnerId(4)));
    }

    #[test]
    fn test_header_from_model_rejects_unknown_kind() {
        let result = header_from_model(&model(Some("invoice"), Some(7)));
        assert!(matches!(result, Err(InventoryError::CorruptRecord(_))));
    }

    #[test]
    fn test_header_fields_carry_totals() {
        let header = header_from_model(&model(None, None)).unwrap();
        let lines = vec![DocumentLineInput {
            product_id: ProductId(1),
            quantity: dec!(10),
            unit_price: dec!(100),
            unit_cost: None,
            discount_percent: Some(dec!(10)),
            tax_percent: Some(dec!(20)),
            description: None,
            notes: None,
        }];
        let prepared = PreparedDocument::prepare(header, &lines).unwrap();
        let fields = header_fields(&prepared, Utc::now());

        assert_eq!(fields.subtotal, Set(dec!(1080.00)));
        assert_eq!(fields.total_amount, Set(dec!(1080.00)));
        assert_eq!(fields.discount_amount, Set(dec!(100.00)));
        assert_eq!(fields.tax_amount, Set(dec!(180.00)));
    }
}
