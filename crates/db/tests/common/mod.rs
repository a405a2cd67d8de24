//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with the migrator applied.
//! The pool is capped at one connection because every `sqlite::memory:`
//! connection opens a separate database.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use stockflow_core::document::{
    CreateDocumentInput, DocumentDomain, DocumentHeader, DocumentLineInput,
};
use stockflow_db::entities::{numbering_systems, partners, products, warehouses};
use stockflow_db::migration::Migrator;
use stockflow_shared::types::{PartnerId, ProductId, UserId, WarehouseId};

pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_warehouse(db: &DatabaseConnection, code: &str) -> WarehouseId {
    let model = warehouses::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Warehouse {code}")),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert warehouse");
    WarehouseId(model.id)
}

pub async fn seed_product(db: &DatabaseConnection, code: &str) -> ProductId {
    let model = products::ActiveModel {
        code: Set(code.to_string()),
        title: Set(format!("Product {code}")),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert product");
    ProductId(model.id)
}

pub async fn seed_partner(db: &DatabaseConnection, code: &str) -> PartnerId {
    let model = partners::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Partner {code}")),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert partner");
    PartnerId(model.id)
}

pub async fn seed_template(
    db: &DatabaseConnection,
    domain: &str,
    code_type: &str,
    template: &str,
    next_value: i64,
) {
    let now = Utc::now();
    numbering_systems::ActiveModel {
        title: Set(format!("{domain} {code_type}")),
        domain: Set(domain.to_string()),
        code_type: Set(code_type.to_string()),
        template: Set(template.to_string()),
        next_value: Set(next_value),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert numbering template");
}

pub fn document_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

pub fn actor() -> UserId {
    UserId::new()
}

pub fn header(
    domain: DocumentDomain,
    document_type: &str,
    warehouse_id: Option<WarehouseId>,
) -> DocumentHeader {
    DocumentHeader {
        domain,
        document_type: document_type.to_string(),
        warehouse_id,
        destination_warehouse_id: None,
        partner_id: None,
        related_entity: None,
        document_date: document_date(),
        due_date: None,
        notes: None,
        reference: None,
    }
}

pub fn line(product_id: ProductId, quantity: Decimal, unit_price: Decimal) -> DocumentLineInput {
    DocumentLineInput {
        product_id,
        quantity,
        unit_price,
        unit_cost: None,
        discount_percent: None,
        tax_percent: None,
        description: None,
        notes: None,
    }
}

pub fn single_line(
    domain: DocumentDomain,
    document_type: &str,
    warehouse_id: WarehouseId,
    line: DocumentLineInput,
) -> CreateDocumentInput {
    CreateDocumentInput {
        header: header(domain, document_type, Some(warehouse_id)),
        lines: vec![line],
    }
}
