//! Database seeder for Stockflow development and testing.
//!
//! Seeds warehouses, products, partners and numbering templates. Rows are
//! matched on their code, so running the seeder twice is harmless.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use stockflow_core::numbering::{JOURNAL_DOMAIN, JOURNAL_TYPE};
use stockflow_db::entities::{numbering_systems, partners, products, warehouses};

const WAREHOUSES: &[(&str, &str)] = &[
    ("WH-MAIN", "Main Warehouse"),
    ("WH-EAST", "East Depot"),
    ("WH-RET", "Returns Bay"),
];

const PRODUCTS: &[(&str, &str)] = &[
    ("PRD-00001", "Steel Bolt M8"),
    ("PRD-00002", "Steel Nut M8"),
    ("PRD-00003", "Washer 8mm"),
    ("PRD-00004", "Hex Key Set"),
    ("PRD-00005", "Cable Tie 200mm"),
];

const PARTNERS: &[(&str, &str)] = &[
    ("CUS-001", "Acme Retail"),
    ("CUS-002", "Northwind Traders"),
    ("SUP-001", "Fastener Supply Co"),
];

/// `(title, domain, type, template)`. Keys match the document types that
/// move stock, plus the journal entry sequence.
const TEMPLATES: &[(&str, &str, &str, &str)] = &[
    ("Sale invoices", "sale", "invoice", "SI-{YYYY}-{NUMBER:5}"),
    ("Delivery notes", "sale", "delivery_note", "DN-{YY}{MM}-{0000}"),
    ("Sale returns", "sale", "return", "SR-{YYYY}-{0000}"),
    ("Purchase invoices", "purchase", "invoice", "PI-{YYYY}-{NUMBER:5}"),
    ("Goods receipts", "purchase", "receipt", "GRN-{YYYY}-{0000}"),
    ("Purchase returns", "purchase", "return", "PR-{YYYY}-{0000}"),
    ("Stock adjustments", "stock", "adjustment", "ADJ-{YYYY}{MM}-{000}"),
    ("Stock transfers", "stock", "transfer", "TRF-{YYYY}-{0000}"),
    ("Stock journal", JOURNAL_DOMAIN, JOURNAL_TYPE, "MOV-{YYYY}-{000000}"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = stockflow_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding warehouses...");
    seed_warehouses(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding partners...");
    seed_partners(&db).await;

    println!("Seeding numbering templates...");
    seed_templates(&db).await;

    println!("Seeding complete!");
}

async fn seed_warehouses(db: &DatabaseConnection) {
    for (code, name) in WAREHOUSES {
        let exists = warehouses::Entity::find()
            .filter(warehouses::Column::Code.eq(*code))
            .one(db)
            .await
            .expect("Failed to query warehouses")
            .is_some();
        if exists {
            println!("  Warehouse {code} already exists, skipping...");
            continue;
        }

        warehouses::ActiveModel {
            code: Set((*code).to_string()),
            name: Set((*name).to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert warehouse");
        println!("  Created warehouse {code}");
    }
}

async fn seed_products(db: &DatabaseConnection) {
    for (code, title) in PRODUCTS {
        let exists = products::Entity::find()
            .filter(products::Column::Code.eq(*code))
            .one(db)
            .await
            .expect("Failed to query products")
            .is_some();
        if exists {
            println!("  Product {code} already exists, skipping...");
            continue;
        }

        products::ActiveModel {
            code: Set((*code).to_string()),
            title: Set((*title).to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert product");
        println!("  Created product {code}");
    }
}

async fn seed_partners(db: &DatabaseConnection) {
    for (code, name) in PARTNERS {
        let exists = partners::Entity::find()
            .filter(partners::Column::Code.eq(*code))
            .one(db)
            .await
            .expect("Failed to query partners")
            .is_some();
        if exists {
            println!("  Partner {code} already exists, skipping...");
            continue;
        }

        partners::ActiveModel {
            code: Set((*code).to_string()),
            name: Set((*name).to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert partner");
        println!("  Created partner {code}");
    }
}

async fn seed_templates(db: &DatabaseConnection) {
    for (title, domain, code_type, template) in TEMPLATES {
        let exists = numbering_systems::Entity::find()
            .filter(numbering_systems::Column::Domain.eq(*domain))
            .filter(numbering_systems::Column::CodeType.eq(*code_type))
            .one(db)
            .await
            .expect("Failed to query numbering templates")
            .is_some();
        if exists {
            println!("  Template {domain}/{code_type} already exists, skipping...");
            continue;
        }

        let now = Utc::now();
        numbering_systems::ActiveModel {
            title: Set((*title).to_string()),
            domain: Set((*domain).to_string()),
            code_type: Set((*code_type).to_string()),
            template: Set((*template).to_string()),
            next_value: Set(1),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert numbering template");
        println!("  Created template {domain}/{code_type}: {template}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_core::document::DocumentDomain;
    use stockflow_core::stock::MovementResolver;

    #[test]
    fn test_every_template_is_consumed() {
        for (_, domain, code_type, template) in TEMPLATES {
            if (*domain, *code_type) == (JOURNAL_DOMAIN, JOURNAL_TYPE) {
                continue;
            }
            let domain = DocumentDomain::parse(domain).unwrap();
            assert!(
                MovementResolver::moves_stock(domain, code_type),
                "{template} is keyed to {domain}/{code_type}, which no document uses"
            );
        }
    }

    #[test]
    fn test_journal_template_is_seeded() {
        assert!(
            TEMPLATES
                .iter()
                .any(|(_, domain, code_type, _)| (*domain, *code_type) == (JOURNAL_DOMAIN, JOURNAL_TYPE))
        );
    }
}
