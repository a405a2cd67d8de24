//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder so they run on both PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_master_data;
mod m20261001_000002_numbering_systems;
mod m20261001_000003_documents;
mod m20261001_000004_stock_ledger;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_master_data::Migration),
            Box::new(m20261001_000002_numbering_systems::Migration),
            Box::new(m20261001_000003_documents::Migration),
            Box::new(m20261001_000004_stock_ledger::Migration),
        ]
    }
}
